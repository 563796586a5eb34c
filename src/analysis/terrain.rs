//! Per-cell terrain classification
//!
//! One raster sweep over the walkability and height grids produces a flag
//! bitmask per cell (climbable ledge, border, aerial-spot candidate) and the
//! border-weight grid the choke detector runs its reachability checks on.

use super::{PlayArea, LEVEL_DIFFERENCE};

/// Flag bits carried per cell in the scan bitmask
pub(crate) const CLIMBABLE: u8 = 1 << 0;
pub(crate) const BORDER: u8 = 1 << 1;
pub(crate) const OVERLORD_SPOT: u8 = 1 << 2;
pub(crate) const HANDLED_OVERLORD_SPOT: u8 = 1 << 3;
pub(crate) const IN_CURRENT_SET: u8 = 1 << 4;

/// Probe directions for the two-step climbable pattern, `(xdir, ydir)`
const CLIMB_DIRS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 0), (0, 1)];

const NEIGHBORS_8: [(i32, i32); 8] = [
    (1, 1),
    (-1, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (-1, -1),
    (0, 1),
    (0, -1),
];

pub(crate) struct TerrainScan {
    pub flags: Vec<u8>,
    /// 1.0 on border cells and the play-area ring, unpathable elsewhere;
    /// the graph the choke detector walks
    pub choke_weights: Vec<f32>,
}

/// Classify every cell in one sweep
///
/// The outer two-cell margin of the grid is never classified; the play-area
/// perimeter ring is seeded into the border-weight grid so reachability can
/// skirt the map edge.
pub(crate) fn scan_terrain(
    walkable: &[u8],
    heights: &[u8],
    h: usize,
    w: usize,
    play: &PlayArea,
) -> TerrainScan {
    let (wi, hi) = (w as i32, h as i32);
    let mut flags = vec![0u8; w * h];
    let mut choke_weights = vec![f32::INFINITY; w * h];

    let cell = |x: i32, y: i32| -> usize { (wi * y + x) as usize };
    let hgt = |x: i32, y: i32| -> i32 { heights[cell(x, y)] as i32 };

    for y in 0..hi {
        for x in 0..wi {
            if x == play.x_start - 1 || x == play.x_end || y == play.y_start - 1 || y == play.y_end
            {
                choke_weights[cell(x, y)] = 1.0;
            }

            if y < 2 || x < 2 || y >= hi - 2 || x >= wi - 2 {
                continue;
            }

            let k = cell(x, y);

            if walkable[k] == 0 {
                let below = hgt(x, y + 1);
                let above = hgt(x, y - 1);
                let own = hgt(x, y);

                // A high ledge overlooking lower ground on either side is a
                // candidate aerial observation spot
                if (own >= below + LEVEL_DIFFERENCE && below > 0)
                    || (own >= above + LEVEL_DIFFERENCE && above > 0)
                {
                    flags[k] |= OVERLORD_SPOT;
                }

                let touches_ground = NEIGHBORS_8
                    .iter()
                    .any(|&(dx, dy)| walkable[cell(x + dx, y + dy)] == 1);
                if touches_ground {
                    choke_weights[k] = 1.0;
                    flags[k] |= BORDER;
                }

                continue;
            }

            for &(xdir, ydir) in CLIMB_DIRS.iter() {
                let (x1, y1) = (x + xdir, y + ydir);
                let (x2, y2) = (x + 2 * xdir, y + 2 * ydir);

                // The middle cell must be the obstacle and the far cell must
                // be standable ground for a ledge hop to exist
                if walkable[cell(x1, y1)] == 1 || walkable[cell(x2, y2)] == 0 {
                    continue;
                }

                let h0 = hgt(x1, y1 + 1);
                let h1 = hgt(x1 + 1, y1 + 1);
                let h2 = hgt(x1, y1);
                let h3 = hgt(x1 + 1, y1);

                let climbs = if xdir != 0 && ydir != 0 {
                    if xdir == ydir {
                        ((h0 == h1 || h0 == h2) && h2 == h1 + LEVEL_DIFFERENCE && h0 == h3)
                            || (h0 == h1 && h0 == h3 && h0 == h2 + LEVEL_DIFFERENCE)
                            || (h0 == h2 && h0 == h3 && h1 == h2 + LEVEL_DIFFERENCE)
                    } else {
                        (h1 == h2 && h1 == h3 && h1 == h0 + LEVEL_DIFFERENCE)
                            || (h0 == h1 && h0 == h2 && h3 == h0 + LEVEL_DIFFERENCE)
                            || (h0 == h1 && h0 == h2 && h0 == h3 + LEVEL_DIFFERENCE)
                            || (h1 == h2 && h1 == h3 && h0 == h3 + LEVEL_DIFFERENCE)
                    }
                } else if xdir != 0 {
                    h0 == h2
                        && h1 == h3
                        && (h0 + LEVEL_DIFFERENCE == h1 || h0 == h1 + LEVEL_DIFFERENCE)
                } else {
                    h0 == h1
                        && h2 == h3
                        && (h0 + LEVEL_DIFFERENCE == h2 || h0 == h2 + LEVEL_DIFFERENCE)
                };

                if climbs {
                    flags[cell(x1, y1)] |= CLIMBABLE;
                }
            }
        }
    }

    TerrainScan {
        flags,
        choke_weights,
    }
}
