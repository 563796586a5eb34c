//! Static map analysis
//!
//! One pass over the walkability and height grids classifies terrain
//! features and derives three products: a climber pathing mask, aerial
//! observation spot centroids, and the chokes between walkable regions.
//!
//! Internally everything is `(x, y)`; every coordinate leaving this module
//! is `(row, col)`.

mod chokes;
mod overlord;
mod terrain;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{AnalyzerError, Result};
use terrain::{CLIMBABLE, HANDLED_OVERLORD_SPOT, OVERLORD_SPOT};

/// Height units between two terrain terraces
pub const LEVEL_DIFFERENCE: i32 = 16;

/// The rectangle of the map units can actually occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayArea {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

/// A narrow passage between two walkable regions, in `(row, col)` output
/// coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choke {
    /// Centroid-to-centroid line across the passage
    pub main_line: ((f32, f32), (f32, f32)),
    /// Member segments
    pub lines: Vec<((i32, i32), (i32, i32))>,
    /// Unique segment endpoints on each side
    pub side1: Vec<(i32, i32)>,
    pub side2: Vec<(i32, i32)>,
    /// Rasterized interior of the member segments
    pub pixels: Vec<(i32, i32)>,
    /// Length of the shortest member segment
    pub min_length: f32,
}

/// Everything `analyze_map` derives from one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapAnalysis {
    /// Row-major H×W grid, 1.0 where climber units can path
    pub climber_grid: Vec<f32>,
    /// `(row, col)` centroids of aerial observation plateaus
    pub overlord_spots: Vec<(f32, f32)>,
    pub chokes: Vec<Choke>,
}

fn validate_inputs(
    walkable: &[u8],
    heights: &[u8],
    h: usize,
    w: usize,
    play: &PlayArea,
) -> Result<()> {
    if w < 5 || h < 5 {
        return Err(AnalyzerError::invalid_arguments(format!(
            "map too small to analyze: {}x{}",
            h, w
        )));
    }
    if walkable.len() != w * h || heights.len() != w * h {
        return Err(AnalyzerError::invalid_arguments(format!(
            "grid sizes {} / {} do not match {}x{} = {}",
            walkable.len(),
            heights.len(),
            h,
            w,
            w * h
        )));
    }
    let x_ok = 0 <= play.x_start && play.x_start <= play.x_end && play.x_end <= w as i32;
    let y_ok = 0 <= play.y_start && play.y_start <= play.y_end && play.y_end <= h as i32;
    if !x_ok || !y_ok {
        return Err(AnalyzerError::invalid_arguments(format!(
            "play area {:?} outside {}x{} grid",
            play, h, w
        )));
    }
    Ok(())
}

/// Analyze one map: climber mask, overlord spots, chokes
///
/// `walkable` uses 1 for pathable ground, `heights` raw terrain height.
/// The play-area bounds mirror the grid convention: `y_start..y_end` rows
/// and `x_start..x_end` columns are playable.
pub fn analyze_map(
    walkable: &[u8],
    heights: &[u8],
    h: usize,
    w: usize,
    y_start: i32,
    y_end: i32,
    x_start: i32,
    x_end: i32,
) -> Result<MapAnalysis> {
    let play = PlayArea {
        x_start,
        x_end,
        y_start,
        y_end,
    };
    validate_inputs(walkable, heights, h, w, &play)?;

    let scan = terrain::scan_terrain(walkable, heights, h, w, &play);
    let mut flags = scan.flags;

    let mut climber_grid = vec![0.0f32; w * h];
    let mut overlord_spots: Vec<(f32, f32)> = Vec::new();
    let mut choke_lines: Vec<chokes::IntLine> = Vec::new();

    for y in 1..(h as i32) - 1 {
        for x in 1..(w as i32) - 1 {
            let k = (w as i32 * y + x) as usize;

            // A lone climbable cell is unusable; the mask needs a cardinal
            // climbable neighbor to hop along
            if flags[k] & CLIMBABLE != 0
                && (flags[k + 1] & CLIMBABLE != 0
                    || flags[k - 1] & CLIMBABLE != 0
                    || flags[k + w] & CLIMBABLE != 0
                    || flags[k - w] & CLIMBABLE != 0)
            {
                climber_grid[k] = 1.0;
            }

            if flags[k] & HANDLED_OVERLORD_SPOT == 0 && flags[k] & OVERLORD_SPOT != 0 {
                if let Some(spot) = overlord::resolve_overlord_spot(heights, &mut flags, h, w, x, y)
                {
                    overlord_spots.push(spot);
                }
            }

            chokes::collect_choke_lines_at(
                &flags,
                &scan.choke_weights,
                walkable,
                h,
                w,
                x,
                y,
                &play,
                &mut choke_lines,
            );
        }
    }

    debug!(candidate_lines = choke_lines.len(), "grouping choke lines");
    let choke_sets = chokes::group_chokes(&choke_lines);

    let chokes: Vec<Choke> = choke_sets.into_iter().map(emit_choke).collect();

    info!(
        overlord_spots = overlord_spots.len(),
        chokes = chokes.len(),
        "map analysis complete"
    );

    Ok(MapAnalysis {
        climber_grid,
        overlord_spots,
        chokes,
    })
}

/// Swap a grouped choke into `(row, col)` output coordinates
fn emit_choke(set: chokes::ChokeSet) -> Choke {
    let swap_i = |p: glam::IVec2| (p.y, p.x);
    let swap_f = |p: glam::Vec2| (p.y, p.x);

    Choke {
        main_line: (swap_f(set.main_line.0), swap_f(set.main_line.1)),
        lines: set
            .lines
            .iter()
            .map(|l| (swap_i(l.start), swap_i(l.end)))
            .collect(),
        side1: set.side1.iter().copied().map(swap_i).collect(),
        side2: set.side2.iter().copied().map(swap_i).collect(),
        pixels: set.pixels.iter().copied().map(swap_i).collect(),
        min_length: set.min_length,
    }
}
