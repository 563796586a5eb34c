//! Plateau flood fill for aerial observation spots
//!
//! A candidate cell seeds an iterative 4-neighbor fill across its height
//! terrace. The fill fails when the terrace runs into ground that is not a
//! full level below it (higher terrain poking through the plateau edge); a
//! failed region has its candidate flags stripped so it is not revisited.

use super::terrain::{HANDLED_OVERLORD_SPOT, IN_CURRENT_SET, OVERLORD_SPOT};
use super::LEVEL_DIFFERENCE;

/// Fill the terrace containing `(x, y)` at height `target`
///
/// Every visited cell (terrace and boundary alike) joins `touched` exactly
/// once via the IN_CURRENT_SET bit, which the caller clears afterwards.
/// On-terrace cells get OVERLORD_SPOT set or cleared per `mark`. Returns
/// false when any boundary cell is less than a full level below the terrace.
fn flood_fill_plateau(
    heights: &[u8],
    flags: &mut [u8],
    h: usize,
    w: usize,
    x: i32,
    y: i32,
    target: i32,
    mark: bool,
    touched: &mut Vec<usize>,
) -> bool {
    let (wi, hi) = (w as i32, h as i32);
    let mut level = true;
    let mut stack = vec![(x, y)];

    while let Some((cx, cy)) = stack.pop() {
        let k = (wi * cy + cx) as usize;
        if flags[k] & IN_CURRENT_SET != 0 {
            continue;
        }
        flags[k] |= IN_CURRENT_SET;
        touched.push(k);

        let cell_height = heights[k] as i32;
        if cell_height != target {
            if target < cell_height + LEVEL_DIFFERENCE {
                level = false;
            }
            // Boundary cells never expand
            continue;
        }

        if mark {
            flags[k] |= OVERLORD_SPOT;
        } else {
            flags[k] &= !OVERLORD_SPOT;
        }

        if cy > 0 {
            stack.push((cx, cy - 1));
        }
        if cx > 0 {
            stack.push((cx - 1, cy));
        }
        if cy < hi - 1 {
            stack.push((cx, cy + 1));
        }
        if cx < wi - 1 {
            stack.push((cx + 1, cy));
        }
    }

    level
}

/// Resolve one unhandled candidate into a spot centroid, or discard its
/// whole terrace
///
/// Success marks the touched region handled and returns the arithmetic mean
/// of its cells as `(row, col)`. Failure re-runs the fill to strip the
/// candidate flags from the region. The IN_CURRENT_SET bit is clean on
/// return either way.
pub(crate) fn resolve_overlord_spot(
    heights: &[u8],
    flags: &mut [u8],
    h: usize,
    w: usize,
    x: i32,
    y: i32,
) -> Option<(f32, f32)> {
    let target = heights[(w as i32 * y + x) as usize] as i32;
    let mut touched = Vec::new();

    if flood_fill_plateau(heights, flags, h, w, x, y, target, true, &mut touched) {
        let mut row_sum = 0.0f32;
        let mut col_sum = 0.0f32;
        for &k in &touched {
            flags[k] |= HANDLED_OVERLORD_SPOT;
            flags[k] &= !IN_CURRENT_SET;
            row_sum += (k / w) as f32;
            col_sum += (k % w) as f32;
        }
        let count = touched.len() as f32;
        Some((row_sum / count, col_sum / count))
    } else {
        for &k in &touched {
            flags[k] &= !IN_CURRENT_SET;
        }
        let mut cleared = Vec::new();
        flood_fill_plateau(heights, flags, h, w, x, y, target, false, &mut cleared);
        for &k in &cleared {
            flags[k] &= !IN_CURRENT_SET;
        }
        None
    }
}
