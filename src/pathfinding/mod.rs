//! Weighted-grid pathfinding
//!
//! A* over row-major float grids with two movement policies (default and
//! large-unit), an optional teleport overlay folded into the search, bounded
//! Dijkstra reachability, and straight-line path smoothing.
//!
//! Grids are indexed `k = w * y + x`; cells with non-finite weight are
//! unpathable. All emitted coordinates are `(row, col)` pairs — the swap from
//! internal `(x, y)` geometry happens here and nowhere else.

mod astar;
mod dijkstra;
mod heap;
mod smoothing;

pub use dijkstra::nodes_within_distance;

pub(crate) use smoothing::smooth_path;

use tracing::{debug, warn};

use crate::errors::{AnalyzerError, Result};

/// √2 to the precision the cost model was tuned with
pub(crate) const SQRT2: f32 = 1.41421;

/// Octile distance between two cells: the exact cost of the cheapest
/// eight-connected walk on an unweighted grid
#[inline]
pub(crate) fn octile(a: (i32, i32), b: (i32, i32)) -> f32 {
    let dx = (a.0 - b.0).abs();
    let dy = (a.1 - b.1).abs();
    dx.max(dy) as f32 + (SQRT2 - 1.0) * dx.min(dy) as f32
}

/// Euclidean distance between two cells
#[inline]
pub(crate) fn euclidean(a: (i32, i32), b: (i32, i32)) -> f32 {
    let dx = (a.0 - b.0) as f32;
    let dy = (a.1 - b.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Cheapest finite-or-not cell weight; the heuristic scale factor.
/// A zero-weight cell collapses the heuristic and the search degrades to
/// Dijkstra, which keeps it admissible.
#[inline]
pub(crate) fn find_min_weight(weights: &[f32]) -> f32 {
    weights.iter().fold(f32::INFINITY, |m, &v| m.min(v))
}

fn validate_grid(weights: &[f32], h: usize, w: usize) -> Result<()> {
    if w == 0 || h == 0 {
        return Err(AnalyzerError::invalid_arguments(format!(
            "grid dimensions must be positive, got {}x{}",
            h, w
        )));
    }
    if weights.len() != w * h {
        return Err(AnalyzerError::invalid_arguments(format!(
            "weight grid has {} cells, expected {}x{} = {}",
            weights.len(),
            h,
            w,
            w * h
        )));
    }
    if let Some(bad) = weights.iter().position(|v| *v < 0.0) {
        return Err(AnalyzerError::invalid_arguments(format!(
            "negative weight {} at cell {}",
            weights[bad], bad
        )));
    }
    Ok(())
}

/// True when the endpoint can take part in a search at all
fn endpoint_usable(weights: &[f32], idx: usize) -> bool {
    idx < weights.len() && weights[idx].is_finite()
}

fn reconstruct(predecessors: &[i32], steps: i32, goal: usize) -> Vec<usize> {
    let len = steps as usize;
    let mut path = vec![0usize; len];
    let mut idx = goal;
    for slot in (0..len).rev() {
        path[slot] = idx;
        if slot > 0 {
            idx = predecessors[idx] as usize;
        }
    }
    path
}

#[inline]
fn to_row_col(idx: usize, w: usize) -> (i32, i32) {
    ((idx / w) as i32, (idx % w) as i32)
}

/// Find the cheapest weighted path between two cells.
///
/// Returns `Ok(None)` when the goal is unreachable or either endpoint is
/// outside the grid or unpathable. The path is emitted as `(row, col)`
/// pairs, start and goal included.
pub fn astar(
    weights: &[f32],
    h: usize,
    w: usize,
    start: usize,
    goal: usize,
    large_unit: bool,
    smoothing: bool,
) -> Result<Option<Vec<(i32, i32)>>> {
    validate_grid(weights, h, w)?;

    if !endpoint_usable(weights, start) || !endpoint_usable(weights, goal) {
        warn!(start, goal, "pathfinding endpoints unusable");
        return Ok(None);
    }

    let outcome = astar::run_search(weights, h, w, start, goal, large_unit, &[]);
    if outcome.steps < 0 {
        debug!(start, goal, "no path");
        return Ok(None);
    }

    let mut path = reconstruct(&outcome.predecessors, outcome.steps, goal);
    if smoothing {
        path = smooth_path(weights, w, &path);
    }
    debug!(start, goal, cells = path.len(), "path found");

    Ok(Some(path.into_iter().map(|idx| to_row_col(idx, w)).collect()))
}

/// Find the cheapest weighted path with teleport structures folded in.
///
/// Returns one segment when the path never hops between structures, or two
/// segments split at the first hop: the first ends on the entry structure,
/// the second starts on the exit structure.
pub fn astar_with_teleport(
    weights: &[f32],
    h: usize,
    w: usize,
    teleports: &[usize],
    start: usize,
    goal: usize,
    large_unit: bool,
    smoothing: bool,
) -> Result<Option<Vec<Vec<(i32, i32)>>>> {
    validate_grid(weights, h, w)?;

    if let Some(&bad) = teleports.iter().find(|&&t| t >= w * h) {
        return Err(AnalyzerError::invalid_arguments(format!(
            "teleport index {} outside {}x{} grid",
            bad, h, w
        )));
    }

    if !endpoint_usable(weights, start) || !endpoint_usable(weights, goal) {
        warn!(start, goal, "pathfinding endpoints unusable");
        return Ok(None);
    }

    let outcome = astar::run_search(weights, h, w, start, goal, large_unit, teleports);
    if outcome.steps < 0 {
        debug!(start, goal, "no path");
        return Ok(None);
    }

    let path = reconstruct(&outcome.predecessors, outcome.steps, goal);

    let hop_at = (1..path.len()).find(|&i| outcome.hop_entries[path[i]]);
    let segments: Vec<Vec<usize>> = match hop_at {
        Some(i) => vec![path[..i].to_vec(), path[i..].to_vec()],
        None => vec![path],
    };

    let segments = segments
        .into_iter()
        .map(|seg| {
            let seg = if smoothing {
                smooth_path(weights, w, &seg)
            } else {
                seg
            };
            seg.into_iter().map(|idx| to_row_col(idx, w)).collect()
        })
        .collect();

    Ok(Some(segments))
}
