//! Straight-line waypoint elimination
//!
//! A raw grid path zig-zags cell by cell. Smoothing drops an intermediate
//! waypoint whenever jumping straight from the last kept waypoint is no more
//! expensive than walking the accumulated curve, measured against a
//! rasterized integral of the cell weights under the jump line.

use super::octile;

/// Tolerated overshoot before a straight jump is considered worse than the
/// walked curve
const LINE_SLACK: f32 = 1.002;

#[inline]
fn cell_rc(idx: usize, w: usize) -> (i32, i32) {
    ((idx / w) as i32, (idx % w) as i32)
}

/// Weighted cost of a straight line between two cells
///
/// Samples the segment at five points per unit of length, deduplicates by
/// grid cell keeping first occurrence, and scales the summed weights back to
/// the segment length. Returns infinity as soon as a sample is unpathable.
pub(crate) fn line_weight(weights: &[f32], w: usize, from: usize, to: usize) -> f32 {
    let (fr, fc) = cell_rc(from, w);
    let (tr, tc) = cell_rc(to, w);

    let dr = (tr - fr) as f32;
    let dc = (tc - fc) as f32;
    let distance = (dr * dr + dc * dc).sqrt();
    if distance == 0.0 {
        return 0.0;
    }

    // Exactly five samples per unit of length, endpoints included
    let samples = ((5.0 * distance.floor()) as i32).max(2);

    let mut visited: Vec<usize> = Vec::with_capacity(samples as usize);
    let mut total = 0.0f32;

    for i in 0..samples {
        let t = i as f32 / (samples - 1) as f32;
        let row = (fr as f32 + dr * t) as i32;
        let col = (fc as f32 + dc * t) as i32;
        let cell = row as usize * w + col as usize;

        if visited.contains(&cell) {
            continue;
        }
        visited.push(cell);

        let weight = weights[cell];
        if !weight.is_finite() {
            return f32::INFINITY;
        }
        total += weight;
    }

    total * distance / visited.len() as f32
}

/// Drop intermediate waypoints whose straight-line bypass is not worse than
/// the walked path
///
/// The first and last cells are always preserved. Paths shorter than three
/// cells have nothing to drop.
pub(crate) fn smooth_path(weights: &[f32], w: usize, path: &[usize]) -> Vec<usize> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let step_cost = |from: usize, to: usize| -> f32 {
        weights[to] * octile(cell_rc(from, w), cell_rc(to, w))
    };

    let mut kept = vec![path[0]];
    // Walked cost from the last kept waypoint up to the probe target
    let mut segment_total = step_cost(path[0], path[1]);

    for i in 1..path.len() - 1 {
        let next = path[i + 1];
        segment_total += step_cost(path[i], next);

        let last = *kept.last().expect("kept path is never empty");
        if line_weight(weights, w, last, next) > segment_total * LINE_SLACK {
            kept.push(path[i]);
            segment_total = step_cost(path[i], next);
        }
    }

    kept.push(*path.last().expect("smoothing needs a non-empty path"));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_weight_matches_walk_on_uniform_row() {
        let weights = vec![1.0f32; 50];
        // (0,0) to (0,4) on a 10-wide grid: four unit steps
        let cost = line_weight(&weights, 10, 0, 4);
        assert!((cost - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_weight_short_circuits_on_wall() {
        let mut weights = vec![1.0f32; 50];
        weights[2] = f32::INFINITY;
        assert!(line_weight(&weights, 10, 0, 4).is_infinite());
    }

    #[test]
    fn test_straight_run_collapses_to_endpoints() {
        let weights = vec![1.0f32; 100];
        let path: Vec<usize> = (0..10).map(|col| 5 * 10 + col).collect();
        let smoothed = smooth_path(&weights, 10, &path);
        assert_eq!(smoothed, vec![path[0], path[9]]);
    }

    #[test]
    fn test_short_paths_unchanged() {
        let weights = vec![1.0f32; 9];
        assert_eq!(smooth_path(&weights, 3, &[0, 1]), vec![0, 1]);
        assert_eq!(smooth_path(&weights, 3, &[4]), vec![4]);
    }

    #[test]
    fn test_wall_corner_keeps_a_waypoint() {
        // L-shaped path around a wall: the straight probe crosses the wall,
        // so the corner survives
        let mut weights = vec![1.0f32; 49];
        for row in 0..6 {
            weights[row * 7 + 3] = f32::INFINITY;
        }
        let mut path: Vec<usize> = (0..7).map(|row| row * 7).collect();
        path.extend((1..7).map(|col| 6 * 7 + col));

        let smoothed = smooth_path(&weights, 7, &path);
        assert_eq!(*smoothed.first().unwrap(), 0);
        assert_eq!(*smoothed.last().unwrap(), 48);
        assert!(smoothed.len() > 2);
        assert!(smoothed.len() < path.len());
    }
}
