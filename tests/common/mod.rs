//! Shared fixtures for the integration tests
#![allow(dead_code)]

pub const SQRT2: f32 = 1.41421;

/// Row-major index on a `w`-wide grid
pub fn idx(w: usize, row: usize, col: usize) -> usize {
    row * w + col
}

/// Uniform weight grid
pub fn uniform_grid(h: usize, w: usize, weight: f32) -> Vec<f32> {
    vec![weight; w * h]
}

/// Weighted cost of a returned `(row, col)` path: each step pays the target
/// cell's weight, diagonals scaled by √2
pub fn path_cost(weights: &[f32], w: usize, path: &[(i32, i32)]) -> f32 {
    path.windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let target = weights[idx(w, b.0 as usize, b.1 as usize)];
            if a.0 != b.0 && a.1 != b.1 {
                target * SQRT2
            } else {
                target
            }
        })
        .sum()
}

fn finite_at(weights: &[f32], h: usize, w: usize, row: i32, col: i32) -> bool {
    row >= 0
        && row < h as i32
        && col >= 0
        && col < w as i32
        && weights[idx(w, row as usize, col as usize)].is_finite()
}

/// Every consecutive pair is a legal default-policy move
pub fn assert_strict_moves(weights: &[f32], h: usize, w: usize, path: &[(i32, i32)]) {
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dr, dc) = (b.0 - a.0, b.1 - a.1);
        assert!(
            dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0),
            "step {:?} -> {:?} is not eight-connected",
            a,
            b
        );
        assert!(finite_at(weights, h, w, b.0, b.1), "stepped onto a wall at {:?}", b);
        if dr != 0 && dc != 0 {
            assert!(
                finite_at(weights, h, w, a.0 + dr, a.1) && finite_at(weights, h, w, a.0, a.1 + dc),
                "diagonal {:?} -> {:?} cuts a corner",
                a,
                b
            );
        }
    }
}

/// Every consecutive pair is a legal large-unit move
pub fn assert_large_moves(weights: &[f32], h: usize, w: usize, path: &[(i32, i32)]) {
    assert_strict_moves(weights, h, w, path);
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dr, dc) = (b.0 - a.0, b.1 - a.1);
        if dr == 0 || dc == 0 {
            let open = if dr != 0 {
                finite_at(weights, h, w, a.0 + dr, a.1 - 1)
                    || finite_at(weights, h, w, a.0 + dr, a.1 + 1)
            } else {
                finite_at(weights, h, w, a.0 - 1, a.1 + dc)
                    || finite_at(weights, h, w, a.0 + 1, a.1 + dc)
            };
            assert!(open, "cardinal {:?} -> {:?} squeezes a unit gap", a, b);
        }
    }
}

/// True when `needle` appears in `haystack` in order (not necessarily
/// contiguously)
pub fn is_subsequence(needle: &[(i32, i32)], haystack: &[(i32, i32)]) -> bool {
    let mut it = haystack.iter();
    needle.iter().all(|p| it.any(|q| q == p))
}
