//! A* search core over row-major weighted grids
//!
//! Two movement policies share one search loop: the default policy blocks
//! diagonal corner cutting, the large-unit policy additionally refuses
//! cardinal moves through single-cell gaps. Teleport structures are folded
//! into the same search as extra edges rather than a separate planning pass.

use super::heap::{SearchHeap, SearchNode};
use super::{find_min_weight, octile, SQRT2};

/// Minimum improvement a relaxation must bring before a node is rewritten.
/// Guards against float reshuffling that does not change the actual path.
pub(crate) const COST_EPSILON: f32 = 0.03;

/// Entry, hop and walk-out edges around a teleport all pay this multiple of
/// the cheapest cell weight, modeling the traversal delay of the structure.
pub(crate) const TELEPORT_DELAY_FACTOR: f32 = 4.0;

/// Neighbor offsets in `(row, col)` form, cardinals first
const CARDINALS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

pub(crate) struct SearchOutcome {
    /// Cells on the found path, start included; -1 when the goal is unreachable
    pub steps: i32,
    /// Best-known previous cell for every relaxed cell
    pub predecessors: Vec<i32>,
    /// Cells whose best-known entry was a teleport-to-teleport hop
    pub hop_entries: Vec<bool>,
}

struct SearchGrid<'a> {
    weights: &'a [f32],
    w: i32,
    h: i32,
}

impl<'a> SearchGrid<'a> {
    #[inline]
    fn idx(&self, row: i32, col: i32) -> usize {
        (row * self.w + col) as usize
    }

    #[inline]
    fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.h && col >= 0 && col < self.w
    }

    #[inline]
    fn finite_at(&self, row: i32, col: i32) -> bool {
        self.in_bounds(row, col) && self.weights[self.idx(row, col)].is_finite()
    }

    /// Large units cannot squeeze through a single-cell gap: a cardinal step
    /// needs at least one of the two diagonals flanking it to be open.
    #[inline]
    fn cardinal_open_for_large(&self, row: i32, col: i32, dr: i32, dc: i32) -> bool {
        if dr != 0 {
            self.finite_at(row + dr, col - 1) || self.finite_at(row + dr, col + 1)
        } else {
            self.finite_at(row - 1, col + dc) || self.finite_at(row + 1, col + dc)
        }
    }
}

/// Run the search and return the predecessor table
///
/// `teleports` with fewer than two entries disables the overlay entirely.
pub(crate) fn run_search(
    weights: &[f32],
    h: usize,
    w: usize,
    start: usize,
    goal: usize,
    large_unit: bool,
    teleports: &[usize],
) -> SearchOutcome {
    let cells = w * h;
    let grid = SearchGrid {
        weights,
        w: w as i32,
        h: h as i32,
    };

    let weight_baseline = find_min_weight(weights);
    let teleport_active = teleports.len() >= 2;

    let goal_rc = ((goal / w) as i32, (goal % w) as i32);
    let teleport_rc: Vec<(i32, i32)> = teleports
        .iter()
        .map(|&t| ((t / w) as i32, (t % w) as i32))
        .collect();

    // Cheapest heuristic from the goal to any teleport, computed once
    let goal_teleport_h = teleport_rc
        .iter()
        .map(|&t| weight_baseline * octile(goal_rc, t))
        .fold(f32::INFINITY, f32::min);

    let teleport_toll = TELEPORT_DELAY_FACTOR * weight_baseline;

    // Keeps the heuristic admissible when a teleport shortcut may undercut
    // the direct octile estimate
    let heuristic = |cell: (i32, i32)| -> f32 {
        let direct = weight_baseline * octile(cell, goal_rc);
        if !teleport_active {
            return direct;
        }
        let nearest = teleport_rc
            .iter()
            .map(|&t| weight_baseline * octile(cell, t))
            .fold(f32::INFINITY, f32::min);
        direct.min(teleport_toll + nearest + goal_teleport_h)
    };

    let mut costs = vec![f32::INFINITY; cells];
    let mut predecessors = vec![-1i32; cells];
    let mut hop_entries = vec![false; cells];
    let mut heap = SearchHeap::new(cells);

    costs[start] = 0.0;
    heap.push_or_update(SearchNode {
        idx: start,
        cost: 0.0,
        steps: 1,
        is_teleport: teleport_active && teleports.contains(&start),
    });

    let mut result_steps = -1;

    while let Some(cur) = heap.pop() {
        if cur.idx == goal {
            result_steps = cur.steps;
            break;
        }

        let row = (cur.idx / w) as i32;
        let col = (cur.idx % w) as i32;
        let cur_cost = costs[cur.idx];

        let mut relax = |target: usize, new_cost: f32, entered_teleport: bool, via_hop: bool| {
            if new_cost + COST_EPSILON < costs[target] {
                costs[target] = new_cost;
                predecessors[target] = cur.idx as i32;
                hop_entries[target] = via_hop;
                heap.push_or_update(SearchNode {
                    idx: target,
                    cost: new_cost + heuristic(((target / w) as i32, (target % w) as i32)),
                    steps: cur.steps + 1,
                    is_teleport: entered_teleport,
                });
            }
        };

        if cur.is_teleport {
            // Walking out of a teleport covers two cells in one delayed move
            for &(dr, dc) in CARDINALS.iter().chain(DIAGONALS.iter()) {
                let (nr, nc) = (row + 2 * dr, col + 2 * dc);
                if !grid.finite_at(nr, nc) {
                    continue;
                }
                let geometry = if dr != 0 && dc != 0 { SQRT2 } else { 1.0 };
                let step = TELEPORT_DELAY_FACTOR * weights[grid.idx(nr, nc)] * geometry;
                relax(grid.idx(nr, nc), cur_cost + step, false, false);
            }
            // Hop to every sibling structure
            for &t in teleports {
                if t != cur.idx {
                    relax(t, cur_cost + teleport_toll, true, true);
                }
            }
            continue;
        }

        for &(dr, dc) in CARDINALS.iter() {
            let (nr, nc) = (row + dr, col + dc);
            if !grid.finite_at(nr, nc) {
                continue;
            }
            if large_unit && !grid.cardinal_open_for_large(row, col, dr, dc) {
                continue;
            }
            relax(grid.idx(nr, nc), cur_cost + weights[grid.idx(nr, nc)], false, false);
        }

        for &(dr, dc) in DIAGONALS.iter() {
            let (nr, nc) = (row + dr, col + dc);
            if !grid.finite_at(nr, nc) {
                continue;
            }
            // Diagonal moves may not cut a corner: both flanking cardinals
            // must be open
            if !grid.finite_at(row + dr, col) || !grid.finite_at(row, col + dc) {
                continue;
            }
            relax(
                grid.idx(nr, nc),
                cur_cost + weights[grid.idx(nr, nc)] * SQRT2,
                false,
                false,
            );
        }

        if teleport_active {
            // Standing next to a structure allows entering it regardless of
            // the terrain in between
            for (i, &t) in teleports.iter().enumerate() {
                let (tr, tc) = teleport_rc[i];
                if t != cur.idx && (tr - row).abs().max((tc - col).abs()) <= 2 {
                    relax(t, cur_cost + teleport_toll, true, false);
                }
            }
        }
    }

    SearchOutcome {
        steps: result_steps,
        predecessors,
        hop_entries,
    }
}
