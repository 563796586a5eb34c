//! Bounded Dijkstra expansion over a weighted grid
//!
//! Used by the choke detector to ask "which border cells can I already reach
//! by walking along the border itself", and exposed for callers building
//! their own reachability passes.

use super::heap::{SearchHeap, SearchNode};
use super::SQRT2;

/// Collect every cell reachable from `(x, y)` within `max_distance`
/// cumulative weighted cost, in the order the search settles them.
///
/// Expansion is plain eight-connected: cardinal steps cost the target cell's
/// weight, diagonal steps the weight times √2. Cells with non-finite weight
/// never relax. The start cell is always first in the returned list.
pub fn nodes_within_distance(
    weights: &[f32],
    h: usize,
    w: usize,
    x: usize,
    y: usize,
    max_distance: f32,
) -> Vec<usize> {
    let cells = w * h;
    debug_assert_eq!(weights.len(), cells);

    let start = w * y + x;
    let mut costs = vec![f32::INFINITY; cells];
    let mut heap = SearchHeap::new(cells);
    let mut reached = Vec::new();

    costs[start] = 0.0;
    heap.push_or_update(SearchNode {
        idx: start,
        cost: 0.0,
        steps: 1,
        is_teleport: false,
    });

    let (wi, hi) = (w as i32, h as i32);

    while let Some(cur) = heap.pop() {
        reached.push(cur.idx);

        let row = (cur.idx / w) as i32;
        let col = (cur.idx % w) as i32;

        for (dr, dc) in [
            (-1, 0),
            (0, -1),
            (0, 1),
            (1, 0),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ] {
            let (nr, nc) = (row + dr, col + dc);
            if nr < 0 || nr >= hi || nc < 0 || nc >= wi {
                continue;
            }
            let nbr = (nr * wi + nc) as usize;

            let step = if dr != 0 && dc != 0 {
                weights[nbr] * SQRT2
            } else {
                weights[nbr]
            };
            let new_cost = costs[cur.idx] + step;

            if new_cost < costs[nbr] {
                costs[nbr] = new_cost;
                if new_cost < max_distance {
                    heap.push_or_update(SearchNode {
                        idx: nbr,
                        cost: new_cost,
                        steps: cur.steps + 1,
                        is_teleport: false,
                    });
                }
            }
        }
    }

    reached
}
