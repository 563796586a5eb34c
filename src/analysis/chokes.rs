//! Choke detection: ray casting between border cells and segment grouping
//!
//! A choke is a narrow walkable passage between two stretches of border.
//! Candidate line segments are found by probing straight rays between border
//! cells that are close in the air but far apart along the border itself;
//! segments sharing endpoints are then agglomerated into choke objects.

use glam::{IVec2, Vec2};

use super::terrain::BORDER;
use super::PlayArea;
use crate::pathfinding::{euclidean, nodes_within_distance, octile, SQRT2};

/// Maximum air distance between the two sides of a choke
const CHOKE_DISTANCE: f32 = 13.0;
/// Minimum air distance; anything closer is the same wall
const CHOKE_MIN_DISTANCE: f32 = 2.0;
/// Border-walk budget: cells connected within this cost share a wall
const CHOKE_BORDER_DISTANCE: f32 = 30.0;
/// Members may exceed the shortest line of their choke by this much
const LINE_LENGTH_SLACK: f32 = 2.5;
/// Chokes with fewer member lines than this are noise
const MIN_CHOKE_LINES: usize = 4;

/// A candidate segment between two border cells, in `(x, y)` cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IntLine {
    pub start: IVec2,
    pub end: IVec2,
}

impl IntLine {
    fn length(&self) -> f32 {
        euclidean((self.start.x, self.start.y), (self.end.x, self.end.y))
    }

    fn reversed(&self) -> IntLine {
        IntLine {
            start: self.end,
            end: self.start,
        }
    }
}

/// A grouped choke in internal `(x, y)` coordinates
#[derive(Debug, Clone)]
pub(crate) struct ChokeSet {
    pub main_line: (Vec2, Vec2),
    pub lines: Vec<IntLine>,
    pub side1: Vec<IVec2>,
    pub side2: Vec<IVec2>,
    pub pixels: Vec<IVec2>,
    pub min_length: f32,
}

#[inline]
fn point_octile(a: IVec2, b: IVec2) -> f32 {
    octile((a.x, a.y), (b.x, b.y))
}

impl ChokeSet {
    fn seed(line: IntLine) -> Self {
        Self {
            main_line: (line.start.as_vec2(), line.end.as_vec2()),
            lines: vec![line],
            side1: vec![line.start],
            side2: vec![line.end],
            pixels: Vec::new(),
            min_length: line.length(),
        }
    }

    /// Append a member whose start belongs to side1 and end to side2
    fn add_line(&mut self, line: IntLine) {
        self.lines.push(line);
        if !self.side1.contains(&line.start) {
            self.side1.push(line.start);
        }
        if !self.side2.contains(&line.end) {
            self.side2.push(line.end);
        }
    }
}

/// Probe all candidate partners of one border cell and emit surviving
/// segments
///
/// Scans the rectangle ahead of `(x, y)` (the sweep itself covers the cells
/// behind), keeps pairs whose air distance is inside the choke window and
/// which are not already connected along the border, then runs the straight
/// and perpendicular walkability probes.
pub(crate) fn collect_choke_lines_at(
    flags: &[u8],
    choke_weights: &[f32],
    walkable: &[u8],
    h: usize,
    w: usize,
    x: i32,
    y: i32,
    play: &PlayArea,
    lines: &mut Vec<IntLine>,
) {
    let wi = w as i32;
    let hi = h as i32;

    if flags[(wi * y + x) as usize] & BORDER == 0 {
        return;
    }

    let reachable = nodes_within_distance(
        choke_weights,
        h,
        w,
        x as usize,
        y as usize,
        CHOKE_BORDER_DISTANCE,
    );

    let cell_walkable = |cx: i32, cy: i32| -> bool {
        cx >= 0 && cx < wi && cy >= 0 && cy < hi && walkable[(wi * cy + cx) as usize] == 1
    };

    let xmin = x;
    let xmax = (x + CHOKE_DISTANCE as i32).min(play.x_end);
    let ymin = (y - CHOKE_DISTANCE as i32).max(play.y_start);
    let ymax = (y + CHOKE_DISTANCE as i32).min(play.y_end);

    for ynew in ymin..ymax {
        for xnew in xmin..xmax {
            if flags[(wi * ynew + xnew) as usize] & BORDER == 0 {
                continue;
            }

            let flight_distance = euclidean((x, y), (xnew, ynew));
            if flight_distance > CHOKE_DISTANCE || flight_distance < CHOKE_MIN_DISTANCE {
                continue;
            }

            // Connected along the border already: the pair brackets a wall,
            // not a passage
            if reachable.contains(&((wi * ynew + xnew) as usize)) {
                continue;
            }

            let dots = flight_distance as i32;
            let unit = Vec2::new(
                (xnew - x) as f32 / flight_distance,
                (ynew - y) as f32 / flight_distance,
            );

            // Straight probe: the ray between the two border cells must stay
            // on walkable ground the whole way
            let mut wall_hit = false;
            for i in 1..(2 * dots) {
                let draw_x = (x as f32 + unit.x * 0.5 * i as f32) as i32;
                let draw_y = (y as f32 + unit.y * 0.5 * i as f32) as i32;

                if (draw_x == x && draw_y == y) || (draw_x == xnew && draw_y == ynew) {
                    continue;
                }
                if !cell_walkable(draw_x, draw_y) {
                    wall_hit = true;
                    break;
                }
            }

            // Perpendicular probe: longer rays must also have open ground
            // across the midpoint, or the "passage" is a dead pocket
            if !wall_hit && dots > 4 {
                let center = Vec2::new((x + xnew) as f32 * 0.5, (y + ynew) as f32 * 0.5);
                let perpendicular = Vec2::new(-unit.y, unit.x);
                let half_dots = dots / 2;

                for i in -half_dots..half_dots {
                    let draw_x = (center.x + perpendicular.x * i as f32) as i32;
                    let draw_y = (center.y + perpendicular.y * i as f32) as i32;
                    if !cell_walkable(draw_x, draw_y) {
                        wall_hit = true;
                        break;
                    }
                }
            }

            if !wall_hit {
                lines.push(IntLine {
                    start: IVec2::new(x, y),
                    end: IVec2::new(xnew, ynew),
                });
            }
        }
    }
}

/// Agglomerate candidate segments into chokes and post-process each one
pub(crate) fn group_chokes(lines: &[IntLine]) -> Vec<ChokeSet> {
    let mut used = vec![false; lines.len()];
    let mut chokes: Vec<ChokeSet> = Vec::new();

    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut choke = ChokeSet::seed(lines[i]);

        // Fix-point expansion: keep sweeping the remaining segments until a
        // whole pass adds nothing
        let mut last_count = 0;
        let mut current_count = choke.lines.len();
        while last_count < current_count {
            for j in (i + 1)..lines.len() {
                if used[j] {
                    continue;
                }
                let check = lines[j];

                for k in 0..choke.side1.len() {
                    let p1 = choke.side1[k];
                    let mut added = false;

                    if point_octile(check.start, p1) <= SQRT2 {
                        for l in 0..choke.side2.len() {
                            let p2 = choke.side2[l];
                            if point_octile(check.end, p2) <= SQRT2 {
                                used[j] = true;
                                if point_octile(check.start, p1) > 0.0
                                    || point_octile(check.end, p2) > 0.0
                                {
                                    choke.add_line(check);
                                    added = true;
                                }
                                break;
                            }
                        }
                    }

                    // Same test the other way round: the segment joins with
                    // its endpoints swapped
                    if point_octile(check.end, p1) <= SQRT2 {
                        for l in 0..choke.side2.len() {
                            let p2 = choke.side2[l];
                            if point_octile(check.start, p2) <= SQRT2 {
                                used[j] = true;
                                if point_octile(check.end, p1) > 0.0
                                    || point_octile(check.start, p2) > 0.0
                                {
                                    choke.add_line(check.reversed());
                                    added = true;
                                    break;
                                }
                            }
                        }
                    }

                    if added {
                        break;
                    }
                }
            }
            last_count = current_count;
            current_count = choke.lines.len();
        }

        chokes.push(choke);
    }

    let mut i = chokes.len();
    while i > 0 {
        i -= 1;
        remove_excess_lines(&mut chokes[i]);
        calc_main_line(&mut chokes[i]);
        if chokes[i].lines.len() < MIN_CHOKE_LINES {
            chokes.swap_remove(i);
        } else {
            set_pixels(&mut chokes[i]);
        }
    }

    chokes
}

/// Drop members much longer than the shortest line; they span the passage
/// diagonally and only blur the geometry
fn remove_excess_lines(choke: &mut ChokeSet) {
    let distances: Vec<f32> = choke.lines.iter().map(IntLine::length).collect();
    let min_distance = distances.iter().fold(f32::INFINITY, |m, &d| m.min(d));

    let mut kept = Vec::new();
    for i in (0..choke.lines.len()).rev() {
        if distances[i] <= min_distance + LINE_LENGTH_SLACK {
            kept.push(choke.lines[i]);
        }
    }

    choke.lines = kept;
    choke.min_length = min_distance;
}

/// The main line runs centroid to centroid across the passage
fn calc_main_line(choke: &mut ChokeSet) {
    let side_mean = |side: &[IVec2]| -> Vec2 {
        let sum = side.iter().fold(Vec2::ZERO, |acc, p| acc + p.as_vec2());
        sum / side.len() as f32
    };
    choke.main_line = (side_mean(&choke.side1), side_mean(&choke.side2));
}

/// Rasterize the interior of every member line, endpoints excluded,
/// first occurrence wins
fn set_pixels(choke: &mut ChokeSet) {
    let mut pixels: Vec<IVec2> = Vec::new();

    for line in &choke.lines {
        let flight_distance = line.length();
        let dots = flight_distance as i32;
        let unit = (line.end - line.start).as_vec2() / flight_distance;

        for i in 1..(2 * dots) {
            let draw = IVec2::new(
                (line.start.x as f32 + unit.x * i as f32 * 0.5) as i32,
                (line.start.y as f32 + unit.y * i as f32 * 0.5) as i32,
            );
            if draw == line.start || draw == line.end {
                continue;
            }
            if !pixels.contains(&draw) {
                pixels.push(draw);
            }
        }
    }

    choke.pixels = pixels;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> IntLine {
        IntLine {
            start: IVec2::new(x0, y0),
            end: IVec2::new(x1, y1),
        }
    }

    /// Four parallel segments across a six-wide gap, two per wall tip
    fn gap_lines() -> Vec<IntLine> {
        vec![
            line(14, 19, 21, 19),
            line(14, 19, 21, 20),
            line(14, 20, 21, 19),
            line(14, 20, 21, 20),
        ]
    }

    #[test]
    fn test_segments_group_into_one_choke() {
        let chokes = group_chokes(&gap_lines());
        assert_eq!(chokes.len(), 1);
        assert_eq!(chokes[0].lines.len(), 4);
        assert_eq!(chokes[0].side1.len(), 2);
        assert_eq!(chokes[0].side2.len(), 2);
        assert!((chokes[0].min_length - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_main_line_is_side_centroids() {
        let chokes = group_chokes(&gap_lines());
        let (p1, p2) = chokes[0].main_line;
        assert!((p1.x - 14.0).abs() < 1e-4 && (p1.y - 19.5).abs() < 1e-4);
        assert!((p2.x - 21.0).abs() < 1e-4 && (p2.y - 19.5).abs() < 1e-4);
    }

    #[test]
    fn test_pixels_cover_gap_interior() {
        let chokes = group_chokes(&gap_lines());
        let choke = &chokes[0];
        assert!(!choke.pixels.is_empty());
        // The horizontal member rasterizes the middle of the gap
        assert!(choke.pixels.contains(&IVec2::new(17, 19)));
        for p in &choke.pixels {
            assert!(
                p.x >= 14 && p.x <= 21 && p.y >= 19 && p.y <= 20,
                "pixel {:?} outside the gap",
                p
            );
        }
        // A line's own endpoints never enter via its own rasterization:
        // every pure-horizontal sample strictly between the tips
        assert!(!choke.pixels.contains(&IVec2::new(21, 19)));
        assert!(!choke.pixels.contains(&IVec2::new(21, 20)));
        // No duplicates
        for (a, p) in choke.pixels.iter().enumerate() {
            assert!(!choke.pixels[a + 1..].contains(p));
        }
    }

    #[test]
    fn test_small_groups_are_dropped() {
        let lines = vec![line(4, 4, 9, 4), line(4, 5, 9, 5)];
        assert!(group_chokes(&lines).is_empty());
    }

    #[test]
    fn test_excess_lines_are_trimmed() {
        // A chain of attachable segments where the last one spans the gap
        // far more diagonally than the shortest member tolerates
        let lines = vec![
            line(14, 18, 21, 18),
            line(14, 19, 21, 19),
            line(13, 17, 21, 18),
            line(12, 16, 21, 20),
            line(14, 17, 21, 17),
        ];
        let chokes = group_chokes(&lines);
        assert_eq!(chokes.len(), 1);
        let choke = &chokes[0];
        // The sqrt(97) outlier is attached during grouping, trimmed after
        assert_eq!(choke.lines.len(), 4);
        assert!((choke.min_length - 7.0).abs() < 1e-4);
        assert!(choke
            .lines
            .iter()
            .all(|l| l.length() <= choke.min_length + LINE_LENGTH_SLACK));
    }

    #[test]
    fn test_attach_boundary_is_one_diagonal() {
        // An endpoint exactly one diagonal away still attaches; two cells
        // away seeds its own group instead
        let mut lines = gap_lines();
        lines.push(line(13, 18, 21, 19));
        let chokes = group_chokes(&lines);
        assert_eq!(chokes.len(), 1);
        assert_eq!(chokes[0].lines.len(), 5);
        assert!(chokes[0].side1.contains(&IVec2::new(13, 18)));

        let mut lines = gap_lines();
        lines.push(line(14, 17, 21, 19));
        let chokes = group_chokes(&lines);
        // The distant segment forms a one-line group that gets dropped
        assert_eq!(chokes.len(), 1);
        assert_eq!(chokes[0].lines.len(), 4);
        assert!(!chokes[0].side1.contains(&IVec2::new(14, 17)));
    }

    #[test]
    fn test_reversed_segment_attaches_swapped() {
        let mut lines = gap_lines();
        lines.push(line(21, 21, 14, 20));
        let chokes = group_chokes(&lines);
        assert_eq!(chokes.len(), 1);
        // Its start endpoint lands on side2 after the swap
        assert!(chokes[0].side2.contains(&IVec2::new(21, 21)));
    }
}
