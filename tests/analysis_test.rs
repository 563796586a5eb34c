use map_analyzer::analyze_map;

/// 40x40 map: two open rooms separated by a four-cell-thick wall with a
/// six-wide gap. The wall tips on either side of the gap face each other
/// across open ground, which is exactly what a choke looks like.
///
/// Internal geometry: playable cells are x,y in 2..38; the wall occupies
/// y in 18..=21 for x in 2..=37 minus the gap columns x in 15..=20.
fn two_room_map() -> (Vec<u8>, Vec<u8>, usize, usize) {
    let (w, h) = (40usize, 40usize);
    let mut walkable = vec![0u8; w * h];
    let heights = vec![32u8; w * h];

    for y in 2..38 {
        for x in 2..38 {
            walkable[y * w + x] = 1;
        }
    }
    for y in 18..=21 {
        for x in 2..=37 {
            if !(15..=20).contains(&x) {
                walkable[y * w + x] = 0;
            }
        }
    }
    (walkable, heights, h, w)
}

/// 12x12 map split by a cliff: rows 0..=5 one terrace above rows 6.., with
/// the unwalkable cliff face on row 5.
fn terraced_map() -> (Vec<u8>, Vec<u8>, usize, usize) {
    let (w, h) = (12usize, 12usize);
    let mut walkable = vec![1u8; w * h];
    let mut heights = vec![32u8; w * h];
    for y in 0..=5 {
        for x in 0..w {
            heights[y * w + x] = 48;
        }
    }
    for x in 0..w {
        walkable[5 * w + x] = 0;
    }
    (walkable, heights, h, w)
}

#[test]
fn test_two_rooms_produce_one_choke() {
    let (walkable, heights, h, w) = two_room_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 38, 2, 38).unwrap();

    assert_eq!(analysis.chokes.len(), 1, "the gap is the only choke");
    let choke = &analysis.chokes[0];

    // Four border cells per wall tip give ten surviving probe lines
    assert_eq!(choke.lines.len(), 10);
    assert!((choke.min_length - 7.0).abs() < 1e-3);

    // Main line runs across the gap, centroid to centroid, in (row, col)
    let ((r0, c0), (r1, c1)) = choke.main_line;
    assert!((r0 - 19.5).abs() < 1e-3 && (c0 - 14.0).abs() < 1e-3);
    assert!((r1 - 19.5).abs() < 1e-3 && (c1 - 21.0).abs() < 1e-3);

    // One side per wall tip
    assert_eq!(choke.side1.len(), 4);
    assert_eq!(choke.side2.len(), 4);
    for row in 18..=21 {
        assert!(choke.side1.contains(&(row, 14)));
        assert!(choke.side2.contains(&(row, 21)));
    }

    // Flat map: nothing to climb, nowhere to park an overlord
    assert!(analysis.overlord_spots.is_empty());
    assert!(analysis.climber_grid.iter().all(|&v| v == 0.0));
}

#[test]
fn test_choke_member_lines_are_tight() {
    let (walkable, heights, h, w) = two_room_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 38, 2, 38).unwrap();

    for choke in &analysis.chokes {
        assert!(choke.lines.len() >= 4);
        for &((r0, c0), (r1, c1)) in &choke.lines {
            let length = (((r1 - r0).pow(2) + (c1 - c0).pow(2)) as f32).sqrt();
            assert!(length <= choke.min_length + 2.5);
        }
    }
}

#[test]
fn test_choke_pixels_fill_the_gap() {
    let (walkable, heights, h, w) = two_room_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 38, 2, 38).unwrap();
    let choke = &analysis.chokes[0];

    assert!(!choke.pixels.is_empty());
    for &(row, col) in &choke.pixels {
        assert!(
            (18..=21).contains(&row) && (15..=20).contains(&col),
            "pixel ({}, {}) outside the gap interior",
            row,
            col
        );
    }
    // No duplicates
    for (i, p) in choke.pixels.iter().enumerate() {
        assert!(!choke.pixels[i + 1..].contains(p));
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let (walkable, heights, h, w) = two_room_map();
    let first = analyze_map(&walkable, &heights, h, w, 2, 38, 2, 38).unwrap();
    let second = analyze_map(&walkable, &heights, h, w, 2, 38, 2, 38).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cliff_yields_climber_mask() {
    let (walkable, heights, h, w) = terraced_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 10, 2, 10).unwrap();

    // The climbable cliff cells chain along row 5
    for x in 2..10 {
        assert!(
            analysis.climber_grid[5 * w + x] > 0.0,
            "cliff cell (5, {}) missing from the climber mask",
            x
        );
    }
    // Ground above and below stays unclimbable
    assert!(analysis.climber_grid[4 * w + 5] == 0.0);
    assert!(analysis.climber_grid[6 * w + 5] == 0.0);
}

#[test]
fn test_high_terrace_yields_overlord_spot() {
    let (walkable, heights, h, w) = terraced_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 10, 2, 10).unwrap();

    assert_eq!(analysis.overlord_spots.len(), 1);
    let (row, col) = analysis.overlord_spots[0];
    // Centroid of the upper terrace plus its fill boundary
    assert!((row - 3.0).abs() < 1e-3);
    assert!((col - 5.5).abs() < 1e-3);
    // The spot sits on the terrace itself
    assert!(row < 6.0);
}

#[test]
fn test_cliff_line_is_not_a_choke() {
    // Every border cell along the cliff can reach its neighbors by walking
    // the border, so no choke lines survive
    let (walkable, heights, h, w) = terraced_map();
    let analysis = analyze_map(&walkable, &heights, h, w, 2, 10, 2, 10).unwrap();
    assert!(analysis.chokes.is_empty());
}

#[test]
fn test_bad_arguments_are_rejected() {
    let (walkable, heights, h, w) = terraced_map();
    // Wrong grid size
    assert!(analyze_map(&walkable[1..], &heights, h, w, 2, 10, 2, 10).is_err());
    // Play area outside the grid
    assert!(analyze_map(&walkable, &heights, h, w, 2, 20, 2, 10).is_err());
    assert!(analyze_map(&walkable, &heights, h, w, -1, 10, 2, 10).is_err());
}
