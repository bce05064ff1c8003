use super::{simplify, simplify_line};
use geo_types::{Geometry, LineString, Point};

fn zigzag() -> LineString<f64> {
    LineString::from(vec![
        (0.0, 0.0),
        (1.0, 0.1),
        (2.0, -0.1),
        (3.0, 0.05),
        (4.0, -0.05),
        (5.0, 0.1),
        (6.0, 0.0),
        (10.0, 0.0),
    ])
}

#[test]
fn test_short_lines_untouched() {
    let two = LineString::from(vec![(0.0, 0.0), (10.0, 10.0)]);
    assert_eq!(simplify_line(&two, 100.0), two);
}

#[test]
fn test_non_lines_pass_through() {
    let pt: Geometry<f64> = Point::new(1.0, 2.0).into();
    assert_eq!(simplify(&pt, 100.0), pt);
}

#[test]
fn test_zero_tolerance_is_identity() {
    // With tolerance 0 the removal threshold is strictly below 0, so even
    // collinear vertices survive.
    let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    assert_eq!(simplify_line(&line, 0.0), line);
}

#[test]
fn test_endpoints_preserved() {
    let line = zigzag();
    let out = simplify_line(&line, 2.0);
    assert_eq!(out.0.first(), line.0.first());
    assert_eq!(out.0.last(), line.0.last());
}

#[test]
fn test_result_is_subsequence() {
    let line = zigzag();
    let out = simplify_line(&line, 1.0);
    let mut cursor = 0;
    for c in &out.0 {
        let pos = line.0[cursor..].iter().position(|o| o == c);
        assert!(pos.is_some(), "vertex {:?} not in order in the original", c);
        cursor += pos.unwrap() + 1;
    }
}

#[test]
fn test_idempotent() {
    let line = zigzag();
    for t in [0.1, 0.5, 1.0, 3.0] {
        let once = simplify_line(&line, t);
        let twice = simplify_line(&once, t);
        assert_eq!(once, twice, "second pass removed vertices at t={}", t);
    }
}

#[test]
fn test_monotone_in_tolerance() {
    let line = zigzag();
    let mut prev = usize::MAX;
    for t in [0.0, 0.1, 0.3, 0.6, 1.0, 2.0, 5.0] {
        let n = simplify_line(&line, t).0.len();
        assert!(n <= prev, "vertex count grew from {} to {} at t={}", prev, n, t);
        prev = n;
    }
}

#[test]
fn test_large_tolerance_leaves_endpoints_only() {
    let out = simplify_line(&zigzag(), 100.0);
    assert_eq!(out.0.len(), 2);
}

#[test]
fn test_neighbor_protection_needs_second_pass() {
    // Three tiny bumps in a row: one pass cannot remove adjacent apexes, so
    // the fixed-point loop has to run more than once to flatten them all.
    let line = LineString::from(vec![
        (0.0, 0.0),
        (1.0, 0.01),
        (2.0, -0.01),
        (3.0, 0.01),
        (4.0, 0.0),
        (5.0, 0.0),
    ]);
    let out = simplify_line(&line, 1.0);
    assert_eq!(out.0.len(), 2);
}
