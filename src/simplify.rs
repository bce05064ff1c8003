use geo_types::{Coord, Geometry, LineString, MultiLineString};
use std::cmp::Ordering;

/// Simplifies any geometry with the effective-area rule.
///
/// Only `LineString`s are reduced; a `MultiLineString` is simplified part by
/// part and everything else passes through unchanged. Points and degenerate
/// fragments have nothing to simplify.
pub fn simplify(geom: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geom {
        Geometry::LineString(ls) => Geometry::LineString(simplify_line(ls, tolerance)),
        Geometry::MultiLineString(mls) => {
            let parts = mls.0.iter().map(|ls| simplify_line(ls, tolerance)).collect();
            Geometry::MultiLineString(MultiLineString::new(parts))
        }
        other => other.clone(),
    }
}

/// Effective-area vertex elimination (a Visvalingam–Whyatt variant).
///
/// Each interior vertex is scored by the area of the triangle it forms with
/// its two neighbors. Vertices are removed smallest-area first while the
/// area is strictly below `tolerance²`; removing a vertex protects its
/// neighbors for the rest of the pass, because their scores are stale until
/// recomputed. Passes repeat on the reduced sequence until one removes
/// nothing.
///
/// Endpoints are never touched and the result is a subsequence of the input
/// vertices. Lines with two or fewer vertices are returned as-is.
pub fn simplify_line(line: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    let mut coords = line.0.clone();
    if coords.len() <= 2 {
        return line.clone();
    }

    let min_area = tolerance * tolerance;

    // Each pass removes at least one vertex, so the original vertex count
    // bounds the number of passes even on pathological input.
    for _ in 0..line.0.len() {
        if coords.len() <= 2 {
            break;
        }

        let mut scored: Vec<(f64, usize)> = (1..coords.len() - 1)
            .map(|i| (triangle_area(coords[i - 1], coords[i], coords[i + 1]), i))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        if scored[0].0 >= min_area {
            break;
        }

        let mut removed = vec![false; coords.len()];
        let mut protected = vec![false; coords.len()];
        let mut removed_any = false;

        for &(area, i) in &scored {
            if area >= min_area {
                break;
            }
            if protected[i] {
                continue;
            }
            removed[i] = true;
            removed_any = true;
            protected[i - 1] = true;
            protected[i + 1] = true;
        }

        if !removed_any {
            break;
        }

        coords = coords
            .iter()
            .zip(removed.iter())
            .filter(|(_, &r)| !r)
            .map(|(c, _)| *c)
            .collect();
    }

    LineString::new(coords)
}

fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}

#[cfg(test)]
#[path = "simplify_tests.rs"]
mod tests;
