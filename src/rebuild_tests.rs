use super::{rebuild, Rebuilt, DEFAULT_DROP_RATIO};
use geo::algorithm::winding_order::Winding;
use geo::Area;
use geo_types::{Geometry, LineString, MultiLineString, Polygon};

fn rect(w: f64, h: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)]),
        vec![],
    )
}

#[test]
fn test_rebuild_from_fragments() {
    let original = rect(10.0, 10.0);
    let parts: Vec<Geometry<f64>> = vec![
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]).into(),
        LineString::from(vec![(10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]).into(),
    ];

    match rebuild(&original, &parts, 1.0, DEFAULT_DROP_RATIO) {
        Rebuilt::Polygon(p) => {
            assert!((p.unsigned_area() - 100.0).abs() < 1e-9);
            assert!(p.interiors().is_empty());
            // Output winding is normalized.
            assert!(p.exterior().is_ccw());
        }
        other => panic!("expected a polygon, got {:?}", other),
    }
}

#[test]
fn test_rebuild_decomposes_multi_part_fragments() {
    let original = rect(10.0, 10.0);
    let parts: Vec<Geometry<f64>> = vec![Geometry::MultiLineString(MultiLineString::new(vec![
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
        LineString::from(vec![(10.0, 0.0), (10.0, 10.0)]),
        LineString::from(vec![(10.0, 10.0), (0.0, 10.0)]),
        LineString::from(vec![(0.0, 10.0), (0.0, 0.0)]),
    ]))];

    match rebuild(&original, &parts, 1.0, DEFAULT_DROP_RATIO) {
        Rebuilt::Polygon(p) => assert!((p.unsigned_area() - 100.0).abs() < 1e-9),
        other => panic!("expected a polygon, got {:?}", other),
    }
}

#[test]
fn test_lossy_drop_above_threshold() {
    // Area 600, tolerance 10: lost_portion = 600 / 100 = 6 > 5.
    let original = rect(60.0, 10.0);
    let parts: Vec<Geometry<f64>> =
        vec![LineString::from(vec![(0.0, 0.0), (60.0, 0.0)]).into()];

    match rebuild(&original, &parts, 10.0, DEFAULT_DROP_RATIO) {
        Rebuilt::LossyDrop { lost_portion } => assert!((lost_portion - 6.0).abs() < 1e-9),
        other => panic!("expected a lossy drop, got {:?}", other),
    }
}

#[test]
fn test_benign_skip_below_threshold() {
    // Area 300, tolerance 10: lost_portion = 3 <= 5.
    let original = rect(30.0, 10.0);
    let parts: Vec<Geometry<f64>> =
        vec![LineString::from(vec![(0.0, 0.0), (30.0, 0.0)]).into()];

    match rebuild(&original, &parts, 10.0, DEFAULT_DROP_RATIO) {
        Rebuilt::BenignSkip { lost_portion } => assert!((lost_portion - 3.0).abs() < 1e-9),
        other => panic!("expected a benign skip, got {:?}", other),
    }
}

#[test]
fn test_failure_at_zero_tolerance_is_lossy() {
    let original = rect(1.0, 1.0);
    let parts: Vec<Geometry<f64>> =
        vec![LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]).into()];

    match rebuild(&original, &parts, 0.0, DEFAULT_DROP_RATIO) {
        Rebuilt::LossyDrop { lost_portion } => assert!(lost_portion.is_infinite()),
        other => panic!("expected a lossy drop, got {:?}", other),
    }
}

#[test]
fn test_custom_drop_ratio() {
    let original = rect(60.0, 10.0);
    let parts: Vec<Geometry<f64>> =
        vec![LineString::from(vec![(0.0, 0.0), (60.0, 0.0)]).into()];

    // Ratio 6 is not strictly exceeded by lost_portion 6.
    match rebuild(&original, &parts, 10.0, 6.0) {
        Rebuilt::BenignSkip { .. } => {}
        other => panic!("expected a benign skip at ratio 6, got {:?}", other),
    }
}
