use super::RingGraph;
use geo::Area;
use geo_types::{LineString, Polygon};

fn ring_area(ring: &LineString<f64>) -> f64 {
    Polygon::new(ring.clone(), vec![]).unsigned_area()
}

#[test]
fn test_square_ring() {
    let mut graph = RingGraph::new();
    graph.add_line(&LineString::from(vec![
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ]));
    graph.sort_outgoing();
    assert_eq!(graph.prune_dangles(), 0);

    let ring = graph.rings().next().expect("no ring traced");
    assert!(ring.is_closed());
    assert!((ring_area(&ring) - 100.0).abs() < 1e-9);
}

#[test]
fn test_square_from_scrambled_fragments() {
    // Same square, fed as four separate segments with mixed directions.
    let mut graph = RingGraph::new();
    graph.add_line(&LineString::from(vec![(10.0, 10.0), (10.0, 0.0)]));
    graph.add_line(&LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]));
    graph.add_line(&LineString::from(vec![(0.0, 10.0), (0.0, 0.0)]));
    graph.add_line(&LineString::from(vec![(10.0, 10.0), (0.0, 10.0)]));
    graph.sort_outgoing();
    graph.prune_dangles();

    let ring = graph.rings().next().expect("no ring traced");
    assert!(ring.is_closed());
    assert!((ring_area(&ring) - 100.0).abs() < 1e-9);
}

#[test]
fn test_dangle_pruned_before_tracing() {
    let mut graph = RingGraph::new();
    graph.add_line(&LineString::from(vec![
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ]));
    // Tail hanging off a corner.
    graph.add_line(&LineString::from(vec![(10.0, 10.0), (20.0, 20.0), (30.0, 20.0)]));
    graph.sort_outgoing();
    assert_eq!(graph.prune_dangles(), 2);

    let rings: Vec<_> = graph.rings().collect();
    assert!(!rings.is_empty());
    for ring in &rings {
        assert!((ring_area(ring) - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_open_chain_yields_no_ring() {
    let mut graph = RingGraph::new();
    graph.add_line(&LineString::from(vec![(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]));
    graph.sort_outgoing();
    graph.prune_dangles();
    assert!(graph.rings().next().is_none());
}

#[test]
fn test_empty_graph() {
    let mut graph = RingGraph::new();
    assert!(graph.is_empty());
    assert!(graph.rings().next().is_none());
}

#[test]
fn test_degenerate_segment_skipped() {
    let mut graph = RingGraph::new();
    graph.add_segment((1.0, 1.0).into(), (1.0, 1.0).into());
    assert!(graph.is_empty());
}
