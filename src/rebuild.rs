use crate::graph::RingGraph;
use geo::algorithm::winding_order::Winding;
use geo::Area;
use geo_types::{Geometry, LineString, Polygon};

/// Default area-ratio threshold separating a lossy drop from a benign skip.
pub const DEFAULT_DROP_RATIO: f64 = 5.0;

/// Outcome of rebuilding one feature from its simplified fragments.
#[derive(Clone, Debug)]
pub enum Rebuilt {
    Polygon(Polygon<f64>),
    /// No ring could be formed and the feature was large relative to the
    /// tolerance; losing it is suspicious.
    LossyDrop { lost_portion: f64 },
    /// No ring could be formed but the feature was small or thin enough
    /// that vanishing at this tolerance is expected.
    BenignSkip { lost_portion: f64 },
}

/// Rebuilds a feature's polygon from its simplified shared and unshared
/// line fragments.
///
/// Multi-part geometry is decomposed into single lines, everything goes into
/// one ring graph, and the first nonzero-area ring traced wins; further
/// candidate rings are never computed. Exactly one ring is expected when
/// topology survived simplification, so multiple valid rings (and interior
/// rings of the original) are knowingly ignored.
///
/// When no ring closes, the area-loss policy decides how loudly to drop the
/// feature: `lost_portion = original_area / tolerance²`, compared against
/// `drop_ratio`.
pub fn rebuild(
    original: &Polygon<f64>,
    parts: &[Geometry<f64>],
    tolerance: f64,
    drop_ratio: f64,
) -> Rebuilt {
    let mut graph = RingGraph::new();
    for part in parts {
        for line in lines_of(part) {
            graph.add_line(line);
        }
    }
    graph.sort_outgoing();
    graph.prune_dangles();

    let first = graph
        .rings()
        .find(|ring| Polygon::new(ring.clone(), vec![]).signed_area().abs() > 1e-9);

    match first {
        Some(mut ring) => {
            ring.make_ccw_winding();
            Rebuilt::Polygon(Polygon::new(ring, vec![]))
        }
        None => {
            let lost_portion = if tolerance > 0.0 {
                original.unsigned_area() / (tolerance * tolerance)
            } else {
                // A failure at zero tolerance is never benign.
                f64::INFINITY
            };
            if lost_portion > drop_ratio {
                Rebuilt::LossyDrop { lost_portion }
            } else {
                Rebuilt::BenignSkip { lost_portion }
            }
        }
    }
}

fn lines_of(geom: &Geometry<f64>) -> Vec<&LineString<f64>> {
    match geom {
        Geometry::LineString(ls) => vec![ls],
        Geometry::MultiLineString(mls) => mls.0.iter().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "rebuild_tests.rs"]
mod tests;
