use crate::error::{GeneralizeError, Result};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::bounding_rect::BoundingRect;
use geo::intersects::Intersects;
use geo::Line;
use geo_types::{Coord, Geometry, LineString, MultiLineString, Polygon};
use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rstar::{RTree, RTreeObject, AABB};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Which unordered feature pairs intersect. Built once by [`extract`],
/// read-only afterward.
#[derive(Clone, Debug, Default)]
pub struct BorderGraph {
    pairs: HashSet<(usize, usize)>,
}

impl BorderGraph {
    fn ordered(i: usize, j: usize) -> (usize, usize) {
        if i < j {
            (i, j)
        } else {
            (j, i)
        }
    }

    fn insert(&mut self, i: usize, j: usize) {
        self.pairs.insert(Self::ordered(i, j));
    }

    pub fn intersects(&self, i: usize, j: usize) -> bool {
        i != j && self.pairs.contains(&Self::ordered(i, j))
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .pairs
            .iter()
            .filter_map(|&(a, b)| {
                if a == i {
                    Some(b)
                } else if b == i {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }
}

/// The boundary decomposition of a feature set.
///
/// `shared[i]` holds one merged border per intersecting neighbor of feature
/// `i`, in pair order; the border between `i` and `j` is computed once and
/// the identical geometry appears in both lists. `unshared[i]` is the rest
/// of `i`'s boundary.
#[derive(Clone, Debug)]
pub struct ExtractedBorders {
    pub graph: BorderGraph,
    pub shared: Vec<Vec<Geometry<f64>>>,
    pub unshared: Vec<MultiLineString<f64>>,
}

/// A portion of one boundary segment covered by a shared border, as a
/// parameter interval along the segment. The exact overlap coordinates are
/// kept so the complement can be built without re-deriving points.
#[derive(Clone, Debug)]
struct Cover {
    segment: usize,
    t0: f64,
    t1: f64,
    c0: Coord<f64>,
    c1: Coord<f64>,
}

/// Everything learned about one intersecting pair, computed independently
/// of all other pairs and fanned into per-feature state afterwards.
struct PairBorder {
    i: usize,
    j: usize,
    /// Merged border geometry; `None` for point-only contact.
    border: Option<Geometry<f64>>,
    cover_i: Vec<Cover>,
    cover_j: Vec<Cover>,
}

// Bounding box wrapper so features can be bulk-loaded into an R-tree.
struct IndexedBox {
    env: AABB<[f64; 2]>,
    index: usize,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// Decomposes every feature's boundary into shared and unshared parts.
///
/// Pairwise work is pre-filtered with an R-tree over bounding boxes and, with
/// the `parallel` feature, computed across pairs with rayon; results are
/// merged into per-feature lists in a single sequential pass so no list is
/// ever appended to concurrently.
pub fn extract(shapes: &[Polygon<f64>]) -> Result<ExtractedBorders> {
    validate(shapes)?;

    let segments: Vec<Vec<Line<f64>>> = shapes.iter().map(boundary_segments).collect();

    let boxes: Vec<IndexedBox> = shapes
        .iter()
        .enumerate()
        .filter_map(|(index, p)| {
            p.bounding_rect().map(|r| IndexedBox {
                env: AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
                index,
            })
        })
        .collect();
    let tree = RTree::bulk_load(boxes);

    let mut pairs: Vec<(usize, usize)> = tree
        .intersection_candidates_with_other_tree(&tree)
        .filter_map(|(a, b)| {
            if a.index < b.index {
                Some((a.index, b.index))
            } else {
                None
            }
        })
        .collect();
    pairs.sort_unstable();
    pairs.dedup();

    info!(
        "comparing {} features, {} candidate pairs",
        shapes.len(),
        pairs.len()
    );

    let compared = AtomicUsize::new(0);
    let total = pairs.len().max(1);

    let compute = |&(i, j): &(usize, usize)| -> Option<PairBorder> {
        let done = compared.fetch_add(1, AtomicOrdering::Relaxed);
        let pair = compute_pair(i, j, shapes, &segments)?;
        debug!(
            "{:.2}% - feature #{} and #{} - {}",
            100.0 * done as f64 / total as f64,
            i,
            j,
            match &pair.border {
                None => "point contact",
                Some(Geometry::LineString(_)) => "LineString",
                Some(Geometry::MultiLineString(_)) => "MultiLineString",
                Some(_) => "other",
            }
        );
        Some(pair)
    };

    #[cfg(feature = "parallel")]
    let pair_borders: Vec<PairBorder> = pairs.par_iter().filter_map(compute).collect();

    #[cfg(not(feature = "parallel"))]
    let pair_borders: Vec<PairBorder> = pairs.iter().filter_map(compute).collect();

    // Fan-in: single-threaded merge into per-feature buffers.
    let mut graph = BorderGraph::default();
    let mut shared: Vec<Vec<Geometry<f64>>> = vec![Vec::new(); shapes.len()];
    let mut coverage: Vec<Vec<Cover>> = vec![Vec::new(); shapes.len()];

    for pair in pair_borders {
        graph.insert(pair.i, pair.j);
        if let Some(border) = pair.border {
            shared[pair.i].push(border.clone());
            shared[pair.j].push(border);
        }
        coverage[pair.i].extend(pair.cover_i);
        coverage[pair.j].extend(pair.cover_j);
    }

    info!("making unshared borders...");

    let unshared: Vec<MultiLineString<f64>> = segments
        .iter()
        .zip(coverage.iter())
        .map(|(segs, covers)| unshared_boundary(segs, covers))
        .collect();

    Ok(ExtractedBorders {
        graph,
        shared,
        unshared,
    })
}

fn validate(shapes: &[Polygon<f64>]) -> Result<()> {
    for (feature, p) in shapes.iter().enumerate() {
        let ext = p.exterior();
        if ext.0.is_empty() {
            return Err(GeneralizeError::InvalidGeometry {
                feature,
                reason: "empty exterior ring".into(),
            });
        }
        if ext.0.len() < 4 {
            return Err(GeneralizeError::InvalidGeometry {
                feature,
                reason: format!("exterior ring has only {} vertices", ext.0.len()),
            });
        }
        for (ring, interior) in p.interiors().iter().enumerate() {
            if interior.0.len() < 4 {
                return Err(GeneralizeError::InvalidGeometry {
                    feature,
                    reason: format!(
                        "interior ring {} has only {} vertices",
                        ring,
                        interior.0.len()
                    ),
                });
            }
        }
    }
    Ok(())
}

/// All boundary segments of a polygon: exterior ring first, then any
/// interior rings. Zero-length segments are dropped.
pub(crate) fn boundary_segments(poly: &Polygon<f64>) -> Vec<Line<f64>> {
    let mut out: Vec<Line<f64>> = poly.exterior().lines().collect();
    for ring in poly.interiors() {
        out.extend(ring.lines());
    }
    out.retain(|l| length2(l) > 0.0);
    out
}

/// Computes the border shared by features `i` and `j`, if they intersect.
///
/// The border is the collinear overlap of the two boundaries, gathered
/// segment pair by segment pair and merged into as few lines as possible.
/// Crossing-point intersections are not borders and are ignored.
fn compute_pair(
    i: usize,
    j: usize,
    shapes: &[Polygon<f64>],
    segments: &[Vec<Line<f64>>],
) -> Option<PairBorder> {
    if !shapes[i].intersects(&shapes[j]) {
        return None;
    }

    let mut overlaps: Vec<Line<f64>> = Vec::new();
    let mut cover_i: Vec<Cover> = Vec::new();
    let mut cover_j: Vec<Cover> = Vec::new();

    for (ai, a) in segments[i].iter().enumerate() {
        for (bi, b) in segments[j].iter().enumerate() {
            if !boxes_touch(a, b) {
                continue;
            }
            let Some(LineIntersection::Collinear {
                intersection: overlap,
            }) = line_intersection(*a, *b)
            else {
                continue;
            };
            if length2(&overlap) <= 1e-20 {
                continue;
            }
            cover_i.push(cover_for(ai, a, overlap.start, overlap.end));
            cover_j.push(cover_for(bi, b, overlap.start, overlap.end));
            overlaps.push(overlap);
        }
    }

    let border = if overlaps.is_empty() {
        None
    } else {
        Some(line_merge(&overlaps))
    };

    Some(PairBorder {
        i,
        j,
        border,
        cover_i,
        cover_j,
    })
}

/// The unshared part of one feature's boundary: per boundary segment, the
/// complement of the covered parameter intervals. Remainder pieces reuse the
/// exact cover coordinates, so shared plus unshared lengths add back up to
/// the perimeter to within roundoff.
fn unshared_boundary(segments: &[Line<f64>], covers: &[Cover]) -> MultiLineString<f64> {
    const EPS_T: f64 = 1e-12;

    let mut per_segment: Vec<Vec<&Cover>> = vec![Vec::new(); segments.len()];
    for c in covers {
        per_segment[c.segment].push(c);
    }

    let mut pieces: Vec<Line<f64>> = Vec::new();
    for (si, seg) in segments.iter().enumerate() {
        let covs = &mut per_segment[si];
        if covs.is_empty() {
            pieces.push(*seg);
            continue;
        }
        covs.sort_by(|a, b| a.t0.partial_cmp(&b.t0).unwrap_or(Ordering::Equal));

        let mut cur_t = 0.0;
        let mut cur_c = seg.start;
        for c in covs.iter() {
            if c.t1 <= cur_t + EPS_T {
                continue;
            }
            if c.t0 > cur_t + EPS_T {
                pieces.push(Line::new(cur_c, c.c0));
            }
            cur_t = c.t1;
            cur_c = c.c1;
        }
        if cur_t < 1.0 - EPS_T {
            pieces.push(Line::new(cur_c, seg.end));
        }
    }

    match line_merge(&pieces) {
        Geometry::LineString(ls) => MultiLineString::new(vec![ls]),
        Geometry::MultiLineString(mls) => mls,
        _ => MultiLineString::new(vec![]),
    }
}

/// Fuses segments that share endpoints into fewer, longer lines.
///
/// Returns a single `LineString` when the input forms one connected chain or
/// ring, otherwise a `MultiLineString` of the chains found. Junctions of
/// three or more segments end a chain.
pub(crate) fn line_merge(segments: &[Line<f64>]) -> Geometry<f64> {
    if segments.is_empty() {
        return Geometry::MultiLineString(MultiLineString::new(vec![]));
    }

    let mut adjacency: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (idx, s) in segments.iter().enumerate() {
        adjacency.entry(coord_key(s.start)).or_default().push(idx);
        adjacency.entry(coord_key(s.end)).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let mut chains: Vec<LineString<f64>> = Vec::new();

    // Open chains first, starting from endpoints that are not plain
    // pass-through nodes.
    for idx in 0..segments.len() {
        if used[idx] {
            continue;
        }
        let s = segments[idx];
        if adjacency[&coord_key(s.start)].len() != 2 {
            chains.push(walk(segments, &adjacency, &mut used, idx, s.start));
        } else if adjacency[&coord_key(s.end)].len() != 2 {
            chains.push(walk(segments, &adjacency, &mut used, idx, s.end));
        }
    }

    // Whatever is left is closed rings.
    for idx in 0..segments.len() {
        if !used[idx] {
            chains.push(walk(segments, &adjacency, &mut used, idx, segments[idx].start));
        }
    }

    if chains.len() == 1 {
        Geometry::LineString(chains.remove(0))
    } else {
        Geometry::MultiLineString(MultiLineString::new(chains))
    }
}

fn walk(
    segments: &[Line<f64>],
    adjacency: &HashMap<(u64, u64), Vec<usize>>,
    used: &mut [bool],
    start_idx: usize,
    start: Coord<f64>,
) -> LineString<f64> {
    let mut coords = vec![start];
    let mut idx = start_idx;
    let mut at = start;

    loop {
        used[idx] = true;
        at = other_end(&segments[idx], at);
        coords.push(at);

        let entries = &adjacency[&coord_key(at)];
        if entries.len() != 2 {
            break;
        }
        match entries.iter().find(|&&e| !used[e]) {
            Some(&next) => idx = next,
            None => break,
        }
    }

    LineString::new(coords)
}

fn other_end(s: &Line<f64>, c: Coord<f64>) -> Coord<f64> {
    if coord_key(c) == coord_key(s.start) {
        s.end
    } else {
        s.start
    }
}

fn coord_key(c: Coord<f64>) -> (u64, u64) {
    (c.x.to_bits(), c.y.to_bits())
}

fn length2(l: &Line<f64>) -> f64 {
    let dx = l.end.x - l.start.x;
    let dy = l.end.y - l.start.y;
    dx * dx + dy * dy
}

fn boxes_touch(a: &Line<f64>, b: &Line<f64>) -> bool {
    a.start.x.min(a.end.x) <= b.start.x.max(b.end.x)
        && a.start.x.max(a.end.x) >= b.start.x.min(b.end.x)
        && a.start.y.min(a.end.y) <= b.start.y.max(b.end.y)
        && a.start.y.max(a.end.y) >= b.start.y.min(b.end.y)
}

fn cover_for(segment: usize, seg: &Line<f64>, a: Coord<f64>, b: Coord<f64>) -> Cover {
    let ta = param_on(seg, a);
    let tb = param_on(seg, b);
    if ta <= tb {
        Cover {
            segment,
            t0: ta,
            t1: tb,
            c0: a,
            c1: b,
        }
    } else {
        Cover {
            segment,
            t0: tb,
            t1: ta,
            c0: b,
            c1: a,
        }
    }
}

/// Parameter of `p` along `seg`, clamped to `[0, 1]`. `p` is assumed to lie
/// on the segment.
fn param_on(seg: &Line<f64>, p: Coord<f64>) -> f64 {
    let dx = seg.end.x - seg.start.x;
    let dy = seg.end.y - seg.start.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    (((p.x - seg.start.x) * dx + (p.y - seg.start.y) * dy) / len2).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "borders_tests.rs"]
mod tests;
