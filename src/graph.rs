use geo_types::{Coord, LineString};
use std::collections::HashMap;

pub type NodeId = usize;
pub type DirEdgeId = usize;

#[derive(Clone, Debug)]
struct Node {
    coordinate: Coord<f64>,
    /// Outgoing half-edges. Must be sorted by polar angle before tracing.
    outgoing: Vec<DirEdgeId>,
    degree: usize,
}

#[derive(Clone, Debug)]
struct HalfEdge {
    src: NodeId,
    dst: NodeId,
    /// The opposite half-edge of the same segment.
    sym: DirEdgeId,
    /// Precomputed angle at `src`, for the CCW turn rule.
    angle: f64,
    visited: bool,
    pruned: bool,
}

// Exact-bits key so f64 coordinates can index a HashMap. Segments produced
// from the same source vertices share bits, so no snapping is needed here.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct NodeKey(u64, u64);

impl From<Coord<f64>> for NodeKey {
    fn from(c: Coord<f64>) -> Self {
        NodeKey(c.x.to_bits(), c.y.to_bits())
    }
}

/// A planar half-edge graph for rebuilding rings from line fragments.
///
/// Feed it noded segments, then call [`RingGraph::rings`] to trace closed
/// rings with the next-CCW turn rule. Dangling chains (fragments that do not
/// participate in any cycle) must be pruned first or tracing will fail on
/// them.
pub struct RingGraph {
    nodes: Vec<Node>,
    half_edges: Vec<HalfEdge>,
    node_map: HashMap<NodeKey, NodeId>,
}

impl Default for RingGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RingGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            half_edges: Vec::new(),
            node_map: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.half_edges.is_empty()
    }

    fn add_node(&mut self, coord: Coord<f64>) -> NodeId {
        let key = NodeKey::from(coord);
        if let Some(&id) = self.node_map.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            coordinate: coord,
            outgoing: Vec::new(),
            degree: 0,
        });
        self.node_map.insert(key, id);
        id
    }

    /// Adds every segment of `line` to the graph.
    pub fn add_line(&mut self, line: &LineString<f64>) {
        for pair in line.0.windows(2) {
            self.add_segment(pair[0], pair[1]);
        }
    }

    pub fn add_segment(&mut self, p0: Coord<f64>, p1: Coord<f64>) {
        if (p0.x - p1.x).abs() < 1e-12 && (p0.y - p1.y).abs() < 1e-12 {
            return;
        }

        let u = self.add_node(p0);
        let v = self.add_node(p1);

        let fwd = self.half_edges.len();
        let rev = fwd + 1;

        self.half_edges.push(HalfEdge {
            src: u,
            dst: v,
            sym: rev,
            angle: (p1.y - p0.y).atan2(p1.x - p0.x),
            visited: false,
            pruned: false,
        });
        self.half_edges.push(HalfEdge {
            src: v,
            dst: u,
            sym: fwd,
            angle: (p0.y - p1.y).atan2(p0.x - p1.x),
            visited: false,
            pruned: false,
        });

        self.nodes[u].outgoing.push(fwd);
        self.nodes[u].degree += 1;
        self.nodes[v].outgoing.push(rev);
        self.nodes[v].degree += 1;
    }

    /// Sorts every node's outgoing list by angle. Required before tracing.
    pub fn sort_outgoing(&mut self) {
        let half_edges = &self.half_edges;
        for node in &mut self.nodes {
            node.outgoing.sort_by(|&a, &b| {
                half_edges[a]
                    .angle
                    .partial_cmp(&half_edges[b].angle)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    /// Iteratively removes dangling chains (degree-1 nodes and the edges
    /// hanging off them). Returns the number of nodes removed.
    pub fn prune_dangles(&mut self) -> usize {
        let mut removed = 0;
        let mut queue: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.degree == 1)
            .map(|(i, _)| i)
            .collect();

        while let Some(node_idx) = queue.pop() {
            if self.nodes[node_idx].degree != 1 {
                continue;
            }
            self.nodes[node_idx].degree = 0;
            removed += 1;

            let live = self.nodes[node_idx]
                .outgoing
                .iter()
                .copied()
                .find(|&e| !self.half_edges[e].pruned);

            if let Some(e) = live {
                let sym = self.half_edges[e].sym;
                self.half_edges[e].pruned = true;
                self.half_edges[sym].pruned = true;

                let neighbor_idx = self.half_edges[e].dst;
                let neighbor = &mut self.nodes[neighbor_idx];
                if neighbor.degree > 0 {
                    neighbor.degree -= 1;
                    if neighbor.degree == 1 {
                        queue.push(neighbor_idx);
                    }
                }
            }
        }
        removed
    }

    /// Lazily traces rings. Consuming only the first element is fine; the
    /// remaining candidates are simply never computed.
    pub fn rings(&mut self) -> Rings<'_> {
        for he in &mut self.half_edges {
            he.visited = false;
        }
        Rings {
            graph: self,
            cursor: 0,
        }
    }

    /// Walks from `start` taking the next-CCW outgoing edge at every node
    /// until the walk returns to `start` or gets stuck.
    fn trace_ring(&mut self, start: DirEdgeId) -> Option<LineString<f64>> {
        let mut ring_edges = Vec::new();
        let mut curr = start;

        loop {
            self.half_edges[curr].visited = true;
            ring_edges.push(curr);

            let dst = self.half_edges[curr].dst;
            let sym = self.half_edges[curr].sym;
            let outgoing = &self.nodes[dst].outgoing;

            let at = outgoing.iter().position(|&e| e == sym)?;

            // Next unpruned edge counter-clockwise from the reversal.
            let len = outgoing.len();
            let mut next = None;
            for step in 1..=len {
                let candidate = outgoing[(at + step) % len];
                if !self.half_edges[candidate].pruned {
                    next = Some(candidate);
                    break;
                }
            }
            curr = next?;

            if curr == start {
                break;
            }
            if self.half_edges[curr].visited {
                return None;
            }
        }

        let mut coords = Vec::with_capacity(ring_edges.len() + 1);
        coords.push(self.nodes[self.half_edges[ring_edges[0]].src].coordinate);
        for &e in &ring_edges {
            coords.push(self.nodes[self.half_edges[e].dst].coordinate);
        }
        Some(LineString::new(coords))
    }
}

pub struct Rings<'a> {
    graph: &'a mut RingGraph,
    cursor: DirEdgeId,
}

impl Iterator for Rings<'_> {
    type Item = LineString<f64>;

    fn next(&mut self) -> Option<LineString<f64>> {
        while self.cursor < self.graph.half_edges.len() {
            let start = self.cursor;
            self.cursor += 1;

            let he = &self.graph.half_edges[start];
            if he.visited || he.pruned {
                continue;
            }
            if let Some(ring) = self.graph.trace_ring(start) {
                return Some(ring);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
