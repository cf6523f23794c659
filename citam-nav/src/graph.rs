use citam_geom::{Point, Segment};
use citam_util::HashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{NodeId, SegmentId};

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub to: NodeId,
    pub weight: OrderedFloat<f64>,
    /// Id of the maximal straight chain this edge was cut from, stable
    /// across [`NavGraph::simplify`] and [`NavGraph::sanitize`]. Traffic
    /// policies reference these ids, not raw edge indices.
    pub segment: SegmentId,
}

/// An undirected weighted graph whose nodes are floorplan [`Point`]s: the
/// per-floor navigation graph, built by [`crate::build::build_floor_graph`]
/// and queried by [`crate::routing::Navigation`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NavGraph {
    nodes: Vec<Point>,
    #[serde(skip)]
    index: HashMap<Point, NodeId>,
    adjacency: Vec<Vec<Edge>>,
}

impl NavGraph {
    pub fn new() -> Self {
        NavGraph::default()
    }

    /// Rebuild the point→id lookup after deserializing (the lookup itself
    /// isn't persisted, to keep the on-disk format a plain node/edge list).
    pub fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, NodeId::from(i)))
            .collect();
    }

    pub fn node(&self, id: NodeId) -> Point {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn find_node(&self, p: Point) -> Option<NodeId> {
        self.index.get(&p).copied()
    }

    pub fn nearest_node(&self, p: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.dist2(&p).partial_cmp(&b.dist2(&p)).unwrap())
            .map(|(i, _)| NodeId::from(i))
    }

    pub fn add_node(&mut self, p: Point) -> NodeId {
        if let Some(&id) = self.index.get(&p) {
            return id;
        }
        let id = NodeId::from(self.nodes.len());
        self.nodes.push(p);
        self.adjacency.push(Vec::new());
        self.index.insert(p, id);
        id
    }

    /// Add an edge in both directions with the given weight and segment id.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64, segment: SegmentId) {
        if a == b {
            return;
        }
        self.adjacency[a.index()].push(Edge {
            to: b,
            weight: OrderedFloat(weight),
            segment,
        });
        self.adjacency[b.index()].push(Edge {
            to: a,
            weight: OrderedFloat(weight),
            segment,
        });
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, OrderedFloat<f64>)> + '_ {
        self.adjacency[id.index()]
            .iter()
            .map(|e| (e.to, e.weight))
    }

    pub fn edges_from(&self, id: NodeId) -> &[Edge] {
        &self.adjacency[id.index()]
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency[id.index()].len()
    }

    /// Remove the directed edge `from -> to`, leaving `to -> from` (if it
    /// exists) untouched. Used by [`crate::routing::Navigation::apply_traffic_policy`]
    /// to turn a two-way aisle into a one-way one.
    pub fn remove_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.adjacency[from.index()].retain(|e| e.to != to);
    }

    /// Restrict every edge tagged with `segment` to one direction:
    /// `direction > 0` keeps only `low id -> high id` travel, `direction <
    /// 0` keeps only `high id -> low id`. The low/high id ordering is the
    /// segment's stable natural direction, fixed at build time.
    pub fn restrict_segment(&mut self, segment: SegmentId, direction: i8) {
        let forward_only = direction > 0;
        for a in 0..self.adjacency.len() {
            self.adjacency[a].retain(|e| {
                if e.segment != segment {
                    return true;
                }
                let goes_up = e.to.index() > a;
                goes_up == forward_only
            });
        }
    }

    /// Contract every degree-2 node into the straight edge between its two
    /// neighbors, summing weight along the way. Keeps endpoints (door
    /// nodes, junctions, dead ends) intact.
    pub fn simplify(&mut self) {
        loop {
            let Some(mid) = (0..self.nodes.len())
                .map(NodeId::from)
                .find(|&n| self.degree(n) == 2 && self.adjacency[n.index()][0].to != self.adjacency[n.index()][1].to)
            else {
                break;
            };
            let [e0, e1] = [self.adjacency[mid.index()][0], self.adjacency[mid.index()][1]];
            let (a, b) = (e0.to, e1.to);
            let segment = e0.segment;
            let weight = e0.weight.0 + e1.weight.0;

            self.adjacency[mid.index()].clear();
            self.adjacency[a.index()].retain(|e| e.to != mid);
            self.adjacency[b.index()].retain(|e| e.to != mid);
            self.add_edge(a, b, weight, segment);
        }
    }

    /// Re-split any edge whose straight-line path crosses one of
    /// `special_walls`, inserting a node at the crossing point so agents
    /// can't walk through a wall added after the graph was built.
    pub fn sanitize(&mut self, special_walls: &[Segment], epsilon: f64) {
        if special_walls.is_empty() {
            return;
        }
        loop {
            let mut found = None;
            'search: for a in (0..self.nodes.len()).map(NodeId::from) {
                for edge in self.adjacency[a.index()].clone() {
                    if edge.to.index() <= a.index() {
                        continue;
                    }
                    let seg = Segment::new(self.nodes[a.index()], self.nodes[edge.to.index()]);
                    for wall in special_walls {
                        if let Some(p) = seg.intersection(wall) {
                            if seg.distance_to_point(p) < epsilon {
                                found = Some((a, edge, p));
                                break 'search;
                            }
                        }
                    }
                }
            }
            let Some((a, edge, p)) = found else { break };
            let mid = self.add_node(p);
            self.adjacency[a.index()].retain(|e| e.to != edge.to);
            self.adjacency[edge.to.index()].retain(|e| e.to != a);
            let half = edge.weight.0 / 2.0;
            self.add_edge(a, mid, half, edge.segment);
            self.add_edge(mid, edge.to, half, edge.segment);
        }
    }
}
