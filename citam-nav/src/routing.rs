use citam_floorplan::{Floorplan, SpaceFunction};
use citam_geom::Point;
use citam_util::{dijkstra_search, HashMap};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{HallwayGraph, NavGraph, NodeId, SegmentId};

pub type FloorId = u32;

/// One point along a route: a drawing-coordinate position and the floor it
/// sits on. Multi-floor routes carry a floor change at exactly the stair
/// node where the transition occurs.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct RoutePoint {
    pub point: Point,
    pub floor: FloorId,
}

/// One entry of a traffic policy: restrict a stable segment id on a given
/// floor to a single direction of travel (§4.4).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TrafficPolicyEntry {
    pub floor: FloorId,
    pub segment: SegmentId,
    pub direction: i8,
}

/// Owns every floor's navigation graph and hallway graph plus the vertical
/// edges connecting stair spaces between adjacent floors, and answers
/// routing queries against them.
pub struct Navigation {
    floors: Vec<(NavGraph, HallwayGraph)>,
    vertical_edges: HashMap<(FloorId, NodeId), Vec<(FloorId, NodeId)>>,
    vertical_weight: f64,
}

impl Navigation {
    /// Assemble a `Navigation` from each floor's graph plus the floorplans
    /// they were built from, used only to locate stair-to-stair
    /// correspondences between adjacent floors.
    pub fn build(
        floorplans: &[Floorplan],
        floors: Vec<(NavGraph, HallwayGraph)>,
        vertical_weight: f64,
        epsilon: f64,
    ) -> Self {
        let mut vertical_edges: HashMap<(FloorId, NodeId), Vec<(FloorId, NodeId)>> =
            HashMap::default();

        for floor_idx in 0..floorplans.len().saturating_sub(1) {
            let (below, above) = (floor_idx as FloorId, (floor_idx + 1) as FloorId);
            for stair in floorplans[floor_idx]
                .spaces()
                .iter()
                .filter(|s| s.space_function == SpaceFunction::Stairs)
            {
                let Some(other) = floorplans[floor_idx + 1]
                    .spaces()
                    .iter()
                    .filter(|s| s.space_function == SpaceFunction::Stairs)
                    .find(|s2| s2.center().dist(&stair.center()) < epsilon)
                else {
                    continue;
                };
                let (Some(n1), Some(n2)) = (
                    floors[floor_idx].0.nearest_node(stair.center()),
                    floors[floor_idx + 1].0.nearest_node(other.center()),
                ) else {
                    continue;
                };
                vertical_edges.entry((below, n1)).or_default().push((above, n2));
                vertical_edges.entry((above, n2)).or_default().push((below, n1));
            }
        }

        Navigation {
            floors,
            vertical_edges,
            vertical_weight,
        }
    }

    pub fn hallway(&self, floor: FloorId) -> Option<&HallwayGraph> {
        self.floors.get(floor as usize).map(|(_, h)| h)
    }

    pub fn graph(&self, floor: FloorId) -> Option<&NavGraph> {
        self.floors.get(floor as usize).map(|(g, _)| g)
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Dijkstra shortest route on a single floor's graph. Empty if
    /// unreachable (§4.4).
    pub fn shortest_route(&self, from: Point, to: Point, floor: FloorId) -> Vec<RoutePoint> {
        let Some((graph, _)) = self.floors.get(floor as usize) else {
            return Vec::new();
        };
        let (Some(start), Some(goal)) = (graph.nearest_node(from), graph.nearest_node(to)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![RoutePoint { point: graph.node(start), floor }];
        }

        let Some(path) = dijkstra_search(|n: &NodeId| graph.neighbors(*n), &start)
            .find(|n| *n.item() == goal)
        else {
            return Vec::new();
        };

        let mut points: Vec<RoutePoint> = path
            .iter()
            .map(|(id, _)| RoutePoint { point: graph.node(id), floor })
            .collect();
        points.reverse();
        points
    }

    /// Dijkstra shortest route across the multi-floor graph, transitioning
    /// floors only through a vertical stair edge (§4.4).
    pub fn shortest_route_multifloor(
        &self,
        from: Point,
        from_floor: FloorId,
        to: Point,
        to_floor: FloorId,
    ) -> Vec<RoutePoint> {
        let (Some((from_graph, _)), Some((to_graph, _))) = (
            self.floors.get(from_floor as usize),
            self.floors.get(to_floor as usize),
        ) else {
            return Vec::new();
        };
        let (Some(start_node), Some(goal_node)) =
            (from_graph.nearest_node(from), to_graph.nearest_node(to))
        else {
            return Vec::new();
        };
        let start = (from_floor, start_node);
        let goal = (to_floor, goal_node);
        if start == goal {
            return vec![RoutePoint { point: from_graph.node(start_node), floor: from_floor }];
        }

        let neighbors = |&(floor, node): &(FloorId, NodeId)| {
            let graph = &self.floors[floor as usize].0;
            let same_floor = graph.neighbors(node).map(move |(n, w)| ((floor, n), w));
            let vertical = self
                .vertical_edges
                .get(&(floor, node))
                .into_iter()
                .flatten()
                .map(move |&(f2, n2)| ((f2, n2), OrderedFloat(self.vertical_weight)));
            same_floor.chain(vertical)
        };

        let Some(path) = dijkstra_search(neighbors, &start).find(|n| *n.item() == goal) else {
            return Vec::new();
        };

        let mut points: Vec<RoutePoint> = path
            .iter()
            .map(|((floor, id), _)| RoutePoint {
                point: self.floors[floor as usize].0.node(id),
                floor,
            })
            .collect();
        points.reverse();
        points
    }

    /// Restrict each policy entry's segment to its configured direction.
    pub fn apply_traffic_policy(&mut self, policy: &[TrafficPolicyEntry]) {
        for entry in policy {
            if let Some((graph, _)) = self.floors.get_mut(entry.floor as usize) {
                graph.restrict_segment(entry.segment, entry.direction);
            }
        }
    }
}

/// Produce a dense sequence of positions at intervals of `step_size` along
/// the polyline formed by `route`, so each entry is one timestep of motion.
/// Floor transitions are never subdivided: the transition point is emitted
/// as-is (§4.4).
pub fn unroll_route(route: &[RoutePoint], step_size: f64) -> Vec<RoutePoint> {
    if route.is_empty() {
        return Vec::new();
    }
    if step_size <= 0.0 {
        return route.to_vec();
    }

    let mut out = vec![route[0]];
    for pair in route.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.floor != b.floor {
            out.push(b);
            continue;
        }
        let length = a.point.dist(&b.point);
        let mut walked = step_size;
        while walked < length {
            let t = walked / length;
            let point = Point::new(
                a.point.x() + (b.point.x() - a.point.x()) * t,
                a.point.y() + (b.point.y() - a.point.y()) * t,
            );
            out.push(RoutePoint { point, floor: a.floor });
            walked += step_size;
        }
        out.push(b);
    }
    out
}

/// Collapse consecutive colinear triples on the same floor; every
/// floor-change point is always preserved (§4.4, S5).
pub fn remove_unnecessary_coords(route: &[RoutePoint]) -> Vec<RoutePoint> {
    if route.len() < 3 {
        return route.to_vec();
    }

    let mut out = vec![route[0]];
    for i in 1..route.len() - 1 {
        let (prev, cur, next) = (out[out.len() - 1], route[i], route[i + 1]);
        if prev.floor != cur.floor || cur.floor != next.floor {
            out.push(cur);
            continue;
        }
        let cross = (cur.point.x() - prev.point.x()) * (next.point.y() - prev.point.y())
            - (cur.point.y() - prev.point.y()) * (next.point.x() - prev.point.x());
        if cross.abs() > citam_geom::DEFAULT_EPSILON {
            out.push(cur);
        }
    }
    out.push(route[route.len() - 1]);
    out
}
