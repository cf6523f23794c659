//! Per-floor navigation graph builder and routing: turns a floorplan's
//! aisles and doors into a walkable graph, and answers shortest-route
//! queries against it (§4.3–§4.4).

pub mod build;
mod error;
mod graph;
mod hallway;
mod ids;
pub mod persist;
pub mod routing;

pub use build::{build_floor_graph, NavBuildConfig};
pub use error::RoutingError;
pub use graph::{Edge, NavGraph};
pub use hallway::HallwayGraph;
pub use ids::{NodeId, SegmentId};
pub use routing::{unroll_route, remove_unnecessary_coords, FloorId, Navigation, RoutePoint, TrafficPolicyEntry};

#[cfg(test)]
mod tests {
    use citam_floorplan::{ingest, DoorInput, SpaceFunction, SpaceInput};
    use citam_geom::{Point, Polygon};
    use citam_util::dijkstra_search;

    use super::*;

    fn two_room_floorplan() -> citam_floorplan::Floorplan {
        // Two 10x10 offices side by side, joined by a 10x2 hallway, with a
        // door from each office into the hallway.
        let office_a = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]),
            unique_name: "office-a".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Office,
            capacity: 4,
        };
        let hallway = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 12.0),
                Point::new(0.0, 12.0),
            ]),
            unique_name: "hall".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Aisle,
            capacity: 0,
        };
        let door = DoorInput {
            polyline: vec![Point::new(4.0, 10.0), Point::new(6.0, 10.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        ingest::ingest(vec![office_a, hallway], vec![door], 10.0, 12.0, 1.0, 1e-3).unwrap()
    }

    #[test]
    fn builds_connected_graph_across_a_door() {
        let floorplan = two_room_floorplan();
        let (graph, _hallway) = build_floor_graph(&floorplan, &NavBuildConfig::default());
        assert!(graph.node_count() >= 2);

        let route = dijkstra_route(&graph, Point::new(5.0, 5.0), Point::new(5.0, 11.0));
        assert!(!route.is_empty(), "office and hallway should be connected via the door");
    }

    fn dijkstra_route(graph: &NavGraph, from: Point, to: Point) -> Vec<Point> {
        let nav_floors = vec![(graph.clone(), HallwayGraph::new())];
        let nav = Navigation::build(&[], nav_floors, 10.0, 1e-3);
        nav.shortest_route(from, to, 0).into_iter().map(|p| p.point).collect()
    }

    #[test]
    fn remove_unnecessary_coords_drops_colinear_midpoint() {
        let route = vec![
            RoutePoint { point: Point::new(0.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(10.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(15.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(15.0, 20.0), floor: 0 },
        ];
        let simplified = remove_unnecessary_coords(&route);
        assert_eq!(simplified.len(), 3);
    }

    #[test]
    fn remove_unnecessary_coords_is_idempotent_after_two_passes() {
        let route = vec![
            RoutePoint { point: Point::new(0.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(5.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(10.0, 0.0), floor: 0 },
            RoutePoint { point: Point::new(10.0, 5.0), floor: 0 },
            RoutePoint { point: Point::new(10.0, 10.0), floor: 0 },
        ];
        let once = remove_unnecessary_coords(&unroll_route(&remove_unnecessary_coords(&route), 1.0));
        let twice = remove_unnecessary_coords(&once);
        assert_eq!(once.len(), twice.len());
    }

    /// Two floors joined by a pair of aligned stair spaces, each floor
    /// having its own entrance/office reached through a door off the stair.
    fn two_floor_stairs() -> (citam_floorplan::Floorplan, citam_floorplan::Floorplan) {
        let entrance = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]),
            unique_name: "entrance".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Entrance,
            capacity: 0,
        };
        let stair0 = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(10.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 10.0),
            ]),
            unique_name: "stair0".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Stairs,
            capacity: 0,
        };
        let door0 = DoorInput {
            polyline: vec![Point::new(10.0, 4.0), Point::new(10.0, 6.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        let floor0 = ingest::ingest(vec![entrance, stair0], vec![door0], 20.0, 10.0, 1.0, 1e-3).unwrap();

        let stair1 = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(10.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 10.0),
            ]),
            unique_name: "stair1".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Stairs,
            capacity: 0,
        };
        let office = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(20.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 10.0),
                Point::new(20.0, 10.0),
            ]),
            unique_name: "office".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Office,
            capacity: 4,
        };
        let door1 = DoorInput {
            polyline: vec![Point::new(20.0, 4.0), Point::new(20.0, 6.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        let floor1 = ingest::ingest(vec![stair1, office], vec![door1], 20.0, 10.0, 1.0, 1e-3).unwrap();

        (floor0, floor1)
    }

    /// S6: a route from an entrance on floor 0 to an office on floor 1
    /// crosses exactly once through the aligned stair pair, and reaches the
    /// destination floor.
    #[test]
    fn s6_multifloor_route_crosses_stairs_once() {
        let (floorplan0, floorplan1) = two_floor_stairs();
        let (graph0, hallway0) = build_floor_graph(&floorplan0, &NavBuildConfig::default());
        let (graph1, hallway1) = build_floor_graph(&floorplan1, &NavBuildConfig::default());

        let floorplans = vec![floorplan0, floorplan1];
        let nav = Navigation::build(
            &floorplans,
            vec![(graph0, hallway0), (graph1, hallway1)],
            2.0,
            1e-3,
        );

        let route = nav.shortest_route_multifloor(Point::new(5.0, 5.0), 0, Point::new(25.0, 5.0), 1);
        assert!(!route.is_empty(), "entrance on floor 0 should reach the office on floor 1");
        assert_eq!(route.first().unwrap().floor, 0);
        assert_eq!(route.last().unwrap().floor, 1);

        let transitions = route.windows(2).filter(|w| w[0].floor != w[1].floor).count();
        assert_eq!(transitions, 1, "route must cross the floor boundary exactly once");

        let stair_center = Point::new(15.0, 5.0);
        let stair_visits = route.iter().filter(|p| p.point.dist(&stair_center) < 1e-6).count();
        assert_eq!(stair_visits, 2, "the stair node is visited once per floor, not revisited");
    }

    /// Invariant #3: restricting a traffic-policy segment to the direction
    /// it's actually travelled in must not disconnect that direction.
    #[test]
    fn traffic_policy_preserves_forward_reachability() {
        let floorplan = two_room_floorplan();
        let (mut graph, _hallway) = build_floor_graph(&floorplan, &NavBuildConfig::default());

        let from = Point::new(5.0, 5.0);
        let to = Point::new(5.0, 11.0);
        let before = node_path(&graph, from, to);
        assert!(before.len() >= 2, "office and hallway should start out connected");

        let (a, b) = (before[0], before[1]);
        let edge = graph.edges_from(a).iter().find(|e| e.to == b).copied().unwrap();
        let direction = if b.index() > a.index() { 1 } else { -1 };
        graph.restrict_segment(edge.segment, direction);

        let after = node_path(&graph, from, to);
        assert!(
            !after.is_empty(),
            "restricting the first leg's segment to its travelled direction must keep the pair reachable"
        );
        assert_eq!(after.first(), before.first());
        assert_eq!(after.last(), before.last());
    }

    fn node_path(graph: &NavGraph, from: Point, to: Point) -> Vec<NodeId> {
        let (Some(start), Some(goal)) = (graph.nearest_node(from), graph.nearest_node(to)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![start];
        }
        let Some(path) = dijkstra_search(|n: &NodeId| graph.neighbors(*n), &start).find(|n| *n.item() == goal)
        else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = path.iter().map(|(id, _)| id).collect();
        ids.reverse();
        ids
    }

    /// `save_routes`/`load_routes` round-trip a graph byte-identically and
    /// the reloaded graph answers the same routing query.
    #[test]
    fn save_and_load_routes_round_trip() {
        let floorplan = two_room_floorplan();
        let (graph, _hallway) = build_floor_graph(&floorplan, &NavBuildConfig::default());

        let dir = std::env::temp_dir().join("citam-nav-persist-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("routes.json");

        persist::save_routes(&graph, &path).unwrap();
        let first_bytes = std::fs::read(&path).unwrap();

        let loaded = persist::load_routes(&path).unwrap();
        assert_eq!(loaded.node_count(), graph.node_count());
        let route = dijkstra_route(&loaded, Point::new(5.0, 5.0), Point::new(5.0, 11.0));
        assert!(!route.is_empty(), "reloaded graph must still route across the door");

        persist::save_routes(&loaded, &path).unwrap();
        let second_bytes = std::fs::read(&path).unwrap();
        assert_eq!(first_bytes, second_bytes, "re-saving a loaded graph must be byte-identical");

        std::fs::remove_dir_all(&dir).ok();
    }
}
