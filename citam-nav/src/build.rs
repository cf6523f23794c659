use citam_floorplan::{Floorplan, SpaceId};
use citam_geom::{Point, Segment};
use citam_util::HashMap;

use crate::{HallwayGraph, NavGraph, SegmentId};

/// Parameters controlling how densely the navigation graph is discretized.
/// Grounded in §4.3: the nav step defaults to the aisle width divided by
/// `nav_step_divisor`, and `add_all_nav_points` trades graph density for
/// build time.
#[derive(Copy, Clone, Debug)]
pub struct NavBuildConfig {
    pub epsilon: f64,
    pub nav_step_divisor: u32,
    pub add_all_nav_points: bool,
}

impl Default for NavBuildConfig {
    fn default() -> Self {
        NavBuildConfig {
            epsilon: citam_geom::DEFAULT_EPSILON,
            nav_step_divisor: 2,
            add_all_nav_points: true,
        }
    }
}

/// Build the per-floor navigation graph and its parallel hallway adjacency
/// graph from a floorplan's aisles and doors (§4.3).
pub fn build_floor_graph(floorplan: &Floorplan, config: &NavBuildConfig) -> (NavGraph, HallwayGraph) {
    let mut graph = NavGraph::new();
    let mut space_nodes: HashMap<SpaceId, Vec<crate::NodeId>> = HashMap::default();
    let mut node_spaces: HashMap<crate::NodeId, Vec<SpaceId>> = HashMap::default();
    let mut next_segment = 0u32;

    let mut centerlines = Vec::new();

    for aisle in floorplan.aisles() {
        let w1 = floorplan.wall(aisle.w1).segment;
        let w2 = floorplan.wall(aisle.w2).segment;
        let Some((centerline, width)) = parallel_centerline(w1, w2, config.epsilon) else {
            continue;
        };
        centerlines.push((aisle.space, centerline));

        let segment_id = SegmentId::from(next_segment);
        next_segment += 1;

        let nav_step = (width / config.nav_step_divisor.max(1) as f64).max(config.epsilon);
        let length = centerline.length();
        let steps = if config.add_all_nav_points {
            ((length / nav_step).round() as usize).max(1)
        } else {
            1
        };

        let mut prev = None;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let p = lerp(centerline.a, centerline.b, t);
            let node = graph.add_node(p);
            space_nodes.entry(aisle.space).or_default().push(node);
            node_spaces.entry(node).or_default().push(aisle.space);
            if let Some(prev_node) = prev {
                graph.add_edge(prev_node, node, length / steps as f64, segment_id);
            }
            prev = Some(node);
        }
    }

    // Cross-segments: where two aisle center-lines intersect, add a node
    // there and splice it into each aisle's existing chain via its nearest
    // neighbors.
    for i in 0..centerlines.len() {
        for j in (i + 1)..centerlines.len() {
            let (space_i, seg_i) = centerlines[i];
            let (space_j, seg_j) = centerlines[j];
            if space_i == space_j {
                continue;
            }
            let Some(p) = seg_i.intersection(&seg_j) else {
                continue;
            };
            let node = graph.add_node(p);
            node_spaces.entry(node).or_default().extend([space_i, space_j]);
            let segment_id = SegmentId::from(next_segment);
            next_segment += 1;
            for space in [space_i, space_j] {
                if let Some(&nearest) = space_nodes
                    .get(&space)
                    .and_then(|nodes| nodes.iter().filter(|&&n| n != node).min_by(|&&a, &&b| {
                        graph.node(a).dist2(&p).partial_cmp(&graph.node(b).dist2(&p)).unwrap()
                    }))
                {
                    let weight = graph.node(nearest).dist(&p);
                    graph.add_edge(node, nearest, weight, segment_id);
                }
            }
            space_nodes.entry(space_i).or_default().push(node);
            space_nodes.entry(space_j).or_default().push(node);
        }
    }

    // Every space needs at least one node in the graph so routes can start
    // or end inside it even when it has no aisle network of its own
    // (offices, meeting rooms, ...).
    for space in floorplan.spaces() {
        if !space_nodes.contains_key(&space.id) {
            let node = graph.add_node(space.center());
            space_nodes.entry(space.id).or_default().push(node);
        }
    }

    // Doors: one node per door, wired to the nearest node of each space it
    // connects.
    for door in floorplan.doors() {
        let door_node = graph.add_node(door.segment.midpoint());
        let segment_id = SegmentId::from(next_segment);
        next_segment += 1;
        for space in door.connected_spaces() {
            if let Some(nearest) = space_nodes
                .get(&space)
                .and_then(|nodes| {
                    nodes
                        .iter()
                        .filter(|&&n| n != door_node)
                        .min_by(|&&a, &&b| {
                            graph
                                .node(a)
                                .dist2(&door.segment.midpoint())
                                .partial_cmp(&graph.node(b).dist2(&door.segment.midpoint()))
                                .unwrap()
                        })
                        .copied()
                })
            {
                let weight = graph.node(nearest).dist(&door.segment.midpoint());
                graph.add_edge(door_node, nearest, weight, segment_id);
            }
        }
    }

    graph.simplify();

    let special_walls: Vec<Segment> = floorplan
        .walls()
        .iter()
        .filter(|w| w.special)
        .map(|w| w.segment)
        .collect();
    graph.sanitize(&special_walls, config.epsilon);

    let mut hallway = HallwayGraph::new();
    for spaces in node_spaces.values() {
        for a in 0..spaces.len() {
            for b in (a + 1)..spaces.len() {
                hallway.add_edge(spaces[a], spaces[b]);
            }
        }
    }

    (graph, hallway)
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t)
}

/// Center-line of a hallway bounded by two parallel walls: the segment
/// midway between `w1` and `w2` spanning their overlapping projection onto
/// the shared direction, plus the perpendicular distance between them
/// (§4.3 step 1).
fn parallel_centerline(w1: Segment, w2: Segment, epsilon: f64) -> Option<(Segment, f64)> {
    if !w1.is_parallel(&w2, epsilon) {
        return None;
    }
    let (dx, dy) = w1.direction();
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let origin = w1.a;
    let proj = |p: Point| (p.x() - origin.x()) * dx + (p.y() - origin.y()) * dy;

    let (mut s0, mut s1) = (proj(w1.a), proj(w1.b));
    if s0 > s1 {
        std::mem::swap(&mut s0, &mut s1);
    }
    let (mut o0, mut o1) = (proj(w2.a), proj(w2.b));
    if o0 > o1 {
        std::mem::swap(&mut o0, &mut o1);
    }
    let lo = s0.max(o0);
    let hi = s1.min(o1);
    if hi - lo <= epsilon {
        return None;
    }

    let w2_offset = proj(w2.a);
    let point_on_w1 = |t: f64| Point::new(origin.x() + t * dx, origin.y() + t * dy);
    let point_on_w2 = |t: f64| {
        let s = t - w2_offset;
        Point::new(w2.a.x() + s * dx, w2.a.y() + s * dy)
    };
    let midline = |t: f64| point_on_w1(t).midpoint(&point_on_w2(t));

    let width = {
        let wx = w2.a.x() - w1.a.x();
        let wy = w2.a.y() - w1.a.y();
        (wx * dy - wy * dx).abs()
    };

    Some((Segment::new(midline(lo), midline(hi)), width.max(epsilon)))
}
