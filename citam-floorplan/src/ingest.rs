use citam_geom::{Point, Polygon, Segment};
use citam_util::HashSet;

use crate::{Aisle, Door, DoorId, Space, SpaceFunction, SpaceId, Wall, WallId};
use crate::Floorplan;

/// One parsed space polygon plus the metadata the external SVG/CSV parser
/// attaches to it (out of scope here; we just consume its output).
#[derive(Clone, Debug)]
pub struct SpaceInput {
    pub polygon: Polygon,
    pub unique_name: String,
    pub building: String,
    pub space_function: SpaceFunction,
    pub capacity: u32,
}

/// One parsed door polyline. Only the endpoints matter to the geometry
/// kernel; a multi-vertex polyline is treated as the segment from its first
/// to its last point.
#[derive(Clone, Debug)]
pub struct DoorInput {
    pub polyline: Vec<Point>,
    pub emergency_only: bool,
    pub in_service: bool,
    pub special_access: bool,
}

impl DoorInput {
    fn segment(&self) -> Option<Segment> {
        let a = *self.polyline.first()?;
        let b = *self.polyline.last()?;
        Some(Segment::new(a, b))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("space {0:?} has a malformed boundary (fewer than 3 non-collinear vertices)")]
    MalformedPolygon(String),
}

/// Assemble a [`Floorplan`] from parsed space polygons and door polylines:
/// assigns dense space ids, attaches doors to the spaces whose boundary they
/// overlap, derives wall segments as boundary minus doors, and pairs up
/// hallway walls into aisles.
pub fn ingest(
    spaces_in: Vec<SpaceInput>,
    doors_in: Vec<DoorInput>,
    width: f64,
    height: f64,
    scale: f64,
    epsilon: f64,
) -> Result<Floorplan, IngestError> {
    for s in &spaces_in {
        if !s.polygon.is_valid() {
            return Err(IngestError::MalformedPolygon(s.unique_name.clone()));
        }
    }

    let mut spaces: Vec<Space> = spaces_in
        .into_iter()
        .enumerate()
        .map(|(i, s)| Space {
            id: SpaceId::from(i),
            unique_name: s.unique_name,
            space_function: s.space_function,
            building: s.building,
            capacity: s.capacity,
            boundary: s.polygon,
            walls: Vec::new(),
            doors: Vec::new(),
        })
        .collect();

    // Attach each door to the one or two spaces whose boundary segment it
    // overlaps; a door reaching no boundary at all is a parser artifact and
    // gets dropped with a warning.
    let mut doors = Vec::with_capacity(doors_in.len());
    for door_in in doors_in {
        let Some(door_seg) = door_in.segment() else {
            log::warn!("dropping door with fewer than 2 polyline points");
            continue;
        };

        let mut attached = Vec::new();
        for space in &spaces {
            if attached.len() == 2 {
                break;
            }
            let overlaps = space
                .boundary
                .edges()
                .any(|edge| edge.collinear_overlap(&door_seg, epsilon).is_some());
            if overlaps {
                attached.push(space.id);
            }
        }

        if attached.is_empty() {
            log::warn!("dropping door at {:?}: overlaps no space boundary", door_seg);
            continue;
        }

        let id = DoorId::from(doors.len());
        for &space_id in &attached {
            spaces[space_id.index()].doors.push(id);
        }
        doors.push(Door {
            id,
            segment: door_seg,
            spaces: (attached.first().copied(), attached.get(1).copied()),
            emergency_only: door_in.emergency_only,
            in_service: door_in.in_service,
            special_access: door_in.special_access,
        });
    }

    // Derive walls: every boundary edge minus the portions any attached
    // door's segment covers, then pair up hallway walls into aisles.
    let mut walls: Vec<Wall> = Vec::new();
    let mut aisles: Vec<Aisle> = Vec::new();

    for space_idx in 0..spaces.len() {
        let door_segments: Vec<Segment> = spaces[space_idx]
            .doors
            .iter()
            .map(|&id| doors[id.index()].segment)
            .collect();

        let mut space_wall_ids = Vec::new();
        for edge in spaces[space_idx].boundary.edges() {
            for remainder in subtract_covered(edge, &door_segments, epsilon) {
                let id = WallId::from(walls.len());
                walls.push(Wall {
                    id,
                    segment: remainder,
                    special: false,
                });
                spaces[space_idx].walls.push(remainder);
                space_wall_ids.push(id);
            }
        }

        if spaces[space_idx].is_hallway() {
            let space_id = spaces[space_idx].id;
            aisles.extend(pair_aisles(
                space_id,
                &spaces[space_idx].boundary,
                &space_wall_ids,
                &walls,
                epsilon,
            ));
        }
    }

    Ok(Floorplan::new(spaces, doors, walls, aisles, width, height, scale))
}

/// Register a wall added after initial ingest (e.g. a facility update). It
/// is marked `special` so the navigation builder re-splits any edge that
/// crosses it.
pub fn add_special_wall(floorplan: &mut Floorplan, segment: Segment) -> WallId {
    floorplan.push_wall(Wall {
        id: WallId::from(floorplan.walls().len()),
        segment,
        special: true,
    })
}

/// Subtract the portions of `edge` that any segment in `covers` overlaps,
/// returning the remaining wall sub-segments (0, 1 or 2 pieces, depending on
/// whether a door sits at the end or in the middle of the wall).
fn subtract_covered(edge: Segment, covers: &[Segment], epsilon: f64) -> Vec<Segment> {
    let len = edge.length();
    if len < epsilon {
        return Vec::new();
    }
    let (dx, dy) = edge.direction();
    let proj = |p: Point| {
        (((p.x() - edge.a.x()) * dx + (p.y() - edge.a.y()) * dy)).clamp(0.0, len)
    };

    let mut intervals: Vec<(f64, f64)> = covers
        .iter()
        .filter_map(|c| {
            edge.collinear_overlap(c, epsilon).map(|ov| {
                let (mut t0, mut t1) = (proj(ov.a), proj(ov.b));
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                (t0, t1)
            })
        })
        .collect();
    intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (s, e) in intervals {
        if let Some(last) = merged.last_mut() {
            if s <= last.1 + epsilon {
                last.1 = last.1.max(e);
                continue;
            }
        }
        merged.push((s, e));
    }

    let point_at = |t: f64| Point::new(edge.a.x() + t * dx, edge.a.y() + t * dy);

    let mut remainder = Vec::new();
    let mut cursor = 0.0;
    for (s, e) in merged {
        if s - cursor > epsilon {
            remainder.push(Segment::new(point_at(cursor), point_at(s)));
        }
        cursor = cursor.max(e);
    }
    if len - cursor > epsilon {
        remainder.push(Segment::new(point_at(cursor), point_at(len)));
    }
    remainder
}

/// Pair each wall of a hallway space with its closest parallel partner whose
/// midline lies inside the space, per §4.2 step 4.
fn pair_aisles(
    space: SpaceId,
    boundary: &Polygon,
    wall_ids: &[WallId],
    walls: &[Wall],
    epsilon: f64,
) -> Vec<Aisle> {
    let mut used = HashSet::default();
    let mut aisles = Vec::new();

    for &w1 in wall_ids {
        if used.contains(&w1) {
            continue;
        }
        let seg1 = walls[w1.index()].segment;

        let mut best: Option<(WallId, f64)> = None;
        for &w2 in wall_ids {
            if w2 == w1 || used.contains(&w2) {
                continue;
            }
            let seg2 = walls[w2.index()].segment;
            if !seg1.is_parallel(&seg2, epsilon) {
                continue;
            }
            let mid = seg1.midpoint().midpoint(&seg2.midpoint());
            if !boundary.contains_point(mid) {
                continue;
            }
            let dist = seg1.distance_to_point(seg2.midpoint());
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((w2, dist));
            }
        }

        if let Some((w2, _)) = best {
            aisles.push(Aisle { w1, w2, space });
            used.insert(w1);
            used.insert(w2);
        }
    }

    aisles
}
