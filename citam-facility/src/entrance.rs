use citam_floorplan::{DoorId, SpaceFunction};
use citam_geom::Point;
use citam_nav::{FloorId, Navigation};

use crate::Facility;

/// A candidate facility entrance: the midpoint of a door attached to an
/// entrance-function space, or the space's own center if it has no doors.
#[derive(Copy, Clone, Debug)]
pub struct Entrance {
    pub floor: FloorId,
    pub door: Option<DoorId>,
    pub point: Point,
}

/// Every candidate entrance across the facility, gathered once at startup.
pub fn collect_entrances(facility: &Facility) -> Vec<Entrance> {
    let mut entrances = Vec::new();
    for floor in 0..facility.floor_count() as FloorId {
        let floorplan = facility.floorplan(floor);
        for &space_id in &facility.index(floor).entrances {
            let space = floorplan.space(space_id);
            if space.doors.is_empty() {
                entrances.push(Entrance { floor, door: None, point: space.center() });
                continue;
            }
            for &door_id in &space.doors {
                let door = floorplan.door(door_id);
                entrances.push(Entrance {
                    floor,
                    door: Some(door_id),
                    point: door.segment.midpoint(),
                });
            }
        }
    }
    entrances
}

/// Among `entrances`, return the one minimizing routed distance to
/// `office_floor`/`office_id`'s center, tie-breaking by floor then door id
/// (§4.5). `None` if no entrance can route to the office at all.
pub fn choose_best_entrance(
    facility: &Facility,
    navigation: &Navigation,
    entrances: &[Entrance],
    office_floor: FloorId,
    office_id: citam_floorplan::SpaceId,
) -> Option<Entrance> {
    debug_assert!(matches!(
        facility.floorplan(office_floor).space(office_id).space_function,
        SpaceFunction::Office
    ));
    let office_point = facility.floorplan(office_floor).space(office_id).center();

    let mut best: Option<(Entrance, f64)> = None;
    for &entrance in entrances {
        let route = navigation.shortest_route_multifloor(
            entrance.point,
            entrance.floor,
            office_point,
            office_floor,
        );
        if route.is_empty() {
            continue;
        }
        let distance: f64 = route
            .windows(2)
            .map(|w| w[0].point.dist(&w[1].point))
            .sum();

        let better = match &best {
            None => true,
            Some((best_entrance, best_distance)) => {
                distance < *best_distance
                    || (distance == *best_distance
                        && (entrance.floor, entrance.door.map(|d| d.0))
                            < (best_entrance.floor, best_entrance.door.map(|d| d.0)))
            }
        };
        if better {
            best = Some((entrance, distance));
        }
    }
    best.map(|(e, _)| e)
}
