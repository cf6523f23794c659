//! Facility-level view over a multi-floor set of floorplans: space
//! classification by function, entrance selection, and the mutable office
//! pool the scheduler draws from (§4.5).

mod entrance;
mod facility;

pub use entrance::{choose_best_entrance, collect_entrances, Entrance};
pub use facility::{Facility, FloorIndex};

#[cfg(test)]
mod tests {
    use citam_floorplan::{ingest, DoorId, DoorInput, SpaceFunction, SpaceInput};
    use citam_geom::{Point, Polygon};
    use citam_nav::{build_floor_graph, NavBuildConfig, Navigation};

    use super::*;

    fn single_office_facility() -> Facility {
        let office = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]),
            unique_name: "office".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Office,
            capacity: 4,
        };
        let floorplan = ingest::ingest(vec![office], Vec::<DoorInput>::new(), 10.0, 10.0, 1.0, 1e-6).unwrap();
        let mut rng = citam_util::srng("citam-facility-tests");
        Facility::new(vec![floorplan], &mut rng)
    }

    /// Two candidate entrances routing to the same point (so their routed
    /// distance ties exactly) must be broken by `(floor, door id)`, per
    /// `choose_best_entrance`'s documented tie-break rule.
    #[test]
    fn choose_best_entrance_ties_break_by_floor_then_door_id() {
        let facility = single_office_facility();
        let office_id = facility.floorplan(0).spaces()[0].id;
        let office_point = facility.floorplan(0).space(office_id).center();

        let (graph, hallway) = build_floor_graph(facility.floorplan(0), &NavBuildConfig::default());
        let navigation = Navigation::build(facility.floorplans(), vec![(graph, hallway)], 10.0, 1e-3);

        let entrances = vec![
            Entrance { floor: 0, door: Some(DoorId(5)), point: office_point },
            Entrance { floor: 0, door: Some(DoorId(1)), point: office_point },
        ];

        let chosen = choose_best_entrance(&facility, &navigation, &entrances, 0, office_id)
            .expect("office should be reachable from both tied entrances");
        assert_eq!(chosen.door, Some(DoorId(1)));
    }
}
