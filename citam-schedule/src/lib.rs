mod builder;
mod error;
mod ids;
mod meeting;
mod types;

pub use builder::ScheduleBuilder;
pub use error::ScheduleBuildError;
pub use ids::AgentId;
pub use meeting::generate_meetings;
pub use types::{
    Meeting, MeetingPolicyParams, Purpose, PurposeRule, Schedule, ScheduleBuildParams,
    ScheduleItem,
};

#[cfg(test)]
mod tests {
    use super::*;
    use citam_facility::{collect_entrances, Facility};
    use citam_floorplan::{ingest, DoorInput, SpaceFunction, SpaceInput};
    use citam_geom::{Point, Polygon};
    use citam_nav::{build_floor_graph, NavBuildConfig, Navigation};
    use citam_util::SimRng;
    use rand::SeedableRng;

    fn office_floorplan() -> citam_floorplan::Floorplan {
        let hall = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 4.0),
                Point::new(40.0, 4.0),
                Point::new(40.0, 6.0),
                Point::new(0.0, 6.0),
            ]),
            unique_name: "hall".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Aisle,
            capacity: 0,
        };
        let office = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 4.0),
                Point::new(0.0, 4.0),
            ]),
            unique_name: "office1".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Office,
            capacity: 1,
        };
        let meeting_room = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(20.0, 6.0),
                Point::new(30.0, 6.0),
                Point::new(30.0, 10.0),
                Point::new(20.0, 10.0),
            ]),
            unique_name: "meeting1".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Meeting,
            capacity: 6,
        };
        let entrance = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(30.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 4.0),
                Point::new(30.0, 4.0),
            ]),
            unique_name: "entrance1".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Entrance,
            capacity: 0,
        };
        let door_office_hall = DoorInput {
            polyline: vec![Point::new(4.0, 4.0), Point::new(6.0, 4.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        let door_hall_meeting = DoorInput {
            polyline: vec![Point::new(24.0, 6.0), Point::new(26.0, 6.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        let door_hall_entrance = DoorInput {
            polyline: vec![Point::new(34.0, 4.0), Point::new(36.0, 4.0)],
            emergency_only: false,
            in_service: true,
            special_access: false,
        };
        ingest::ingest(
            vec![hall, office, meeting_room, entrance],
            vec![door_office_hall, door_hall_meeting, door_hall_entrance],
            40.0,
            10.0,
            1.0,
            1e-6,
        )
        .unwrap()
    }

    #[test]
    fn meetings_in_same_room_do_not_overlap() {
        let fp = office_floorplan();
        let mut rng = SimRng::seed_from_u64(7);
        let facility = Facility::new(vec![fp], &mut rng);
        let params = MeetingPolicyParams {
            min_meeting_duration: 5,
            max_meeting_length: 15,
            meeting_duration_increment: 5,
            avg_meetings_per_room: 4,
            percent_meeting_rooms_used: 1.0,
            avg_meetings_per_person: 2,
            min_attendees_per_meeting: 2,
            min_buffer_between_meetings: 1,
            max_buffer_between_meetings: 3,
        };
        let meetings = generate_meetings(&facility, &params, 10, 200, &mut rng);
        for room_meetings in meetings.chunk_by(|a, b| a.location == b.location) {
            for i in 0..room_meetings.len() {
                for j in (i + 1)..room_meetings.len() {
                    assert!(!room_meetings[i].overlaps(&room_meetings[j]));
                }
            }
        }
    }

    #[test]
    fn schedule_itinerary_covers_full_active_window() {
        let fp = office_floorplan();
        let mut rng = SimRng::seed_from_u64(3);
        let facility = Facility::new(vec![fp], &mut rng);
        let (graph, hallway) = build_floor_graph(facility.floorplan(0), &NavBuildConfig::default());
        let navigation = Navigation::build(facility.floorplans(), vec![(graph, hallway)], 1.0, 1e-6);

        let entrances = collect_entrances(&facility);
        let entrance = entrances[0];
        let exit = entrances[0];

        let params = ScheduleBuildParams {
            daylength: 480,
            buffer: 10,
            scale: 1.0,
            walking_speed_m_per_step: 1.0,
            meeting_lookahead: 30,
            possible_purposes: vec![PurposeRule {
                purpose: Purpose::OfficeWork,
                min_duration: 30,
                max_duration: 60,
                increment: 10,
            }],
        };

        let builder = ScheduleBuilder::new(&facility, &navigation, &params);
        let schedule = builder
            .build(
                AgentId::from(0u32),
                entrance,
                exit,
                0,
                citam_floorplan::SpaceId::from(1u32),
                60,
                &[],
                &mut rng,
            )
            .unwrap();

        assert_eq!(
            schedule.itinerary.len() as u32,
            schedule.exit_time - schedule.start_time
        );
        assert!(schedule.position_at(schedule.start_time).is_some());
        assert!(schedule.position_at(schedule.exit_time).is_none());
    }
}
