//! Agent-based indoor close-contact exposure simulation: wires floorplan
//! ingest, navigation, facility indexing, scheduling, and the simulation
//! loop into a single `run` entry point (§2, §6).

mod config;
mod error;
mod pipeline;

pub use config::{EntranceSpec, Occupancy, RunConfig, ShiftSpec};
pub use error::{CitamError, InputError};
pub use pipeline::{run, RunSummary};

pub use citam_facility::{Entrance, Facility, FloorIndex};
pub use citam_floorplan::{ingest, Floorplan};
pub use citam_nav::{FloorId, Navigation};
pub use citam_schedule::{AgentId, MeetingPolicyParams, Schedule, ScheduleBuildParams};
pub use citam_sim::{Manifest, Statistic, Statistics};

#[cfg(test)]
mod tests {
    use citam_floorplan::{ingest, DoorInput, SpaceFunction, SpaceInput};
    use citam_geom::{Point, Polygon};
    use citam_schedule::{Purpose, PurposeRule};
    use citam_util::srng;

    use super::*;

    /// Two floors, each a single office/entrance pair joined by a hallway,
    /// with a stairwell lined up between floors so routes can cross.
    fn two_floor_facility() -> Vec<Floorplan> {
        let floor = |with_stairs: bool| {
            let entrance = SpaceInput {
                polygon: Polygon::new(vec![
                    Point::new(0.0, 0.0),
                    Point::new(4.0, 0.0),
                    Point::new(4.0, 4.0),
                    Point::new(0.0, 4.0),
                ]),
                unique_name: "entrance".into(),
                building: "b1".into(),
                space_function: SpaceFunction::Entrance,
                capacity: 0,
            };
            let hall = SpaceInput {
                polygon: Polygon::new(vec![
                    Point::new(4.0, 0.0),
                    Point::new(20.0, 0.0),
                    Point::new(20.0, 4.0),
                    Point::new(4.0, 4.0),
                ]),
                unique_name: "hall".into(),
                building: "b1".into(),
                space_function: SpaceFunction::Aisle,
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
            let mut spaces = vec![entrance, hall, office];
            let mut doors = vec![
                DoorInput {
                    polyline: vec![Point::new(4.0, 1.0), Point::new(4.0, 3.0)],
                    emergency_only: false,
                    in_service: true,
                    special_access: false,
                },
                DoorInput {
                    polyline: vec![Point::new(20.0, 1.0), Point::new(20.0, 3.0)],
                    emergency_only: false,
                    in_service: true,
                    special_access: false,
                },
            ];
            if with_stairs {
                spaces.push(SpaceInput {
                    polygon: Polygon::new(vec![
                        Point::new(30.0, 0.0),
                        Point::new(34.0, 0.0),
                        Point::new(34.0, 4.0),
                        Point::new(30.0, 4.0),
                    ]),
                    unique_name: "stairs".into(),
                    building: "b1".into(),
                    space_function: SpaceFunction::Stairs,
                    capacity: 0,
                });
                doors.push(DoorInput {
                    polyline: vec![Point::new(30.0, 1.0), Point::new(30.0, 3.0)],
                    emergency_only: false,
                    in_service: true,
                    special_access: false,
                });
            }
            ingest::ingest(spaces, doors, 34.0, 10.0, 1.0, 1e-3).unwrap()
        };
        vec![floor(true), floor(true)]
    }

    fn run_config() -> RunConfig {
        RunConfig {
            facility_name: "test-tower".into(),
            floors: vec!["1".into(), "2".into()],
            entrances: vec![EntranceSpec { name: "entrance".into(), floor: 0 }],
            occupancy: Occupancy::AgentCount { n_agents: 2 },
            daylength: 40,
            buffer: 5,
            timestep: 1.0,
            contact_distance: 2.0,
            shifts: vec![ShiftSpec { name: "day".into(), start_time: 0, percent_workforce: 1.0 }],
            scheduling_policy: Some(ScheduleBuildParams {
                daylength: 40,
                buffer: 5,
                scale: 1.0,
                walking_speed_m_per_step: 5.0,
                meeting_lookahead: 5,
                possible_purposes: vec![PurposeRule {
                    purpose: Purpose::OfficeWork,
                    min_duration: 10,
                    max_duration: 20,
                    increment: 1,
                }],
            }),
            meetings_policy_params: None,
            traffic_policy: None,
            output_directory: std::env::temp_dir().join("citam-pipeline-test"),
            upload_location: None,
        }
    }

    #[test]
    fn run_produces_a_schedule_and_statistics_for_every_agent() {
        let floorplans = two_floor_facility();
        let config = run_config();
        let mut rng = srng(&"pipeline-test");

        let summary = run(&config, floorplans, &mut rng).expect("pipeline run should succeed on a tiny facility");

        assert_eq!(summary.manifest.number_of_agents, 2);
        assert_eq!(summary.statistics.data.len(), 6);
        assert!(std::fs::metadata(config.output_directory.join("manifest.json")).is_ok());
        assert!(std::fs::metadata(config.output_directory.join("trajectory.txt")).is_ok());

        std::fs::remove_dir_all(&config.output_directory).ok();
    }

    #[test]
    fn run_fails_fast_on_missing_scheduling_policy() {
        let floorplans = two_floor_facility();
        let mut config = run_config();
        config.scheduling_policy = None;
        let mut rng = srng(&"pipeline-missing-policy");

        let err = run(&config, floorplans, &mut rng).unwrap_err();
        assert!(matches!(err, CitamError::Input(InputError::MissingField("scheduling_policy"))));
    }
}
