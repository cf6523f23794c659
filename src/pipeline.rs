use citam_facility::{choose_best_entrance, collect_entrances, Entrance, Facility};
use citam_floorplan::{Floorplan, SpaceId};
use citam_nav::{build_floor_graph, FloorId, HallwayGraph, NavBuildConfig, Navigation};
use citam_schedule::{generate_meetings, AgentId, Meeting, Schedule, ScheduleBuildError, ScheduleBuilder, ScheduleBuildParams};
use citam_sim::{write_all, Agent, Manifest, Simulation, SimulationConfig, Statistics};
use citam_util::SimRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Occupancy, RunConfig};
use crate::error::{CitamError, InputError};

/// Vertical stair-to-stair edge weight, in the same drawing units as every
/// other edge (§4.4 doesn't fix a value; a flat per-floor-transition cost
/// keeps multi-floor routes from being dominated by a single long hop).
const VERTICAL_TRANSITION_WEIGHT: f64 = 10.0;

/// Everything a caller needs after a run completes: the summary statistics
/// written to `statistics.json`, plus the manifest describing the run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub manifest: Manifest,
    pub statistics: Statistics,
}

/// Run the full pipeline (§2 data flow, C5 onward): build navigation and
/// the facility index, generate meetings, build every agent's schedule,
/// simulate, and write every output file. Floorplan ingest (C3) happens
/// before this is called — SVG/CSV parsing is an external collaborator,
/// out of scope here.
pub fn run(config: &RunConfig, floorplans: Vec<Floorplan>, rng: &mut SimRng) -> Result<RunSummary, CitamError> {
    let nav_config = NavBuildConfig::default();
    let floor_graphs: Vec<(citam_nav::NavGraph, HallwayGraph)> = floorplans
        .iter()
        .map(|fp| build_floor_graph(fp, &nav_config))
        .collect();

    let mut facility = Facility::new(floorplans, rng);
    let mut navigation = Navigation::build(
        facility.floorplans(),
        floor_graphs,
        VERTICAL_TRANSITION_WEIGHT,
        nav_config.epsilon,
    );
    if let Some(policy) = &config.traffic_policy {
        navigation.apply_traffic_policy(policy);
    }

    let entrances = collect_entrances(&facility);
    if entrances.is_empty() {
        return Err(InputError::InvalidField("facility has no entrances").into());
    }

    let n_agents = resolve_agent_count(config, &facility)?;

    let meetings = match &config.meetings_policy_params {
        Some(params) => generate_meetings(&facility, params, n_agents, config.daylength, rng),
        None => Vec::new(),
    };

    let schedule_params = config
        .scheduling_policy
        .as_ref()
        .ok_or(InputError::MissingField("scheduling_policy"))?;

    let mut agents = Vec::with_capacity(n_agents as usize);
    for i in 0..n_agents {
        let agent_id = AgentId::from(i);
        let shift_start = pick_shift_start(&config.shifts, rng);
        let attendee_meetings: Vec<&Meeting> = meetings.iter().filter(|m| m.attendees.contains(&agent_id)).collect();

        let schedule = build_agent_schedule(
            &mut facility,
            &navigation,
            schedule_params,
            agent_id,
            &entrances,
            shift_start,
            &attendee_meetings,
            rng,
        )?;
        agents.push(Agent::new(agent_id, schedule));
    }

    let hallway_graphs: Vec<&HallwayGraph> = (0..facility.floor_count() as FloorId)
        .map(|floor| {
            navigation
                .hallway(floor)
                .expect("Navigation::build populates one hallway graph per floor")
        })
        .collect();

    let mut simulation = Simulation::new(
        &facility,
        hallway_graphs,
        SimulationConfig {
            contact_distance: config.contact_distance,
            daylength: config.daylength,
        },
    );
    simulation.initialize(agents);
    simulation.run();
    let (agents, events) = simulation.finalize();

    let manifest = Manifest {
        run_id: config.facility_name.clone(),
        run_name: config.facility_name.clone(),
        simulation_name: config.facility_name.clone(),
        simulation_hash: simulation_hash(config),
        timestep_in_sec: config.timestep,
        number_of_floors: config.floors.len(),
        number_of_one_way_aisles: config.traffic_policy.as_ref().map_or(0, |p| p.len()),
        number_of_agents: agents.len(),
        facility_name: config.facility_name.clone(),
        max_room_occupancy: facility
            .floorplans()
            .iter()
            .flat_map(|fp| fp.spaces())
            .map(|s| s.capacity)
            .max()
            .unwrap_or(0),
        number_of_shifts: config.shifts.len(),
        number_of_entrances: entrances.len(),
        number_of_exits: entrances.len(),
        entrance_screening: false,
        trajectory_file: "trajectory.txt".to_string(),
        floors: config.floors.clone(),
        scale_multiplier: facility.floorplan(0).scale,
        timestep: config.timestep,
    };

    let statistics = write_all(
        &config.output_directory,
        &manifest,
        &agents,
        &events,
        facility.floor_count(),
        config.daylength,
    )?;

    Ok(RunSummary { manifest, statistics })
}

fn resolve_agent_count(config: &RunConfig, facility: &Facility) -> Result<u32, InputError> {
    match config.occupancy {
        Occupancy::AgentCount { n_agents } => Ok(n_agents),
        Occupancy::OccupancyRate { occupancy_rate: rate } => {
            let total_offices: usize = (0..facility.floor_count() as FloorId)
                .map(|f| facility.index(f).offices.len())
                .sum();
            Ok(((total_offices as f64) * rate).round() as u32)
        }
    }
}

fn pick_shift_start(shifts: &[crate::config::ShiftSpec], rng: &mut SimRng) -> u32 {
    let draw: f64 = rng.random();
    let mut cumulative = 0.0;
    for shift in shifts {
        cumulative += shift.percent_workforce;
        if draw <= cumulative {
            return shift.start_time;
        }
    }
    shifts.last().map(|s| s.start_time).unwrap_or(0)
}

fn pick_office_floor(facility: &Facility, rng: &mut SimRng) -> Option<FloorId> {
    let candidates: Vec<FloorId> = (0..facility.floor_count() as FloorId)
        .filter(|&f| facility.remaining_offices(f) > 0)
        .collect();
    candidates.choose(rng).copied()
}

#[allow(clippy::too_many_arguments)]
fn build_agent_schedule(
    facility: &mut Facility,
    navigation: &Navigation,
    params: &ScheduleBuildParams,
    agent_id: AgentId,
    entrances: &[Entrance],
    shift_start: u32,
    meetings: &[&Meeting],
    rng: &mut SimRng,
) -> Result<Schedule, CitamError> {
    let Some(mut office_floor) = pick_office_floor(facility, rng) else {
        return Err(InputError::InvalidField("facility has no office capacity left for n_agents").into());
    };
    let mut office_id = facility
        .draw_office(office_floor)
        .expect("pick_office_floor only returns floors with remaining offices");

    match try_schedule(facility, navigation, params, agent_id, entrances, office_floor, office_id, shift_start, meetings, rng) {
        Ok(schedule) => Ok(schedule),
        Err(_) => {
            facility.return_office(office_floor, office_id);
            let Some(retry_floor) = pick_office_floor(facility, rng) else {
                return Err(InputError::InvalidField("facility has no office capacity left for n_agents").into());
            };
            office_floor = retry_floor;
            office_id = facility
                .draw_office(office_floor)
                .expect("pick_office_floor only returns floors with remaining offices");
            try_schedule(facility, navigation, params, agent_id, entrances, office_floor, office_id, shift_start, meetings, rng)
                .map_err(CitamError::from)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn try_schedule(
    facility: &Facility,
    navigation: &Navigation,
    params: &ScheduleBuildParams,
    agent_id: AgentId,
    entrances: &[Entrance],
    office_floor: FloorId,
    office_id: SpaceId,
    shift_start: u32,
    meetings: &[&Meeting],
    rng: &mut SimRng,
) -> Result<Schedule, ScheduleBuildError> {
    let entrance = choose_best_entrance(facility, navigation, entrances, office_floor, office_id)
        .ok_or(ScheduleBuildError::NoEntrance { agent: agent_id, office_floor })?;
    let builder = ScheduleBuilder::new(facility, navigation, params);
    builder.build(agent_id, entrance, entrance, office_floor, office_id, shift_start, meetings, rng)
}

fn simulation_hash(config: &RunConfig) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    config.facility_name.hash(&mut hasher);
    config.daylength.hash(&mut hasher);
    config.floors.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}
