use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use citam_nav::FloorId;
use citam_util::{HashMap, HashSet};
use serde::Serialize;

use crate::agent::Agent;
use crate::contact::ContactEvents;
use crate::error::OutputError;

/// `manifest.json` (§6): top-level run metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Manifest {
    #[serde(rename = "RunID")]
    pub run_id: String,
    #[serde(rename = "RunName")]
    pub run_name: String,
    #[serde(rename = "SimulationName")]
    pub simulation_name: String,
    #[serde(rename = "SimulationHash")]
    pub simulation_hash: String,
    #[serde(rename = "TimestepInSec")]
    pub timestep_in_sec: f64,
    #[serde(rename = "NumberOfFloors")]
    pub number_of_floors: usize,
    #[serde(rename = "NumberOfOneWayAisles")]
    pub number_of_one_way_aisles: usize,
    #[serde(rename = "NumberOfAgents")]
    pub number_of_agents: usize,
    #[serde(rename = "FacilityName")]
    pub facility_name: String,
    #[serde(rename = "MaxRoomOccupancy")]
    pub max_room_occupancy: u32,
    #[serde(rename = "NumberOfShifts")]
    pub number_of_shifts: usize,
    #[serde(rename = "NumberOfEntrances")]
    pub number_of_entrances: usize,
    #[serde(rename = "NumberOfExits")]
    pub number_of_exits: usize,
    #[serde(rename = "EntranceScreening")]
    pub entrance_screening: bool,
    #[serde(rename = "TrajectoryFile")]
    pub trajectory_file: String,
    #[serde(rename = "Floors")]
    pub floors: Vec<String>,
    #[serde(rename = "ScaleMultiplier")]
    pub scale_multiplier: f64,
    #[serde(rename = "Timestep")]
    pub timestep: f64,
}

/// One entry of `statistics.json`'s `data` array.
#[derive(Clone, Debug, Serialize)]
pub struct Statistic {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Statistics {
    #[serde(rename = "SimulationName")]
    pub simulation_name: String,
    pub data: Vec<Statistic>,
}

/// Compute the six summary statistics from §4.8's finalize step.
pub fn compute_statistics(simulation_name: &str, agents: &[Agent], events: &ContactEvents) -> Statistics {
    let n_agents = agents.len().max(1) as f64;
    let total_contact_time: u64 = agents.iter().map(|a| a.cumulative_contact_duration as u64).sum();
    let agents_with_contacts = agents.iter().filter(|a| a.cumulative_contact_duration > 0).count();

    let mut distinct_partners: HashMap<_, HashSet<_>> = HashMap::default();
    for ((a, b), _) in events.pairs() {
        distinct_partners.entry(*a).or_default().insert(*b);
        distinct_partners.entry(*b).or_default().insert(*a);
    }
    let total_distinct: usize = distinct_partners.values().map(|s| s.len()).sum();
    let max_contacts = agents
        .iter()
        .map(|a| a.cumulative_contact_duration)
        .max()
        .unwrap_or(0);

    let data = vec![
        Statistic {
            name: "total_contact_time".into(),
            value: total_contact_time as f64,
            unit: "timesteps".into(),
        },
        Statistic {
            name: "average_contact_time_per_agent".into(),
            value: total_contact_time as f64 / n_agents,
            unit: "timesteps".into(),
        },
        Statistic {
            name: "n_agents_with_contacts".into(),
            value: agents_with_contacts as f64,
            unit: "agents".into(),
        },
        Statistic {
            name: "average_distinct_contacts_per_agent".into(),
            value: total_distinct as f64 / n_agents,
            unit: "agents".into(),
        },
        Statistic {
            name: "max_contacts".into(),
            value: max_contacts as f64,
            unit: "timesteps".into(),
        },
        Statistic {
            name: "total_contact_events".into(),
            value: events.event_count() as f64,
            unit: "events".into(),
        },
    ];

    Statistics {
        simulation_name: simulation_name.to_string(),
        data,
    }
}

pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<(), OutputError> {
    let path = dir.join("manifest.json");
    let file = open(&path)?;
    serde_json::to_writer_pretty(file, manifest).map_err(|e| OutputError::Serialize("manifest.json", e))
}

pub fn write_statistics(dir: &Path, statistics: &Statistics) -> Result<(), OutputError> {
    let path = dir.join("statistics.json");
    let file = open(&path)?;
    serde_json::to_writer_pretty(file, statistics).map_err(|e| OutputError::Serialize("statistics.json", e))
}

/// `trajectory.txt`: one block per step, one line per active agent.
pub fn write_trajectory(dir: &Path, agents: &[Agent], daylength: u32) -> Result<(), OutputError> {
    let path = dir.join("trajectory.txt");
    let mut writer = BufWriter::new(open(&path)?);
    for t in 0..daylength {
        writeln!(writer, "step {t}").map_err(|e| OutputError::NotWritable(path.clone(), e))?;
        for agent in agents {
            if !agent.is_active(t) {
                continue;
            }
            if let Some(rp) = agent.schedule.position_at(t) {
                writeln!(
                    writer,
                    "{} {:.3} {:.3} {}",
                    agent.id.0,
                    rp.point.x(),
                    rp.point.y(),
                    rp.floor
                )
                .map_err(|e| OutputError::NotWritable(path.clone(), e))?;
            }
        }
    }
    Ok(())
}

/// `pair_contact.csv`: header `agent1,agent2,n_contacts`, one row per pair
/// that ever registered a contact, summing that pair's event durations.
pub fn write_pair_contacts(dir: &Path, events: &ContactEvents) -> Result<(), OutputError> {
    let path = dir.join("pair_contact.csv");
    let mut writer = csv::Writer::from_path(&path).map_err(|e| OutputError::Csv("pair_contact.csv", e))?;
    writer
        .write_record(["agent1", "agent2", "n_contacts"])
        .map_err(|e| OutputError::Csv("pair_contact.csv", e))?;
    let mut rows: Vec<((u32, u32), u32)> = events
        .pairs()
        .map(|((a, b), list)| ((a.0, b.0), list.iter().map(|e| e.duration).sum()))
        .collect();
    rows.sort();
    for ((a, b), n) in rows {
        writer
            .write_record([a.to_string(), b.to_string(), n.to_string()])
            .map_err(|e| OutputError::Csv("pair_contact.csv", e))?;
    }
    writer.flush().map_err(|e| OutputError::NotWritable(path.clone(), e))
}

/// `raw_contact_data.ccd`: the full ContactEvent list, one line per event.
pub fn write_raw_contact_data(dir: &Path, events: &ContactEvents) -> Result<(), OutputError> {
    let path = dir.join("raw_contact_data.ccd");
    let mut writer = BufWriter::new(open(&path)?);
    let mut pairs: Vec<_> = events.pairs().collect();
    pairs.sort_by_key(|(k, _)| **k);
    for (_, list) in pairs {
        for event in list {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                event.pair_key(),
                event.start_step,
                event.duration,
                event.floor
            )
            .map_err(|e| OutputError::NotWritable(path.clone(), e))?;
        }
    }
    Ok(())
}

/// `contact_dist_per_agent.csv`: header `agent_ID,Number_of_Contacts`.
pub fn write_contact_dist_per_agent(dir: &Path, agents: &[Agent]) -> Result<(), OutputError> {
    let path = dir.join("contact_dist_per_agent.csv");
    let mut writer =
        csv::Writer::from_path(&path).map_err(|e| OutputError::Csv("contact_dist_per_agent.csv", e))?;
    writer
        .write_record(["agent_ID", "Number_of_Contacts"])
        .map_err(|e| OutputError::Csv("contact_dist_per_agent.csv", e))?;
    let mut rows: Vec<(u32, u32)> = agents.iter().map(|a| (a.id.0, a.cumulative_contact_duration)).collect();
    rows.sort();
    for (id, n) in rows {
        writer
            .write_record([id.to_string(), n.to_string()])
            .map_err(|e| OutputError::Csv("contact_dist_per_agent.csv", e))?;
    }
    writer.flush().map_err(|e| OutputError::NotWritable(path.clone(), e))
}

/// Per-floor `contacts.txt` and `contact_dist_per_coord.csv`, written under
/// `dir/floor_<n>/`. `map.svg`/`heatmap.svg` rendering is out of scope.
pub fn write_per_floor(dir: &Path, floor_count: usize, events: &ContactEvents) -> Result<(), OutputError> {
    for floor in 0..floor_count as FloorId {
        let floor_dir = dir.join(format!("floor_{floor}"));
        std::fs::create_dir_all(&floor_dir).map_err(|e| OutputError::NotWritable(floor_dir.clone(), e))?;

        let Some(locations) = events.contact_locations(floor) else {
            continue;
        };
        let sorted: BTreeMap<(i64, i64), u32> = locations
            .iter()
            .map(|(p, n)| (((p.x() * 1000.0).round() as i64, (p.y() * 1000.0).round() as i64), *n))
            .collect();

        let contacts_path = floor_dir.join("contacts.txt");
        let mut writer = BufWriter::new(open(&contacts_path)?);
        for ((x, y), n) in &sorted {
            writeln!(writer, "{:.3}\t{:.3}\t{n}", *x as f64 / 1000.0, *y as f64 / 1000.0)
                .map_err(|e| OutputError::NotWritable(contacts_path.clone(), e))?;
        }

        let coord_path = floor_dir.join("contact_dist_per_coord.csv");
        let mut csv_writer =
            csv::Writer::from_path(&coord_path).map_err(|e| OutputError::Csv("contact_dist_per_coord.csv", e))?;
        csv_writer
            .write_record(["x", "y", "n_contacts"])
            .map_err(|e| OutputError::Csv("contact_dist_per_coord.csv", e))?;
        for ((x, y), n) in &sorted {
            csv_writer
                .write_record([(*x as f64 / 1000.0).to_string(), (*y as f64 / 1000.0).to_string(), n.to_string()])
                .map_err(|e| OutputError::Csv("contact_dist_per_coord.csv", e))?;
        }
        csv_writer.flush().map_err(|e| OutputError::NotWritable(coord_path.clone(), e))?;
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, OutputError> {
    File::create(path).map_err(|e| OutputError::NotWritable(path.to_path_buf(), e))
}

/// Write every output file under `dir` (§6), computing and returning the
/// summary statistics. `map.svg`/`heatmap.svg` rendering is out of scope.
pub fn write_all(
    dir: &Path,
    manifest: &Manifest,
    agents: &[Agent],
    events: &ContactEvents,
    floor_count: usize,
    daylength: u32,
) -> Result<Statistics, OutputError> {
    std::fs::create_dir_all(dir).map_err(|e| OutputError::NotWritable(dir.to_path_buf(), e))?;

    write_manifest(dir, manifest)?;
    write_trajectory(dir, agents, daylength)?;
    write_pair_contacts(dir, events)?;
    write_raw_contact_data(dir, events)?;
    write_contact_dist_per_agent(dir, agents)?;
    write_per_floor(dir, floor_count, events)?;

    let statistics = compute_statistics(&manifest.simulation_name, agents, events);
    write_statistics(dir, &statistics)?;
    Ok(statistics)
}
