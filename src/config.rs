use std::path::PathBuf;

use citam_nav::TrafficPolicyEntry;
use citam_schedule::MeetingPolicyParams;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// One named building entrance, as listed in the run config (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntranceSpec {
    pub name: String,
    pub floor: u32,
}

/// One work shift: a fraction of the workforce that starts its day around
/// `start_time` (§6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShiftSpec {
    pub name: String,
    pub start_time: u32,
    pub percent_workforce: f64,
}

/// How many agents to simulate: either a literal count or a fraction of
/// total office capacity, resolved against the built [`citam_facility::Facility`]
/// once ingest has happened (§6: "`n_agents` OR `occupancy_rate`").
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Occupancy {
    AgentCount { n_agents: u32 },
    OccupancyRate { occupancy_rate: f64 },
}

/// The run's top-level input file (§6). Floorplan geometry itself is
/// provided separately, already ingested into [`citam_floorplan::Floorplan`]s
/// by the external SVG/CSV parser — out of scope here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub facility_name: String,
    pub floors: Vec<String>,
    pub entrances: Vec<EntranceSpec>,
    #[serde(flatten)]
    pub occupancy: Occupancy,
    pub daylength: u32,
    pub buffer: u32,
    pub timestep: f64,
    pub contact_distance: f64,
    pub shifts: Vec<ShiftSpec>,
    pub scheduling_policy: Option<citam_schedule::ScheduleBuildParams>,
    pub meetings_policy_params: Option<MeetingPolicyParams>,
    pub traffic_policy: Option<Vec<TrafficPolicyEntry>>,
    pub output_directory: PathBuf,
    pub upload_location: Option<String>,
}

impl RunConfig {
    pub fn from_json(text: &str) -> Result<Self, InputError> {
        let config: RunConfig = serde_json::from_str(text).map_err(InputError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), InputError> {
        if self.floors.is_empty() {
            return Err(InputError::MissingField("floors"));
        }
        if self.shifts.is_empty() {
            return Err(InputError::MissingField("shifts"));
        }
        match self.occupancy {
            Occupancy::AgentCount { n_agents: 0 } => {
                return Err(InputError::InvalidField("n_agents must be positive"))
            }
            Occupancy::OccupancyRate { occupancy_rate: rate } if !(0.0 < rate && rate <= 1.0) => {
                return Err(InputError::InvalidField("occupancy_rate must be in (0, 1]"))
            }
            _ => {}
        }
        let total: f64 = self.shifts.iter().map(|s| s.percent_workforce).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(InputError::InvalidField("shifts' percent_workforce must sum to 1.0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_WITH_N_AGENTS: &str = r#"{
        "facility_name": "tower",
        "floors": ["1"],
        "entrances": [{"name": "main", "floor": 0}],
        "n_agents": 2,
        "daylength": 40,
        "buffer": 5,
        "timestep": 1.0,
        "contact_distance": 6.0,
        "shifts": [{"name": "day", "start_time": 0, "percent_workforce": 1.0}],
        "scheduling_policy": null,
        "meetings_policy_params": null,
        "traffic_policy": null,
        "output_directory": "/tmp/out",
        "upload_location": null
    }"#;

    #[test]
    fn from_json_parses_n_agents_occupancy() {
        let config = RunConfig::from_json(JSON_WITH_N_AGENTS).expect("literal n_agents JSON should parse");
        assert!(matches!(config.occupancy, Occupancy::AgentCount { n_agents: 2 }));
    }

    #[test]
    fn from_json_parses_occupancy_rate() {
        let json = JSON_WITH_N_AGENTS.replace(r#""n_agents": 2,"#, r#""occupancy_rate": 0.5,"#);
        let config = RunConfig::from_json(&json).expect("literal occupancy_rate JSON should parse");
        assert!(matches!(config.occupancy, Occupancy::OccupancyRate { occupancy_rate } if occupancy_rate == 0.5));
    }

    #[test]
    fn from_json_rejects_empty_floors() {
        let json = JSON_WITH_N_AGENTS.replace(r#""floors": ["1"],"#, r#""floors": [],"#);
        let err = RunConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, InputError::MissingField("floors")));
    }
}
