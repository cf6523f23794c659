use citam_geom::Point;
use citam_nav::FloorId;

use crate::AgentId;

/// Per-agent schedule build failure (§7). The caller retries once with a
/// different office; if that also fails, the run aborts.
#[derive(thiserror::Error, Debug)]
pub enum ScheduleBuildError {
    #[error("agent {agent}: no route from {from:?} (floor {from_floor}) to {to:?} (floor {to_floor})")]
    NoRoute {
        agent: AgentId,
        from: Point,
        from_floor: FloorId,
        to: Point,
        to_floor: FloorId,
    },
    #[error("agent {agent}: no entrance reachable for office on floor {office_floor}")]
    NoEntrance { agent: AgentId, office_floor: FloorId },
    #[error("agent {agent}: insufficient time before next meeting (needed {needed}, had {available})")]
    InsufficientTime {
        agent: AgentId,
        needed: u32,
        available: u32,
    },
}
