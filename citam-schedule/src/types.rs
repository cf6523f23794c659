use citam_floorplan::{DoorId, SpaceId};
use citam_nav::{FloorId, RoutePoint};
use citam_util::RangeDistribution;
use serde::{Deserialize, Serialize};

use crate::AgentId;

/// Why an agent is at a given location for a stretch of the day.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Purpose {
    OfficeWork,
    Meeting,
    RestroomVisit,
    CafeteriaVisit,
    Transit,
}

impl Purpose {
    /// Breaks may not repeat back-to-back (§4.7): no agent visits the
    /// restroom twice in a row with nothing in between.
    pub fn is_repeatable(self) -> bool {
        !matches!(self, Purpose::RestroomVisit | Purpose::CafeteriaVisit)
    }
}

/// One entry of an agent's schedule: a purpose, a target space, and how
/// many timesteps it lasts.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub purpose: Purpose,
    pub location: SpaceId,
    pub floor: FloorId,
    pub duration: u32,
}

/// Allowed duration range for a purpose, drawn from the configured
/// `[min, max]` grid stepped by `increment` (§4.7).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct PurposeRule {
    pub purpose: Purpose,
    pub min_duration: u32,
    pub max_duration: u32,
    pub increment: u32,
}

impl PurposeRule {
    pub fn duration_dist(&self) -> RangeDistribution {
        RangeDistribution::new(self.min_duration as i32, self.max_duration as i32)
            .with_step(self.increment.max(1) as i32)
    }
}

/// Parameters governing schedule construction for every agent (§4.7).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleBuildParams {
    pub daylength: u32,
    pub buffer: u32,
    pub scale: f64,
    pub walking_speed_m_per_step: f64,
    /// Window, in timesteps, within which an upcoming meeting preempts a
    /// freely-chosen purpose.
    pub meeting_lookahead: u32,
    pub possible_purposes: Vec<PurposeRule>,
}

impl ScheduleBuildParams {
    /// Drawing units traversed per timestep.
    pub fn pace(&self) -> f64 {
        self.scale * self.walking_speed_m_per_step
    }
}

/// An agent's full day: entrance/exit doors, office, the purpose-tagged
/// itinerary items, and the precomputed per-timestep position trace.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub start_time: u32,
    pub exit_time: u32,
    pub entrance_floor: FloorId,
    pub entrance_door: Option<DoorId>,
    pub exit_floor: FloorId,
    pub exit_door: Option<DoorId>,
    pub office: SpaceId,
    pub office_floor: FloorId,
    pub items: Vec<ScheduleItem>,
    pub itinerary: Vec<RoutePoint>,
}

impl Schedule {
    /// Position at timestep `t`, or `None` if the agent isn't active
    /// (before `start_time` or at/after `exit_time`).
    pub fn position_at(&self, t: u32) -> Option<RoutePoint> {
        if t < self.start_time || t >= self.exit_time {
            return None;
        }
        self.itinerary.get((t - self.start_time) as usize).copied()
    }
}

/// A scheduled meeting: a room, a time window, and its attendees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meeting {
    pub location: SpaceId,
    pub floor: FloorId,
    pub start_time: u32,
    pub end_time: u32,
    pub attendees: Vec<AgentId>,
}

impl Meeting {
    pub fn overlaps(&self, other: &Meeting) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Parameters governing [`crate::meeting::generate_meetings`] (§4.6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeetingPolicyParams {
    pub min_meeting_duration: u32,
    pub max_meeting_length: u32,
    pub meeting_duration_increment: u32,
    pub avg_meetings_per_room: u32,
    pub percent_meeting_rooms_used: f64,
    pub avg_meetings_per_person: u32,
    pub min_attendees_per_meeting: u32,
    pub min_buffer_between_meetings: u32,
    pub max_buffer_between_meetings: u32,
}
