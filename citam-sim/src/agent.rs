use citam_floorplan::{Floorplan, SpaceId};
use citam_geom::Point;
use citam_nav::FloorId;
use citam_schedule::{AgentId, Schedule};

/// Where an agent sits in its day within the current step (§4.8).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AgentState {
    /// `t < start_time` or `t >= exit_time`.
    Offsite,
    /// Current coordinate differs from the previous step's.
    Transit,
    /// Current coordinate is unchanged from the previous step.
    Stationary,
}

/// A simulated person: identity, a precomputed schedule, and the mutable
/// per-step state the simulation loop advances.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub schedule: Schedule,
    pub itinerary_index: usize,
    pub current_position: Point,
    pub current_floor: FloorId,
    pub current_location: Option<SpaceId>,
    pub cumulative_contact_duration: u32,
    state: AgentState,
}

impl Agent {
    /// Build an agent at its schedule's `start_time`, already positioned at
    /// the itinerary's first coordinate.
    pub fn new(id: AgentId, schedule: Schedule) -> Self {
        let (position, floor) = schedule
            .itinerary
            .first()
            .map(|rp| (rp.point, rp.floor))
            .unwrap_or((Point::new(0.0, 0.0), 0));
        Agent {
            id,
            schedule,
            itinerary_index: 0,
            current_position: position,
            current_floor: floor,
            current_location: None,
            cumulative_contact_duration: 0,
            state: AgentState::Offsite,
        }
    }

    pub fn is_active(&self, t: u32) -> bool {
        t >= self.schedule.start_time && t < self.schedule.exit_time
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Advance to timestep `t`: move the itinerary index, update position
    /// and floor, and re-derive `current_location` by point-in-polygon
    /// lookup against `floorplans`. No-op (state becomes `Offsite`) outside
    /// `[start_time, exit_time)`.
    pub fn advance(&mut self, t: u32, floorplans: &[Floorplan]) {
        if !self.is_active(t) {
            self.state = AgentState::Offsite;
            self.current_location = None;
            return;
        }

        let index = (t - self.schedule.start_time) as usize;
        let previous_position = self.current_position;
        let previous_floor = self.current_floor;

        self.itinerary_index = index;
        if let Some(rp) = self.schedule.itinerary.get(index) {
            self.current_position = rp.point;
            self.current_floor = rp.floor;
        }

        self.state = if index > 0
            && self.current_position == previous_position
            && self.current_floor == previous_floor
        {
            AgentState::Stationary
        } else {
            AgentState::Transit
        };

        self.current_location = locate(&floorplans[self.current_floor as usize], self.current_position);
    }
}

/// Find the space whose boundary contains `point`, or `None` if it falls
/// outside every space (e.g. the agent is genuinely off the facility's
/// footprint).
pub fn locate(floorplan: &Floorplan, point: Point) -> Option<SpaceId> {
    floorplan
        .spaces()
        .iter()
        .find(|s| s.boundary.contains_point(point))
        .map(|s| s.id)
}
