use citam_geom::Point;
use citam_nav::FloorId;
use citam_schedule::AgentId;
use citam_util::HashMap;
use serde::{Deserialize, Serialize};

fn canonical(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

/// One contiguous stretch of contact between a pair of agents: extended
/// (duration++, position appended) while the pair stays in contact on
/// consecutive steps, otherwise a new event starts (§3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactEvent {
    pub agent1: AgentId,
    pub agent2: AgentId,
    pub start_step: u32,
    pub duration: u32,
    pub positions: Vec<Point>,
    pub floor: FloorId,
}

impl ContactEvent {
    pub fn pair_key(&self) -> String {
        format!("{}-{}", self.agent1.0, self.agent2.0)
    }
}

/// Accumulated contact history for a full run: per-pair event lists plus a
/// per-step, per-floor tally of contact midpoint coordinates.
#[derive(Clone, Debug, Default)]
pub struct ContactEvents {
    events: HashMap<(AgentId, AgentId), Vec<ContactEvent>>,
    contact_locations: HashMap<FloorId, HashMap<Point, u32>>,
}

impl ContactEvents {
    pub fn new() -> Self {
        ContactEvents::default()
    }

    /// Record one accepted contact pair at step `t`: extends the pair's
    /// last event if it ended on the previous step, otherwise opens a new
    /// one.
    pub fn record(&mut self, a: AgentId, b: AgentId, t: u32, midpoint: Point, floor: FloorId) {
        let (lo, hi) = canonical(a, b);
        let events = self.events.entry((lo, hi)).or_default();
        match events.last_mut() {
            Some(last) if last.start_step + last.duration == t => {
                last.duration += 1;
                last.positions.push(midpoint);
            }
            _ => events.push(ContactEvent {
                agent1: lo,
                agent2: hi,
                start_step: t,
                duration: 1,
                positions: vec![midpoint],
                floor,
            }),
        }
        *self
            .contact_locations
            .entry(floor)
            .or_default()
            .entry(midpoint)
            .or_insert(0) += 1;
    }

    /// Merge another batch of per-step records into this one, used to fold
    /// a worker's thread-local shard into the run's accumulator. Events for
    /// the same pair are merged by `start_step`/`duration` contiguity, same
    /// as [`ContactEvents::record`].
    pub fn merge(&mut self, other: ContactEvents) {
        let mut pairs: Vec<(AgentId, AgentId)> = other.events.keys().copied().collect();
        pairs.sort();
        for pair in pairs {
            for event in other.events[&pair].clone() {
                let events = self.events.entry(pair).or_default();
                match events.last_mut() {
                    Some(last) if last.start_step + last.duration == event.start_step => {
                        last.duration += event.duration;
                        last.positions.extend(event.positions);
                    }
                    _ => events.push(event),
                }
            }
        }
        for (floor, counts) in other.contact_locations {
            let dest = self.contact_locations.entry(floor).or_default();
            for (point, count) in counts {
                *dest.entry(point).or_insert(0) += count;
            }
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&(AgentId, AgentId), &Vec<ContactEvent>)> {
        self.events.iter()
    }

    pub fn contact_locations(&self, floor: FloorId) -> Option<&HashMap<Point, u32>> {
        self.contact_locations.get(&floor)
    }

    /// Total contact timesteps across every pair and event.
    pub fn total_contact_duration(&self) -> u64 {
        self.events
            .values()
            .flat_map(|events| events.iter())
            .map(|e| e.duration as u64)
            .sum()
    }

    pub fn event_count(&self) -> usize {
        self.events.values().map(|events| events.len()).sum()
    }
}
