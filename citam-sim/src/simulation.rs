use citam_facility::Facility;
use citam_nav::HallwayGraph;
use rayon::prelude::*;

use crate::agent::{Agent, AgentState};
use crate::contact::ContactEvents;

/// Parameters governing the proximity check in [`Simulation::step`] (§4.8).
#[derive(Copy, Clone, Debug)]
pub struct SimulationConfig {
    pub contact_distance: f64,
    pub daylength: u32,
}

/// The step-driven simulation loop and its accumulated contact history.
pub struct Simulation<'a> {
    facility: &'a Facility,
    hallway_graphs: Vec<&'a HallwayGraph>,
    config: SimulationConfig,
    agents: Vec<Agent>,
    contact_events: ContactEvents,
    step: u32,
}

impl<'a> Simulation<'a> {
    pub fn new(
        facility: &'a Facility,
        hallway_graphs: Vec<&'a HallwayGraph>,
        config: SimulationConfig,
    ) -> Self {
        Simulation {
            facility,
            hallway_graphs,
            config,
            agents: Vec::new(),
            contact_events: ContactEvents::new(),
            step: 0,
        }
    }

    /// Populate the simulation with agents built from their schedules
    /// (§9: `initialize(agents)`).
    pub fn initialize(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
        self.step = 0;
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn contact_events(&self) -> &ContactEvents {
        &self.contact_events
    }

    pub fn current_step(&self) -> u32 {
        self.step
    }

    /// Advance every agent one timestep, then compute and record contacts
    /// for that step (§4.8 step function, §9: `run(step, agents)`).
    pub fn step(&mut self) {
        let t = self.step;
        let floorplans = self.facility.floorplans();
        for agent in &mut self.agents {
            agent.advance(t, floorplans);
        }

        let active: Vec<usize> = (0..self.agents.len())
            .filter(|&i| self.agents[i].state() != AgentState::Offsite)
            .collect();

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (rank, &i) in active.iter().enumerate() {
            for &j in &active[rank + 1..] {
                pairs.push((i, j));
            }
        }

        let shard_count = rayon::current_num_threads().max(1);
        let chunk_size = pairs.len().div_ceil(shard_count).max(1);
        let shard = pairs
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut local = ContactEvents::new();
                for &(i, j) in chunk {
                    self.evaluate_pair(i, j, t, &mut local);
                }
                local
            })
            .reduce(ContactEvents::new, |mut acc, next| {
                acc.merge(next);
                acc
            });

        self.contact_events.merge(shard);
        self.step += 1;
    }

    fn evaluate_pair(&self, i: usize, j: usize, t: u32, out: &mut ContactEvents) {
        let a = &self.agents[i];
        let b = &self.agents[j];

        if a.current_floor != b.current_floor {
            return;
        }
        let distance = a.current_position.dist(&b.current_position);
        if distance >= self.config.contact_distance {
            return;
        }
        let (Some(loc_a), Some(loc_b)) = (a.current_location, b.current_location) else {
            return;
        };

        let accepted = if loc_a == loc_b {
            true
        } else {
            let floor = a.current_floor as usize;
            self.hallway_graphs
                .get(floor)
                .is_some_and(|graph| graph.has_edge(loc_a, loc_b))
        };
        if !accepted {
            return;
        }

        let midpoint = a.current_position.midpoint(&b.current_position);
        out.record(a.id, b.id, t, midpoint, a.current_floor);
    }

    /// Run every remaining step through `daylength`.
    pub fn run(&mut self) {
        while self.step < self.config.daylength {
            self.step();
        }
    }

    /// Apply per-agent contact-duration increments and return the final
    /// agents, consuming the simulation (§9: `finalize(work_dir)` writes
    /// the output files that consume this).
    pub fn finalize(mut self) -> (Vec<Agent>, ContactEvents) {
        let mut totals: citam_util::HashMap<citam_schedule::AgentId, u32> = citam_util::HashMap::default();
        for (_, events) in self.contact_events.pairs() {
            for event in events {
                *totals.entry(event.agent1).or_insert(0) += event.duration;
                *totals.entry(event.agent2).or_insert(0) += event.duration;
            }
        }
        for agent in &mut self.agents {
            agent.cumulative_contact_duration = totals.get(&agent.id).copied().unwrap_or(0);
        }
        (self.agents, self.contact_events)
    }
}
