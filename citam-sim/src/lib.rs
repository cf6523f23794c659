mod agent;
mod contact;
mod error;
mod output;
mod simulation;

pub use agent::{locate, Agent, AgentState};
pub use contact::{ContactEvent, ContactEvents};
pub use error::OutputError;
pub use output::{
    compute_statistics, write_all, write_contact_dist_per_agent, write_manifest,
    write_pair_contacts, write_per_floor, write_raw_contact_data, write_statistics,
    write_trajectory, Manifest, Statistic, Statistics,
};
pub use simulation::{Simulation, SimulationConfig};
