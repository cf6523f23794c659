use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Serialize, Deserialize,
)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for AgentId {
    fn from(i: usize) -> Self {
        AgentId(i as u32)
    }
}
