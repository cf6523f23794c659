use citam_floorplan::SpaceId;
use citam_util::HashSet;
use serde::{Deserialize, Serialize};

/// Adjacency between hallway spaces: nodes are [`SpaceId`]s, edges mark
/// direct walkable adjacency (their aisle center-lines share a navigation
/// graph node). Used by the contact calculator to decide whether agents in
/// two different hallway spaces can register a contact (§4.8).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HallwayGraph {
    edges: HashSet<(SpaceId, SpaceId)>,
}

fn canonical(a: SpaceId, b: SpaceId) -> (SpaceId, SpaceId) {
    if a.index() <= b.index() {
        (a, b)
    } else {
        (b, a)
    }
}

impl HallwayGraph {
    pub fn new() -> Self {
        HallwayGraph::default()
    }

    pub fn add_edge(&mut self, a: SpaceId, b: SpaceId) {
        if a != b {
            self.edges.insert(canonical(a, b));
        }
    }

    pub fn has_edge(&self, a: SpaceId, b: SpaceId) -> bool {
        self.edges.contains(&canonical(a, b))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
