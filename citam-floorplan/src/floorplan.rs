use citam_geom::BoundingBox;
use citam_util::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Aisle, Door, DoorId, Space, SpaceId, Wall, WallId};

/// A single floor's geometry: spaces, doors and walls, plus the aisle pairs
/// derived from them. Immutable once ingested — nothing in the simulation
/// pipeline mutates a `Floorplan` after [`crate::ingest`] hands it back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Floorplan {
    spaces: Vec<Space>,
    doors: Vec<Door>,
    walls: Vec<Wall>,
    aisles: Vec<Aisle>,
    /// Unique-name to id lookup, built once at ingest.
    name_index: IndexMap<String, SpaceId>,
    pub width: f64,
    pub height: f64,
    /// Real-world units per drawing unit.
    pub scale: f64,
}

impl Floorplan {
    pub fn new(
        spaces: Vec<Space>,
        doors: Vec<Door>,
        walls: Vec<Wall>,
        aisles: Vec<Aisle>,
        width: f64,
        height: f64,
        scale: f64,
    ) -> Self {
        let name_index = spaces
            .iter()
            .map(|s| (s.unique_name.clone(), s.id))
            .collect();
        Floorplan {
            spaces,
            doors,
            walls,
            aisles,
            name_index,
            width,
            height,
            scale,
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn aisles(&self) -> &[Aisle] {
        &self.aisles
    }

    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id.index()]
    }

    pub fn door(&self, id: DoorId) -> &Door {
        &self.doors[id.index()]
    }

    pub fn wall(&self, id: WallId) -> &Wall {
        &self.walls[id.index()]
    }

    /// Append a wall discovered after ingest (see
    /// [`crate::ingest::add_special_wall`]) and return its new id.
    pub fn push_wall(&mut self, wall: Wall) -> WallId {
        let id = wall.id;
        self.walls.push(wall);
        id
    }

    pub fn space_by_name(&self, name: &str) -> Option<&Space> {
        self.name_index.get(name).map(|&id| self.space(id))
    }

    /// Bounding box across every space on this floor.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.spaces
            .iter()
            .filter_map(|s| s.boundary.bounding_box())
            .reduce(|a, b| a.union(&b))
    }
}
