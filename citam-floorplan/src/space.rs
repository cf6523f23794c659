use citam_geom::{Polygon, Segment};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::{DoorId, SpaceId};

/// The role a space plays in the facility. Drives scheduling eligibility
/// (offices host work, meeting rooms host meetings, ...) and contact
/// validation (hallways are the only spaces where agents in two different
/// spaces can still register a contact, via the hallway graph).
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpaceFunction {
    Office,
    Meeting,
    Cafeteria,
    Restroom,
    /// Circulation space: hallways and open walkways.
    Aisle,
    Lab,
    Stairs,
    Entrance,
    Other,
}

impl SpaceFunction {
    pub fn is_hallway(self) -> bool {
        matches!(self, SpaceFunction::Aisle)
    }
}

/// A polygonal region of a floor: an office, a hallway segment, a meeting
/// room, and so on.
///
/// Invariant: `boundary` has at least 3 non-collinear vertices (enforced at
/// ingest by [`Polygon::is_valid`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub unique_name: String,
    pub space_function: SpaceFunction,
    pub building: String,
    pub capacity: u32,
    pub boundary: Polygon,
    /// Subset of the boundary that is wall, i.e. not covered by a door.
    pub walls: Vec<Segment>,
    pub doors: Vec<DoorId>,
}

impl Space {
    pub fn is_hallway(&self) -> bool {
        self.space_function.is_hallway()
    }

    pub fn center(&self) -> citam_geom::Point {
        self.boundary.centroid()
    }
}
