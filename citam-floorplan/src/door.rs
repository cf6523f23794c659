use citam_geom::Segment;
use serde::{Deserialize, Serialize};

use crate::{DoorId, SpaceId};

/// A door segment connecting one or two spaces.
///
/// Interior doors attach to two spaces; doors on the facility perimeter
/// (entrances) attach to one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub segment: Segment,
    pub spaces: (Option<SpaceId>, Option<SpaceId>),
    pub emergency_only: bool,
    pub in_service: bool,
    pub special_access: bool,
}

impl Door {
    /// The spaces this door connects, as a small iterator (one or two
    /// elements).
    pub fn connected_spaces(&self) -> impl Iterator<Item = SpaceId> {
        [self.spaces.0, self.spaces.1].into_iter().flatten()
    }

    pub fn is_usable(&self) -> bool {
        self.in_service && !self.emergency_only
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Wall {
    pub id: crate::WallId,
    pub segment: Segment,
    /// A wall added after the original floorplan was built (e.g. by a
    /// facility update). The navigation builder must re-split any edge that
    /// crosses one of these so agents can't walk through it.
    pub special: bool,
}

/// A pair of parallel walls facing each other across a hallway, seeding the
/// navigation grid for that hallway.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Aisle {
    pub w1: crate::WallId,
    pub w2: crate::WallId,
    /// The hallway space this aisle was derived from.
    pub space: crate::SpaceId,
}
