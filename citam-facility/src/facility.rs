use citam_floorplan::{Floorplan, SpaceFunction, SpaceId};
use citam_nav::FloorId;
use rand::seq::SliceRandom;

/// Per-floor lookup vectors classifying spaces by [`SpaceFunction`] (§4.5).
#[derive(Clone, Debug, Default)]
pub struct FloorIndex {
    pub offices: Vec<SpaceId>,
    pub meeting_rooms: Vec<SpaceId>,
    pub cafes: Vec<SpaceId>,
    pub restrooms: Vec<SpaceId>,
    pub entrances: Vec<SpaceId>,
    pub stairs: Vec<SpaceId>,
}

impl FloorIndex {
    fn build(floorplan: &Floorplan) -> Self {
        let mut index = FloorIndex::default();
        for space in floorplan.spaces() {
            match space.space_function {
                SpaceFunction::Office => index.offices.push(space.id),
                SpaceFunction::Meeting => index.meeting_rooms.push(space.id),
                SpaceFunction::Cafeteria => index.cafes.push(space.id),
                SpaceFunction::Restroom => index.restrooms.push(space.id),
                SpaceFunction::Entrance => index.entrances.push(space.id),
                SpaceFunction::Stairs => index.stairs.push(space.id),
                SpaceFunction::Aisle | SpaceFunction::Lab | SpaceFunction::Other => {}
            }
        }
        index
    }
}

/// The facility: every floor's plan plus the derived space classification
/// and the mutable office-assignment pool the scheduler draws from.
pub struct Facility {
    floorplans: Vec<Floorplan>,
    index: Vec<FloorIndex>,
    office_pool: Vec<Vec<SpaceId>>,
}

impl Facility {
    /// Build the facility from its per-floor plans, shuffling each floor's
    /// office pool once with `rng` so unpreassigned draws are deterministic
    /// given a seed but not simply first-to-last.
    pub fn new(floorplans: Vec<Floorplan>, rng: &mut citam_util::SimRng) -> Self {
        let index: Vec<FloorIndex> = floorplans.iter().map(FloorIndex::build).collect();
        let mut office_pool: Vec<Vec<SpaceId>> = index.iter().map(|i| i.offices.clone()).collect();
        for pool in &mut office_pool {
            pool.shuffle(rng);
        }
        Facility {
            floorplans,
            index,
            office_pool,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.floorplans.len()
    }

    pub fn floorplan(&self, floor: FloorId) -> &Floorplan {
        &self.floorplans[floor as usize]
    }

    pub fn floorplans(&self) -> &[Floorplan] {
        &self.floorplans
    }

    pub fn index(&self, floor: FloorId) -> &FloorIndex {
        &self.index[floor as usize]
    }

    /// Draw an office from the given floor's mutable pool, removing it so
    /// it won't be handed out twice (§4.5).
    pub fn draw_office(&mut self, floor: FloorId) -> Option<SpaceId> {
        self.office_pool[floor as usize].pop()
    }

    /// Return a drawn office to the pool, e.g. after a schedule build
    /// failure forces a retry with a different office.
    pub fn return_office(&mut self, floor: FloorId, office: SpaceId) {
        self.office_pool[floor as usize].push(office);
    }

    pub fn remaining_offices(&self, floor: FloorId) -> usize {
        self.office_pool[floor as usize].len()
    }
}
