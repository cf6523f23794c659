//! Floorplan data model and ingestion: spaces, doors, walls and aisles for a
//! single floor, plus the ingester that assembles them from parsed polygons
//! and door polylines.

mod door;
mod floorplan;
mod ids;
pub mod ingest;
pub mod persist;
mod space;

pub use door::{Aisle, Door, Wall};
pub use floorplan::Floorplan;
pub use ids::{DoorId, SpaceId, WallId};
pub use ingest::{DoorInput, IngestError, SpaceInput};
pub use space::{Space, SpaceFunction};
