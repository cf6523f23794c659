use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::Floorplan;

/// Errors from loading or saving a cached floorplan snapshot under an
/// explicit cache root (§6a: no `CITAM_CACHE_DIRECTORY` global read here —
/// the caller passes the path in).
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("reading {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("writing {path}: {source}")]
    Write { path: String, #[source] source: std::io::Error },
    #[error("encoding {path}: {source}")]
    Encode { path: String, #[source] source: serde_json::Error },
    #[error("decoding {path}: {source}")]
    Decode { path: String, #[source] source: serde_json::Error },
}

/// Write the floorplan snapshot (spaces, doors, walls, aisles, dimensions,
/// scale) to `path`, byte-identically for the same floorplan contents.
pub fn save_floorplan(floorplan: &Floorplan, path: &Path) -> Result<(), PersistError> {
    let file = File::create(path).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), floorplan).map_err(|source| PersistError::Encode {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_floorplan(path: &Path) -> Result<Floorplan, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistError::Decode {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use citam_geom::{Point, Polygon};

    use super::*;
    use crate::{ingest, DoorInput, SpaceFunction, SpaceInput};

    fn single_room() -> Floorplan {
        let office = SpaceInput {
            polygon: Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]),
            unique_name: "office".into(),
            building: "b1".into(),
            space_function: SpaceFunction::Office,
            capacity: 4,
        };
        ingest::ingest(vec![office], Vec::<DoorInput>::new(), 10.0, 10.0, 1.0, 1e-3).unwrap()
    }

    #[test]
    fn save_then_load_round_trips_byte_identically() {
        let floorplan = single_room();
        let dir = std::env::temp_dir().join("citam-floorplan-persist-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("floorplan.json");

        save_floorplan(&floorplan, &path).unwrap();
        let first_bytes = std::fs::read(&path).unwrap();

        let loaded = load_floorplan(&path).unwrap();
        assert_eq!(loaded.spaces().len(), floorplan.spaces().len());
        assert_eq!(loaded.width, floorplan.width);
        assert_eq!(loaded.scale, floorplan.scale);

        save_floorplan(&loaded, &path).unwrap();
        let second_bytes = std::fs::read(&path).unwrap();
        assert_eq!(first_bytes, second_bytes, "re-saving a loaded floorplan must be byte-identical");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_surfaces_a_decode_error_for_malformed_json() {
        let dir = std::env::temp_dir().join("citam-floorplan-persist-test-bad");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = load_floorplan(&path).unwrap_err();
        assert!(matches!(err, PersistError::Decode { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
