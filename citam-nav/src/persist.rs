use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::{HallwayGraph, NavGraph};

/// Errors from loading or saving the cached navigation artifacts under
/// `CITAM_CACHE_DIRECTORY` (§6).
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

/// Write the per-floor navigation graph to `routes.json`, byte-identically
/// for the same graph contents (§4.3: export/import is idempotent).
pub fn save_routes(graph: &NavGraph, path: &Path) -> Result<(), PersistError> {
    let file = File::create(path).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), graph).map_err(|source| PersistError::Encode {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_routes(path: &Path) -> Result<NavGraph, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut graph: NavGraph =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistError::Decode {
            path: path.display().to_string(),
            source,
        })?;
    graph.reindex();
    Ok(graph)
}

pub fn save_hallway_graph(graph: &HallwayGraph, path: &Path) -> Result<(), PersistError> {
    let file = File::create(path).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), graph).map_err(|source| PersistError::Encode {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_hallway_graph(path: &Path) -> Result<HallwayGraph, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistError::Decode {
        path: path.display().to_string(),
        source,
    })
}
