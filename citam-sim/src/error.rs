use std::path::PathBuf;

/// Output-writing failure (§7). Fatal after the run completes; whatever
/// files were already written are left in place.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("output directory {0:?} is not writable: {1}")]
    NotWritable(PathBuf, #[source] std::io::Error),
    #[error("failed to serialize {0}: {1}")]
    Serialize(&'static str, #[source] serde_json::Error),
    #[error("failed to write csv record in {0}: {1}")]
    Csv(&'static str, #[source] csv::Error),
}
