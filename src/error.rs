/// Malformed or inconsistent run configuration (§7). Fatal before the
/// simulation begins.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("invalid run config JSON: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid field: {0}")]
    InvalidField(&'static str),
    #[error("unknown facility: {0}")]
    UnknownFacility(String),
}

/// Every error kind a full pipeline run can fail with (§7). Each variant
/// maps to one component's own error type via `#[from]`.
#[derive(thiserror::Error, Debug)]
pub enum CitamError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Ingest(#[from] citam_floorplan::IngestError),
    #[error(transparent)]
    Routing(#[from] citam_nav::RoutingError),
    #[error(transparent)]
    PersistRoutes(#[from] citam_nav::persist::PersistError),
    #[error(transparent)]
    PersistFloorplan(#[from] citam_floorplan::persist::PersistError),
    #[error("schedule build failed for every retry: {0}")]
    ScheduleBuild(#[from] citam_schedule::ScheduleBuildError),
    #[error(transparent)]
    Output(#[from] citam_sim::OutputError),
}
