use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

/// Failures surfaced by the dashboard pipeline.
///
/// Everything except `OutlineFetchFailed` is fatal: the pipeline stops and no
/// partial dashboard is produced.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("source file not found at '{}': {source}", path.display())]
    SourceNotFound { path: PathBuf, source: io::Error },
    #[error("failed to read CSV file '{}': {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },
    #[error(
        "the CSV must have the columns: {}; missing: {}; found: {}",
        required.join(", "),
        missing.join(", "),
        found.join(", ")
    )]
    SchemaError {
        required: Vec<String>,
        missing: Vec<String>,
        found: Vec<String>,
    },
    #[error("could not load outline from '{url}': {reason}")]
    OutlineFetchFailed { url: String, reason: String },
    #[error("invalid configuration in '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DashboardError::OutlineFetchFailed { .. })
    }
}
