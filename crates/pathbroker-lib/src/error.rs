use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Convenient result alias for the path broker library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only the orchestrator, configuration loading and gazetteer loading can fail.
/// Parsing and link synthesis always produce a value.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a positional argument for the external computation is blank.
    #[error("the {field} argument must not be empty")]
    EmptyArgument { field: &'static str },

    /// Raised when the external executable could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Raised when the external computation ran past its deadline and was killed.
    #[error("computation did not finish within {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// Raised when the admission gate has been shut down.
    #[error("admission gate closed; no further computations are accepted")]
    AdmissionClosed,

    /// Raised when a configuration value cannot be used.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },

    /// Raised when a gazetteer entry lies outside valid latitude/longitude ranges.
    #[error("coordinate for {name} out of range: {lat},{lon}")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },

    /// Raised when a gazetteer file could not be read.
    #[error("failed to read gazetteer from {path}: {source}")]
    GazetteerRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
