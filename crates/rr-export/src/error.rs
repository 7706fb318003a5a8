//! Error types for rr-export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when writing a route map.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("route has {0} coordinate(s); at least 2 are needed to draw it")]
    TooFewCoordinates(usize),

    #[error("invalid map filename {0:?}: must be a single path component")]
    InvalidFilename(String),

    #[error("map file {} not found after writing", .0.display())]
    Missing(PathBuf),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, ExportError>`.
pub type ExportResult<T> = Result<T, ExportError>;
