//! Graph-store error type.

use thiserror::Error;

use rr_core::NetworkKind;

/// Errors produced by `rr-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Neither the named-area nor the point-radius strategy produced data.
    #[error("failed to load {kind} graph: {reason}")]
    GraphLoad { kind: NetworkKind, reason: String },

    /// A single loader query failed or returned nothing.
    #[error("graph loader error: {0}")]
    Loader(String),

    /// A persisted network record is structurally inconsistent.
    #[error("invalid network record: {0}")]
    Record(String),

    #[error("location parse error: {0}")]
    Parse(String),

    /// Two distinct location names would share map filenames.
    #[error("location {name:?} has the same slug {slug:?} as {existing:?}")]
    NameClash { name: String, existing: String, slug: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
