//! Error types for rr-engine.

use rr_cache::CacheError;
use rr_core::NetworkKind;
use rr_export::ExportError;
use rr_network::NetworkError;
use rr_search::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    /// The location is unknown or has no node on the network.
    #[error("location {name:?} is not bound to the {kind} network")]
    UnboundLocation {
        name: String,
        kind: NetworkKind,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
