use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Stored bytes could not be decoded into the expected record.
    #[error("corrupt cache entry {key:?}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
