use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("traffic snapshot parse error: {0}")]
    Parse(String),

    /// A row that cannot be used even after clamping.
    #[error("invalid traffic row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
