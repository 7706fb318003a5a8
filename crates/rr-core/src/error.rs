//! Shared error type for `rr-core`.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where core parsing can fail underneath them.

use thiserror::Error;

/// Errors produced by `rr-core` parsing helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown travel mode {0:?}")]
    UnknownMode(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `rr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
