//! Path-search error type.

use thiserror::Error;

use rr_core::{NodeId, SourceNodeId};

#[derive(Debug, Error)]
pub enum SearchError {
    /// Both endpoints exist but lie in different components.
    #[error("no path from node {from} to node {to}")]
    NoPath { from: SourceNodeId, to: SourceNodeId },

    #[error("{0} not found in network")]
    NodeNotFound(NodeId),
}

pub type SearchResult<T> = Result<T, SearchError>;
