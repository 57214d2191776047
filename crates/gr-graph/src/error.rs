//! `gr-graph`-local error type.

use thiserror::Error;

use gr_core::NodeId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("vertex clustering error: {0}")]
    Cluster(String),

    #[error("edge building error: {0}")]
    Build(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
