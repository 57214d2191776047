//! Framework error type shared as a common base by every `gr-*` crate.
//!
//! Sub-crates define their own error enums for their local failure modes and
//! convert into or wrap `GrError` via `From` impls, the same pattern
//! `dt-core::DtError` establishes for the teacher workspace.

use thiserror::Error;

use crate::ids::NodeId;

#[derive(Debug, Error)]
pub enum GrError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GrResult<T> = Result<T, GrError>;
