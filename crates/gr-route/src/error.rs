//! `gr-route`-local error type, including the status-mapped kinds from
//! spec §7.

use thiserror::Error;

use gr_core::NodeId;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Unable to fetch geofence ({0})")]
    GeofenceUnavailable(String),

    #[error("No route found.")]
    NoRoute,

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RouteResult<T> = Result<T, RouteError>;
