//! `ServiceError` — the error kinds from spec §7, with their HTTP status
//! mapping.

use thiserror::Error;

use gr_route::RouteError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Only one of {{Circle, Polygon, Arn}} may be provided per Area.")]
    InvalidArea,

    #[error("Unable to fetch geofence ({0})")]
    GeofenceUnavailable(String),

    #[error("No route found.")]
    NoRoute,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error kind (spec §7).
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidArea => 400,
            ServiceError::GeofenceUnavailable(_) => 500,
            ServiceError::NoRoute => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    /// The `Error` message surfaced in the response body (spec §6).
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<RouteError> for ServiceError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::GeofenceUnavailable(id) => ServiceError::GeofenceUnavailable(id),
            RouteError::NoRoute => ServiceError::NoRoute,
            RouteError::NodeNotFound(id) => ServiceError::Internal(format!("node {id} not found")),
            RouteError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
