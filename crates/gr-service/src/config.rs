//! Startup configuration, read once from the environment (spec §6
//! "Prepared graph", §C "Configuration"), in the same "read env once, build
//! an immutable value, pass it down" shape as `dt-core::SimConfig` —
//! except sourced from environment variables rather than a config file,
//! since this crate has no CLI front-end of its own.

use std::path::PathBuf;

const DEFAULT_GRAPH_PATH: &str = "./data/graph.gml";
const DEFAULT_GEOFENCE_TIMEOUT_MS: u64 = 5_000;

/// Process-wide configuration for the routing service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Path to the prepared graph file, read once at startup (`GRAPH`).
    pub graph_path: PathBuf,
    /// Listener port for the dev-mode HTTP front-end, if any (`PORT`).
    /// The real transport is out of scope (spec §1); this only backs the
    /// local dev-convenience listener in `gr-service`'s binary.
    pub port: Option<u16>,
    /// Timeout for the Geofence Catalog fetch, honored by
    /// [`crate::catalog_http::HttpGeofenceCatalog`] (spec §5
    /// "Cancellation / timeouts").
    pub geofence_timeout_ms: u64,
    /// Base URL for the Geofence Catalog collaborator (`GEOFENCE_CATALOG_URL`).
    /// `None` disables geofence resolution; requests with an `Arn` area then
    /// fail `GeofenceUnavailable`.
    pub geofence_catalog_url: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let graph_path = std::env::var("GRAPH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_GRAPH_PATH));

        let port = std::env::var("PORT").ok().and_then(|v| v.parse().ok());

        let geofence_timeout_ms = std::env::var("GEOFENCE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_GEOFENCE_TIMEOUT_MS);

        let geofence_catalog_url = std::env::var("GEOFENCE_CATALOG_URL").ok();

        Self { graph_path, port, geofence_timeout_ms, geofence_catalog_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_used_when_unset() {
        let config = ServiceConfig {
            graph_path: PathBuf::from(DEFAULT_GRAPH_PATH),
            port: None,
            geofence_timeout_ms: DEFAULT_GEOFENCE_TIMEOUT_MS,
            geofence_catalog_url: None,
        };
        assert_eq!(config.graph_path, PathBuf::from("./data/graph.gml"));
        assert_eq!(config.geofence_timeout_ms, 5_000);
    }
}
