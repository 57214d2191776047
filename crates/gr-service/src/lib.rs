//! `gr-service` — the external-interface layer (spec §6): request/response
//! envelopes, the HTTP-backed Geofence Catalog, prepared-graph persistence,
//! and env-driven startup configuration.
//!
//! | Module           | Contents                                    |
//! |-------------------|---------------------------------------------|
//! | [`envelope`]      | `parse_request`, `build_response`           |
//! | [`handler`]       | `ServiceState::handle_event`                |
//! | [`catalog_http`]  | `HttpGeofenceCatalog`                       |
//! | [`graph_io`]      | `save_graph`, `load_graph`                  |
//! | [`config`]        | `ServiceConfig::from_env`                   |
//! | [`error`]         | `ServiceError`, `ServiceResult`             |

pub mod catalog_http;
pub mod config;
pub mod envelope;
pub mod error;
pub mod graph_io;
pub mod handler;

pub use catalog_http::{AnyCatalog, HttpGeofenceCatalog, NullGeofenceCatalog};
pub use config::ServiceConfig;
pub use envelope::{build_response, parse_request};
pub use error::{ServiceError, ServiceResult};
pub use graph_io::{load_graph, save_graph};
pub use handler::ServiceState;
