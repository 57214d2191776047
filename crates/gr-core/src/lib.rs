//! `gr-core` — shared ids, geometry aliases, the feature/property model, and
//! request/response types for the geospatial routing core.
//!
//! This crate is a dependency of every other `gr-*` crate. It intentionally
//! has no `gr-*` dependencies and minimal external ones (`geo-types`,
//! `serde_json`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                          |
//! |---------------|----------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeKey`, `EdgeIndex`                   |
//! | [`geometry`]  | `Point`, `LineString`, `Polygon`, … type aliases   |
//! | [`feature`]   | `Feature`, `PropertyMap`                           |
//! | [`arn`]       | `Arn` parsing for geofence references              |
//! | [`catalog`]   | `GeofenceCatalog`, `CatalogEntry`                  |
//! | [`request`]   | `ExclusionArea`, `RouteRequest`                    |
//! | [`error`]     | `GrError`, `GrResult`                              |

pub mod arn;
pub mod catalog;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod ids;
pub mod request;

pub use arn::{Arn, ArnParseError};
pub use catalog::{CatalogEntry, GeofenceCatalog};
pub use error::{GrError, GrResult};
pub use feature::{Feature, PropertyMap};
pub use geometry::{Geometry, GeometryCollection, LineString, MultiPolygon, Point, Polygon};
pub use ids::{EdgeIndex, EdgeKey, NodeId};
pub use request::{ExclusionArea, RouteRequest};
