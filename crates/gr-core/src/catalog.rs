//! `GeofenceCatalog` — the collaborator boundary for resolving
//! geofence-reference exclusion areas (spec §1 "out of scope", §6
//! "Geofence Catalog").
//!
//! Lives here rather than in `gr-route` or `gr-service` so both can share
//! it without a dependency cycle: `gr-route::orchestrate` calls it,
//! `gr-service` implements it over HTTP.

use std::collections::HashMap;

use crate::arn::Arn;
use crate::geometry::{Point, Polygon};

/// A resolved geofence catalog entry: a circle or polygon keep-out area,
/// in WGS84 (spec §6).
#[derive(Debug, Clone)]
pub enum CatalogEntry {
    Circle { center: Point, radius_meters: f64 },
    Polygon(Polygon),
}

/// Fetches geofence geometries for `Arn` references. Must honor its own
/// internal timeout and report failure as an `Err` string; the caller maps
/// failures to `GeofenceUnavailable` (spec §7).
///
/// Grounded on `lambda_handler.py::prefetch_geofences`'s batched,
/// region/resource-grouped pre-fetch (spec §C "Geofence pre-fetch
/// batching").
pub trait GeofenceCatalog: Send + Sync {
    /// Fetch every entry named by `arns`, keyed by
    /// `<arn-without-entry>#<entry-id>` (spec §6's `<prefix>#<entry-id>`).
    fn prefetch(&self, arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String>;
}
