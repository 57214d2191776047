//! HTTP-backed `GeofenceCatalog`, grounded on
//! `lambda_handler.py::prefetch_geofences`'s region/resource-grouped batch
//! fetch, translated from the AWS Location Service SDK call to a generic
//! HTTP GET against a configurable base URL (the cloud vendor's own SDK is
//! out of scope per spec §1 — any endpoint returning the same JSON shape
//! works).
//!
//! Uses `reqwest::blocking`, the same client shape as
//! `valhalla-client::blocking::Valhalla`, but without a `tokio` runtime
//! wrapper since `reqwest`'s own blocking client already manages one
//! internally.

use std::collections::HashMap;
use std::time::Duration;

use gr_core::{Arn, CatalogEntry, GeofenceCatalog, Point, Polygon};
use serde::Deserialize;

/// Fetches geofence collections over HTTP. `base_url` should point at a
/// service exposing `GET {base_url}/{region}/{resource}` returning a
/// [`CollectionResponse`].
pub struct HttpGeofenceCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpGeofenceCatalog {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("reqwest client builds with a fixed timeout");
        Self { base_url: base_url.into(), client }
    }
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    entries: Vec<CollectionEntry>,
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    geofence_id: String,
    geometry: EntryGeometry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EntryGeometry {
    Circle { center: [f64; 2], radius: f64 },
    Polygon { rings: Vec<Vec<[f64; 2]>> },
}

impl GeofenceCatalog for HttpGeofenceCatalog {
    fn prefetch(&self, arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
        let mut geofences = HashMap::new();

        // Group by (region, resource) so each collection is fetched once,
        // regardless of how many distinct entry ids within it were asked for.
        let mut grouped: HashMap<(String, String), Arn> = HashMap::new();
        for arn in arns {
            grouped
                .entry((arn.region.clone(), arn.resource.clone()))
                .or_insert_with(|| arn.clone());
        }

        for ((region, resource), arn) in grouped {
            let url = format!("{}/{}/{}", self.base_url, region, resource);
            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|e| format!("{region} / {resource}: {e}"))?;

            if !response.status().is_success() {
                return Err(format!("{region} / {resource}: HTTP {}", response.status()));
            }

            let body: CollectionResponse =
                response.json().map_err(|e| format!("{region} / {resource}: {e}"))?;

            let prefix = arn.without_entry();
            for entry in body.entries {
                let key = format!("{prefix}#{}", entry.geofence_id);
                let resolved = match entry.geometry {
                    EntryGeometry::Circle { center, radius } => CatalogEntry::Circle {
                        center: Point::new(center[0], center[1]),
                        radius_meters: radius,
                    },
                    EntryGeometry::Polygon { rings } => {
                        let mut rings = rings.into_iter();
                        let exterior = rings
                            .next()
                            .ok_or_else(|| format!("{prefix}#{}: polygon has no exterior ring", entry.geofence_id))?;
                        let interiors: Vec<_> = rings
                            .map(|ring| geo_types::LineString::from(ring.into_iter().map(|c| (c[0], c[1])).collect::<Vec<_>>()))
                            .collect();
                        CatalogEntry::Polygon(Polygon::new(
                            geo_types::LineString::from(exterior.into_iter().map(|c| (c[0], c[1])).collect::<Vec<_>>()),
                            interiors,
                        ))
                    }
                };
                geofences.insert(key, resolved);
            }
        }

        Ok(geofences)
    }
}

/// Stand-in used when no `GEOFENCE_CATALOG_URL` is configured. Any request
/// that actually needs a geofence reference fails `GeofenceUnavailable`;
/// requests with no `Arn` areas are unaffected.
pub struct NullGeofenceCatalog;

impl GeofenceCatalog for NullGeofenceCatalog {
    fn prefetch(&self, arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
        if arns.is_empty() {
            Ok(HashMap::new())
        } else {
            Err("no geofence catalog configured (GEOFENCE_CATALOG_URL unset)".to_string())
        }
    }
}

/// Picks between the HTTP-backed catalog and the no-op stand-in at startup,
/// so `gr-service`'s binary entry point can hand `ServiceState` one concrete
/// type regardless of whether `GEOFENCE_CATALOG_URL` was set.
pub enum AnyCatalog {
    Http(HttpGeofenceCatalog),
    Null(NullGeofenceCatalog),
}

impl GeofenceCatalog for AnyCatalog {
    fn prefetch(&self, arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
        match self {
            AnyCatalog::Http(c) => c.prefetch(arns),
            AnyCatalog::Null(c) => c.prefetch(arns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_fixed_timeout() {
        let catalog = HttpGeofenceCatalog::new("http://localhost:9", 1_000);
        assert_eq!(catalog.base_url, "http://localhost:9");
    }

    #[test]
    fn unreachable_host_is_reported_as_an_error() {
        let catalog = HttpGeofenceCatalog::new("http://127.0.0.1:1", 200);
        let arn = Arn::parse("arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet#entry-1").unwrap();
        let result = catalog.prefetch(&[arn]);
        assert!(result.is_err());
    }
}
