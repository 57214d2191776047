//! `ExclusionArea` and `RouteRequest` (spec §3).

use crate::arn::Arn;
use crate::geometry::{Point, Polygon};

/// One keep-out region supplied with a routing request. Exactly one of the
/// three variants may be present per area (enforced by the caller that
/// parses the request envelope — see `gr-service`).
#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionArea {
    Circle { center: Point, radius_meters: f64 },
    Polygon(Polygon),
    /// An unresolved reference into an external geofence catalog (spec §6).
    /// Resolved to a `Circle` or `Polygon` before reaching the Specializer.
    GeofenceRef(Arn),
}

/// A routing request: origin, destination, and zero or more exclusion areas.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Point,
    pub destination: Point,
    pub avoid: Vec<ExclusionArea>,
}
