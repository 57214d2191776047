//! Geometry type aliases shared by every `gr-*` crate.
//!
//! All coordinates are `f64`. Inputs/outputs are WGS84 lon/lat; metric work
//! happens in a derived UTM projection and is discarded (see `gr-geom`).

pub type Point = geo_types::Point<f64>;
pub type LineString = geo_types::LineString<f64>;
pub type Polygon = geo_types::Polygon<f64>;
pub type MultiPolygon = geo_types::MultiPolygon<f64>;
pub type Geometry = geo_types::Geometry<f64>;
pub type GeometryCollection = geo_types::GeometryCollection<f64>;
