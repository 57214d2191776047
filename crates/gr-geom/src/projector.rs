//! `Projector` — UTM zone estimation plus forward/inverse WGS84↔UTM
//! transforms (spec §4.1).
//!
//! No crate in this workspace's dependency stack wraps transverse Mercator
//! projection, so the Snyder (1987) series-expansion formulas for the
//! WGS84 ellipsoid are implemented directly, in the same spirit as
//! `dt-core::geo::GeoPoint::distance_m`'s hand-rolled haversine — a small,
//! self-contained piece of geodesy math rather than an external dependency.

use geo::MapCoords;

use gr_core::geometry::Point;

use crate::GeomError;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A UTM zone (1..=60) plus hemisphere, estimated once from a point cloud's
/// centroid and reused as the graph's metric frame for the lifetime of the
/// process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UtmProjection {
    pub zone: u8,
    pub north: bool,
}

impl UtmProjection {
    /// Estimate the UTM zone/hemisphere from a point cloud's centroid
    /// longitude/latitude (spec §4.1). Fails if no points are provided.
    pub fn estimate<'a>(points: impl IntoIterator<Item = &'a Point>) -> Result<Self, GeomError> {
        let mut sum_lon = 0.0;
        let mut sum_lat = 0.0;
        let mut count = 0usize;
        for p in points {
            sum_lon += p.x();
            sum_lat += p.y();
            count += 1;
        }
        if count == 0 {
            return Err(GeomError::Projection("no points provided to estimate UTM zone".into()));
        }
        let centroid_lon = sum_lon / count as f64;
        let centroid_lat = sum_lat / count as f64;

        let zone = (((centroid_lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        let north = centroid_lat >= 0.0;

        Ok(Self { zone, north })
    }

    /// Central meridian of this zone, in degrees.
    fn central_meridian_deg(&self) -> f64 {
        (self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Project a single WGS84 point to metric (x, y) in this zone.
    pub fn to_metric_point(&self, p: Point) -> Point {
        let (x, y) = forward(p.y(), p.x(), self.central_meridian_deg(), self.north);
        Point::new(x, y)
    }

    /// Unproject a single metric (x, y) point back to WGS84 (lon, lat).
    pub fn to_geographic_point(&self, p: Point) -> Point {
        let (lat, lon) = inverse(p.x(), p.y(), self.central_meridian_deg(), self.north);
        Point::new(lon, lat)
    }

    /// Project any `geo` geometry (coordinate-wise) to metric.
    pub fn to_metric<G>(&self, geom: G) -> G
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geom.map_coords(|c| {
            let (x, y) = forward(c.y, c.x, self.central_meridian_deg(), self.north);
            geo_types::Coord { x, y }
        })
    }

    /// Unproject any `geo` geometry (coordinate-wise) back to WGS84.
    pub fn to_geographic<G>(&self, geom: G) -> G
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geom.map_coords(|c| {
            let (lat, lon) = inverse(c.x, c.y, self.central_meridian_deg(), self.north);
            geo_types::Coord { x: lon, y: lat }
        })
    }
}

// ── Snyder transverse Mercator ─────────────────────────────────────────────────

fn forward(lat_deg: f64, lon_deg: f64, lon0_deg: f64, north: bool) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);

    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = lon0_deg.to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a = cos_lat * (lon - lon0);

    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e2 * e2 / 32.0 + 45.0 * e2.powi(3) / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e2 * e2 / 256.0 + 45.0 * e2.powi(3) / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e2.powi(3) / 3072.0) * (6.0 * lat).sin());

    let x = K0 * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;

    let mut y = K0
        * (m
            + n * tan_lat
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    if !north {
        y += FALSE_NORTHING_SOUTH;
    }

    (x, y)
}

fn inverse(x: f64, y: f64, lon0_deg: f64, north: bool) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let lon0 = lon0_deg.to_radians();

    let y_adj = if north { y } else { y - FALSE_NORTHING_SOUTH };
    let m = y_adj / K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = WGS84_A / (1.0 - e2 * sin_phi1 * sin_phi1).sqrt();
    let t1 = tan_phi1 * tan_phi1;
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin_phi1 * sin_phi1).powf(1.5);
    let d = (x - FALSE_EASTING) / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / cos_phi1;

    (lat.to_degrees(), lon.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_from_centroid() {
        // Mobile, Alabama — roughly zone 16N.
        let points = vec![Point::new(-88.04, 30.69), Point::new(-88.03, 30.70)];
        let proj = UtmProjection::estimate(points.iter()).unwrap();
        assert_eq!(proj.zone, 16);
        assert!(proj.north);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let proj = UtmProjection { zone: 16, north: true };
        let original = Point::new(-88.04, 30.69);
        let metric = proj.to_metric_point(original);
        let back = proj.to_geographic_point(metric);

        // ~1 cm at this latitude is roughly 1e-7 degrees.
        assert!((back.x() - original.x()).abs() < 1e-6);
        assert!((back.y() - original.y()).abs() < 1e-6);
    }

    #[test]
    fn estimate_fails_on_empty_input() {
        let points: Vec<Point> = vec![];
        assert!(UtmProjection::estimate(points.iter()).is_err());
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let points = vec![Point::new(-58.37, -34.60)]; // Buenos Aires
        let proj = UtmProjection::estimate(points.iter()).unwrap();
        assert!(!proj.north);
        let metric = proj.to_metric_point(points[0]);
        assert!(metric.y() > 0.0);
    }
}
