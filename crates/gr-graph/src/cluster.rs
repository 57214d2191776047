//! Vertex Clusterer (spec §4.4): collapses near-coincident endpoints of
//! input lines into shared nodes.
//!
//! Grounded on `prepare.py::cluster` (sjoin_nearest adjacency → connected
//! components via union-find → centroid replacement), run twice as the
//! pipeline specifies.

use rustc_hash::FxHashMap;

use gr_geom::UtmProjection;

use crate::index::PointIndex;

/// Default node-equivalence threshold, in meters (spec §3 "Edge" note,
/// §4.4).
pub const DEFAULT_CLUSTER_THRESHOLD_M: f64 = 5.0;

/// Union-find over candidate vertex indices.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Run one clustering pass over `points_wgs84` (lon, lat), returning the
/// cluster centroid (re-projected to WGS84) each input point maps to.
///
/// Implements spec §4.4 steps 1-5: project to metric, connect points
/// within `threshold_m`, collapse connected components to their centroid,
/// leave singletons untouched.
fn cluster_pass(points_wgs84: &[(f64, f64)], projection: &UtmProjection, threshold_m: f64) -> Vec<(f64, f64)> {
    let n = points_wgs84.len();
    if n == 0 {
        return Vec::new();
    }

    let metric: Vec<[f64; 2]> = points_wgs84
        .iter()
        .map(|&(lon, lat)| {
            let p = projection.to_metric_point(gr_core::Point::new(lon, lat));
            [p.x(), p.y()]
        })
        .collect();

    let index = PointIndex::build(metric.iter().enumerate().map(|(i, c)| (i, *c)));

    let mut uf = UnionFind::new(n);
    for (i, coord) in metric.iter().enumerate() {
        for (j, _) in index.within(*coord, threshold_m) {
            if j != i {
                uf.union(i, j);
            }
        }
    }

    let mut members: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for i in 0..n {
        let root = uf.find(i);
        members.entry(root).or_default().push(i);
    }

    let mut representative = vec![(0.0, 0.0); n];
    for group in members.values() {
        if group.len() == 1 {
            let i = group[0];
            representative[i] = points_wgs84[i];
            continue;
        }
        let (mut sx, mut sy) = (0.0, 0.0);
        for &i in group {
            sx += metric[i][0];
            sy += metric[i][1];
        }
        let centroid_m = gr_core::Point::new(sx / group.len() as f64, sy / group.len() as f64);
        let centroid = projection.to_geographic_point(centroid_m);
        for &i in group {
            representative[i] = (centroid.x(), centroid.y());
        }
    }

    representative
}

/// A deduplicated node produced by clustering: its final coordinate plus
/// the set of input-vertex indices that map to it.
pub struct ClusterTable {
    /// Representative coordinate (lon, lat) for each input vertex's final
    /// cluster, indexed the same as the input slice.
    pub representative: Vec<(f64, f64)>,
}

/// Cluster `points` (lon, lat) twice in succession (spec §4.4: "the
/// pipeline runs this pass twice"), since centroid replacement in the
/// first pass can bring formerly-separated pairs within threshold.
pub fn cluster_twice(points: &[(f64, f64)], projection: &UtmProjection, threshold_m: f64) -> ClusterTable {
    let first = cluster_pass(points, projection, threshold_m);
    let second = cluster_pass(&first, projection, threshold_m);
    ClusterTable { representative: second }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proj() -> UtmProjection {
        UtmProjection { zone: 16, north: true }
    }

    #[test]
    fn singleton_points_are_unchanged() {
        let points = vec![(-88.04, 30.69), (-87.0, 31.0)];
        let table = cluster_twice(&points, &proj(), DEFAULT_CLUSTER_THRESHOLD_M);
        for (input, out) in points.iter().zip(table.representative.iter()) {
            assert!((input.0 - out.0).abs() < 1e-9);
            assert!((input.1 - out.1).abs() < 1e-9);
        }
    }

    #[test]
    fn near_coincident_points_collapse_to_shared_coordinate() {
        // ~1 m apart at this latitude.
        let points = vec![(-88.040000, 30.690000), (-88.040001, 30.690001), (-87.0, 31.0)];
        let table = cluster_twice(&points, &proj(), DEFAULT_CLUSTER_THRESHOLD_M);
        assert_eq!(table.representative[0], table.representative[1]);
        assert_ne!(table.representative[0], table.representative[2]);
    }

    #[test]
    fn three_passes_match_two_for_sparse_input() {
        let points = vec![(-88.04, 30.69), (-88.03, 30.70), (-87.0, 31.0)];
        let two = cluster_twice(&points, &proj(), DEFAULT_CLUSTER_THRESHOLD_M);
        let three = cluster_pass(&two.representative, &proj(), DEFAULT_CLUSTER_THRESHOLD_M);
        assert_eq!(two.representative, three);
    }
}
