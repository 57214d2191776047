//! Router (spec §4.8): weighted shortest path between two spliced nodes,
//! serialized to GeoJSON.
//!
//! Grounded on `dt-spatial::router`'s `DijkstraRouter`/`dijkstra`/
//! `reconstruct` shape, adapted from a fixed `u32` millisecond CSR graph to
//! this crate's `f64`-metre keyed-multigraph [`Graph`].

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use geojson::{Feature as GeoJsonFeature, FeatureCollection, Geometry as GeoJsonGeometry};
use gr_core::{EdgeIndex, EdgeKey, NodeId};
use gr_graph::Graph;

use crate::error::{RouteError, RouteResult};

/// An ordered shortest path: the node sequence and total length in metres.
#[derive(Debug, Clone)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub total_length_m: f64,
}

impl Route {
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Standard Dijkstra's algorithm over `graph`'s forward edges, weight =
/// [`gr_graph::EdgeData::length`] (spec §4.8).
pub fn route(graph: &Graph, from: NodeId, to: NodeId) -> RouteResult<Route> {
    if graph.node(from).is_none() {
        return Err(RouteError::NodeNotFound(from));
    }
    if graph.node(to).is_none() {
        return Err(RouteError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Route { nodes: vec![from], total_length_m: 0.0 });
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    dist.insert(from, 0.0);

    // Min-heap ordered by (cost, node); Reverse turns the max-heap into a
    // min-heap. NodeId as a secondary key gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(ordered_cost::OrderedF64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((ordered_cost::OrderedF64(0.0), from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        let cost = cost.0;
        if node == to {
            return Ok(reconstruct(prev, to, cost));
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for (idx, data) in graph.outgoing(node) {
            let new_cost = cost + data.length;
            let best = dist.get(&idx.v).copied().unwrap_or(f64::INFINITY);
            if new_cost < best {
                dist.insert(idx.v, new_cost);
                prev.insert(idx.v, node);
                heap.push(Reverse((ordered_cost::OrderedF64(new_cost), idx.v)));
            }
        }
    }

    Err(RouteError::NoRoute)
}

fn reconstruct(prev: HashMap<NodeId, NodeId>, to: NodeId, total_length_m: f64) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while let Some(&p) = prev.get(&cur) {
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    Route { nodes, total_length_m }
}

/// Serialize a route's edges (in traversal order) as a GeoJSON
/// FeatureCollection, each feature the key=0 edge geometry used (spec
/// §4.8).
pub fn to_geojson(graph: &Graph, route: &Route) -> RouteResult<FeatureCollection> {
    let mut features = Vec::with_capacity(route.nodes.len().saturating_sub(1));
    for pair in route.nodes.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let edge = graph
            .edge(EdgeIndex::new(u, v, EdgeKey::Forward))
            .ok_or(RouteError::Internal(format!("no forward edge between {u} and {v} in route")))?;

        let geometry = GeoJsonGeometry::from(&edge.geometry);
        features.push(GeoJsonFeature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(serde_json::Map::new()),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection { bbox: None, features, foreign_members: None })
}

/// Minimal total-ordering wrapper for `f64` route costs. Route lengths are
/// always finite, non-negative metre values, so `NaN` never appears.
mod ordered_cost {
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct OrderedF64(pub f64);

    impl Eq for OrderedF64 {}

    impl PartialOrd for OrderedF64 {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for OrderedF64 {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_core::Point;
    use gr_geom::UtmProjection;
    use gr_graph::NodeData;

    fn proj() -> UtmProjection {
        UtmProjection { zone: 16, north: true }
    }

    fn line_graph() -> Graph {
        // 0 -> 1 -> 2, plus a longer direct 0 -> 2 edge.
        let mut g = Graph::new(proj());
        for (id, (x, y)) in [(0, (0.0, 0.0)), (1, (0.0, 1.0)), (2, (0.0, 2.0))] {
            g.insert_node(NodeId(id), NodeData { point: Point::new(x, y) });
        }
        let seg = |a: f64, b: f64| geo_types::LineString::from(vec![(0.0, a), (0.0, b)]);
        g.insert_edge_pair(NodeId(0), NodeId(1), seg(0.0, 1.0), 1.0);
        g.insert_edge_pair(NodeId(1), NodeId(2), seg(1.0, 2.0), 1.0);
        g.insert_edge_pair(NodeId(0), NodeId(2), seg(0.0, 2.0), 10.0);
        g
    }

    #[test]
    fn shortest_path_prefers_two_short_hops_over_one_long_edge() {
        let g = line_graph();
        let r = route(&g, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert!((r.total_length_m - 2.0).abs() < 1e-9);
    }

    #[test]
    fn same_origin_and_destination_is_trivial() {
        let g = line_graph();
        let r = route(&g, NodeId(0), NodeId(0)).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.total_length_m, 0.0);
    }

    #[test]
    fn disconnected_destination_fails_with_no_route() {
        let mut g = line_graph();
        g.insert_node(NodeId(3), NodeData { point: Point::new(5.0, 5.0) });
        assert!(route(&g, NodeId(0), NodeId(3)).is_err());
    }

    #[test]
    fn unknown_node_fails_with_node_not_found() {
        let g = line_graph();
        assert!(route(&g, NodeId(0), NodeId(99)).is_err());
    }

    #[test]
    fn geojson_encoding_has_one_feature_per_hop() {
        let g = line_graph();
        let r = route(&g, NodeId(0), NodeId(2)).unwrap();
        let fc = to_geojson(&g, &r).unwrap();
        assert_eq!(fc.features.len(), 2);
    }
}
