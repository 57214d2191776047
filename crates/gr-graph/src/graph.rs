//! The routable graph data model (spec §3 "Graph", "Node", "Edge").
//!
//! Unlike `dt-spatial::RoadNetwork`'s CSR layout — ideal for an immutable,
//! load-once road network — this graph must support per-request mutation
//! (clipping, renumbering, splicing), so nodes and edges live in ordinary
//! keyed maps rather than sorted arrays.

use std::collections::HashMap;

use gr_geom::UtmProjection;
use gr_core::{EdgeIndex, EdgeKey, NodeId, Point};

/// A graph vertex: an id plus its WGS84 coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
    pub point: Point,
}

/// A directed edge, keyed externally by `(u, v, key)` — see [`EdgeIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeData {
    pub geometry: geo_types::LineString<f64>,
    /// Meters, rounded to 0.01 (spec §3 "Edge").
    pub length: f64,
}

/// A directed multigraph keyed by `(u, v, key)` plus the UTM projection it
/// was built in (spec §3 "Graph").
#[derive(Clone)]
pub struct Graph {
    pub projection: UtmProjection,
    nodes: HashMap<NodeId, NodeData>,
    edges: HashMap<EdgeIndex, EdgeData>,
    next_id: u64,
}

impl Graph {
    pub fn new(projection: UtmProjection) -> Self {
        Self { projection, nodes: HashMap::new(), edges: HashMap::new(), next_id: 0 }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter().map(|(id, data)| (*id, data))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&EdgeData> {
        self.edges.get(&index)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &EdgeData)> {
        self.edges.iter().map(|(idx, data)| (*idx, data))
    }

    /// Forward (`key == Forward`) edges only, the canonical edge set for
    /// serialization and route reconstruction.
    pub fn forward_edges(&self) -> impl Iterator<Item = (EdgeIndex, &EdgeData)> {
        self.edges().filter(|(idx, _)| idx.key == EdgeKey::Forward)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing forward edges from `node`, used by the router's relaxation
    /// step.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = (EdgeIndex, &EdgeData)> {
        self.edges()
            .filter(move |(idx, _)| idx.u == node && idx.key == EdgeKey::Forward)
    }

    /// Allocate a fresh node id, `max(existing ids) + 1` on first call and
    /// incrementing thereafter (spec §4.6 step 4, §4.7 step 3).
    pub fn allocate_node_id(&mut self) -> NodeId {
        if self.next_id == 0 {
            self.next_id = self.nodes.keys().map(|id| id.0).max().map_or(0, |m| m + 1);
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert_node(&mut self, id: NodeId, data: NodeData) {
        self.nodes.insert(id, data);
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeData> {
        self.nodes.remove(&id)
    }

    /// Insert a forward/reverse edge pair sharing one geometry and length
    /// (spec §3 "Edge" invariant: every key=0 edge has a matching key=1).
    pub fn insert_edge_pair(&mut self, u: NodeId, v: NodeId, geometry: geo_types::LineString<f64>, length: f64) {
        let reversed = {
            let mut coords: Vec<_> = geometry.coords().cloned().collect();
            coords.reverse();
            geo_types::LineString::new(coords)
        };
        self.edges.insert(
            EdgeIndex::new(u, v, EdgeKey::Forward),
            EdgeData { geometry, length },
        );
        self.edges.insert(
            EdgeIndex::new(v, u, EdgeKey::Reverse),
            EdgeData { geometry: reversed, length },
        );
    }

    pub fn remove_edge(&mut self, index: EdgeIndex) -> Option<EdgeData> {
        self.edges.remove(&index)
    }

    /// Remove both directions of the `(u, v)` pair in one call.
    pub fn remove_edge_pair(&mut self, u: NodeId, v: NodeId) {
        self.edges.remove(&EdgeIndex::new(u, v, EdgeKey::Forward));
        self.edges.remove(&EdgeIndex::new(v, u, EdgeKey::Reverse));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proj() -> UtmProjection {
        UtmProjection { zone: 16, north: true }
    }

    #[test]
    fn insert_edge_pair_produces_matching_reverse() {
        let mut g = Graph::new(proj());
        let u = NodeId(0);
        let v = NodeId(1);
        g.insert_node(u, NodeData { point: Point::new(0.0, 0.0) });
        g.insert_node(v, NodeData { point: Point::new(1.0, 1.0) });
        let line = geo_types::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        g.insert_edge_pair(u, v, line, 157.25);

        let fwd = g.edge(EdgeIndex::new(u, v, EdgeKey::Forward)).unwrap();
        let rev = g.edge(EdgeIndex::new(v, u, EdgeKey::Reverse)).unwrap();
        assert_eq!(fwd.length, rev.length);
        assert_eq!(fwd.geometry.points().next(), rev.geometry.points().last());
    }

    #[test]
    fn allocate_node_id_starts_above_existing_max() {
        let mut g = Graph::new(proj());
        g.insert_node(NodeId(5), NodeData { point: Point::new(0.0, 0.0) });
        g.insert_node(NodeId(2), NodeData { point: Point::new(0.0, 0.0) });
        assert_eq!(g.allocate_node_id(), NodeId(6));
        assert_eq!(g.allocate_node_id(), NodeId(7));
    }
}
