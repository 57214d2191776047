//! Graph Specializer (spec §4.6): per-request clone, exclusion clipping,
//! orphaned-endpoint renumbering, synthetic node creation.
//!
//! Grounded on `lambda_handler.py::handle`'s exclusion-area branch
//! (`nodes.difference(exclusion_areas)`, `remap_missing_nodes`,
//! `make_nodes`'s synthesized u/v rows).

use std::collections::HashSet;

use geo::{BooleanOps, Contains, EuclideanLength};
use gr_core::{EdgeIndex, MultiPolygon, NodeId, Point};
use gr_graph::{EdgeData, Graph, NodeData};

fn points_match(a: Point, b: Point) -> bool {
    (a.x() - b.x()).abs() < 1e-9 && (a.y() - b.y()).abs() < 1e-9
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Clone `graph` and clip it against `exclusions` (spec §4.6). An empty
/// exclusion collection is a pure clone — no-op clipping.
///
/// Open Question (spec §9, resolved in DESIGN.md): a clipped piece whose
/// endpoint does not coincide with a surviving node's coordinate always
/// mints a fresh synthetic id, even if two pieces of the same original
/// edge share a cut coordinate — matching `remap_missing_nodes`'s
/// per-occurrence counter rather than deduplicating by coordinate.
pub fn specialize(graph: &Graph, exclusions: &MultiPolygon) -> Graph {
    if exclusions.0.is_empty() {
        log::debug!("no exclusion areas; specializer clones the static graph unchanged");
        return graph.clone();
    }

    let mut working = graph.clone();
    let mut removed_nodes: HashSet<NodeId> = HashSet::new();

    let node_ids: Vec<NodeId> = working.nodes().map(|(id, _)| id).collect();
    for id in node_ids {
        let point = working.node(id).expect("id came from this graph's node iterator").point;
        if exclusions.contains(&point) {
            working.remove_node(id);
            removed_nodes.insert(id);
        }
    }

    let forward: Vec<(EdgeIndex, EdgeData)> =
        working.forward_edges().map(|(idx, data)| (idx, data.clone())).collect();
    for (idx, _) in &forward {
        working.remove_edge_pair(idx.u, idx.v);
    }

    let mut dropped = 0usize;
    let mut synthesized = 0usize;

    for (idx, data) in forward {
        let multi_line = geo_types::MultiLineString::new(vec![data.geometry.clone()]);
        let clipped = exclusions.clip(&multi_line, true);
        if clipped.0.is_empty() {
            dropped += 1;
            continue;
        }

        let u_point = graph.node(idx.u).expect("original edge endpoint").point;
        let v_point = graph.node(idx.v).expect("original edge endpoint").point;

        for piece in clipped.0 {
            if piece.0.len() < 2 {
                continue;
            }
            let first = *piece.0.first().unwrap();
            let last = *piece.0.last().unwrap();
            let first_point = Point::new(first.x, first.y);
            let last_point = Point::new(last.x, last.y);

            let u_new = if !removed_nodes.contains(&idx.u) && points_match(first_point, u_point) {
                idx.u
            } else {
                let id = working.allocate_node_id();
                working.insert_node(id, NodeData { point: first_point });
                synthesized += 1;
                id
            };
            let v_new = if !removed_nodes.contains(&idx.v) && points_match(last_point, v_point) {
                idx.v
            } else {
                let id = working.allocate_node_id();
                working.insert_node(id, NodeData { point: last_point });
                synthesized += 1;
                id
            };

            if u_new == v_new {
                continue;
            }

            let metric = working.projection.to_metric(piece.clone());
            let length = round2(metric.euclidean_length());
            working.insert_edge_pair(u_new, v_new, piece, length);
        }
    }

    log::debug!(
        "specialized graph: {} edges fully clipped away, {} synthetic nodes minted",
        dropped,
        synthesized
    );

    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use gr_geom::UtmProjection;

    fn proj() -> UtmProjection {
        UtmProjection { zone: 16, north: true }
    }

    fn small_graph() -> Graph {
        let mut g = Graph::new(proj());
        let a = NodeId(0);
        let b = NodeId(1);
        g.insert_node(a, NodeData { point: Point::new(0.0, 0.0) });
        g.insert_node(b, NodeData { point: Point::new(0.0, 10.0) });
        let line = geo_types::LineString::from(vec![(0.0, 0.0), (0.0, 10.0)]);
        g.insert_edge_pair(a, b, line, 10.0);
        g
    }

    #[test]
    fn empty_exclusion_is_a_pure_clone() {
        let g = small_graph();
        let empty = MultiPolygon::new(vec![]);
        let out = specialize(&g, &empty);
        assert_eq!(out.node_count(), g.node_count());
        assert_eq!(out.edge_count(), g.edge_count());
    }

    #[test]
    fn exclusion_covering_one_endpoint_mints_synthetic_node() {
        let g = small_graph();
        let box_around_a = polygon![
            (x: -1.0, y: -1.0),
            (x: 1.0, y: -1.0),
            (x: 1.0, y: 1.0),
            (x: -1.0, y: 1.0),
            (x: -1.0, y: -1.0),
        ];
        let exclusions = MultiPolygon::new(vec![box_around_a]);
        let out = specialize(&g, &exclusions);

        // node 0 (inside the box) is gone; a synthetic node replaces it.
        assert!(out.node(NodeId(0)).is_none());
        assert!(out.node_count() >= 2);
        assert!(out.edge_count() >= 2);
    }

    #[test]
    fn exclusion_covering_whole_edge_drops_it() {
        let g = small_graph();
        let big_box = polygon![
            (x: -5.0, y: -5.0),
            (x: 5.0, y: -5.0),
            (x: 5.0, y: 15.0),
            (x: -5.0, y: 15.0),
            (x: -5.0, y: -5.0),
        ];
        let exclusions = MultiPolygon::new(vec![big_box]);
        let out = specialize(&g, &exclusions);
        assert_eq!(out.edge_count(), 0);
    }
}
