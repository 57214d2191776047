//! Edge Builder / `prepare` pipeline (spec §4.5): turns a corpus of input
//! linestrings into a clean [`Graph`] with deduplicated vertices and
//! computed edge lengths.
//!
//! Grounded on `prepare.py::get_coords`/`make_nodes`/`make_edges`, adapted
//! from dataframe joins to explicit spatial-index queries (spec §9
//! "Dataframe-style joins"), and `dt-spatial`'s `RoadNetworkBuilder`
//! builder-then-`build()` shape.

use std::collections::HashMap;

use geo::EuclideanLength;
use gr_core::{NodeId, Point};
use gr_geom::UtmProjection;

use crate::cluster::{cluster_twice, DEFAULT_CLUSTER_THRESHOLD_M};
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, NodeData};

/// Self-intersections and mutual crossings among the input set are not
/// detected beyond coincident vertices (spec §4.5 "known gap", §9
/// "dataframe-style joins"); this pre-pass only removes consecutive
/// duplicate coordinates and drops degenerate single-point lines, mirroring
/// the effect `shapely.node(...).line_merge()` has on already-noded input.
fn node_lines(lines: Vec<geo_types::LineString<f64>>) -> Vec<geo_types::LineString<f64>> {
    lines
        .into_iter()
        .filter_map(|line| {
            let mut coords: Vec<geo_types::Coord<f64>> = Vec::with_capacity(line.0.len());
            for c in line.into_inner() {
                if coords.last() != Some(&c) {
                    coords.push(c);
                }
            }
            if coords.len() < 2 {
                None
            } else {
                Some(geo_types::LineString::new(coords))
            }
        })
        .collect()
}

fn coord_key(x: f64, y: f64) -> (u64, u64) {
    (x.to_bits(), y.to_bits())
}

/// Build a [`Graph`] from a corpus of 2D input linestrings (spec §2
/// "Data flow, preparation path").
pub fn prepare(lines: Vec<geo_types::LineString<f64>>, threshold_m: f64) -> GraphResult<Graph> {
    let lines = node_lines(lines);
    if lines.is_empty() {
        return Err(GraphError::Build("no input lines".into()));
    }

    // Flatten every vertex of every line into one candidate pool.
    let mut pool: Vec<(f64, f64)> = Vec::new();
    let mut line_pool_indices: Vec<Vec<usize>> = Vec::with_capacity(lines.len());
    for line in &lines {
        let mut indices = Vec::with_capacity(line.0.len());
        for c in line.coords() {
            indices.push(pool.len());
            pool.push((c.x, c.y));
        }
        line_pool_indices.push(indices);
    }

    let points: Vec<Point> = pool.iter().map(|&(x, y)| Point::new(x, y)).collect();
    let projection = UtmProjection::estimate(points.iter())
        .map_err(|e| GraphError::Build(format!("projection: {e}")))?;

    let table = cluster_twice(&pool, &projection, threshold_m);

    // Deduplicate cluster representatives into node ids.
    let mut graph = Graph::new(projection);
    let mut node_of_coord: HashMap<(u64, u64), NodeId> = HashMap::new();
    let mut node_of_pool_index: Vec<NodeId> = Vec::with_capacity(pool.len());

    for &(x, y) in &table.representative {
        let key = coord_key(x, y);
        let id = *node_of_coord.entry(key).or_insert_with(|| {
            let id = graph.allocate_node_id();
            graph.insert_node(id, NodeData { point: Point::new(x, y) });
            id
        });
        node_of_pool_index.push(id);
    }

    // Substitute each line's vertices with node ids and emit one edge per
    // consecutive pair (every vertex coincides with a node representative
    // after clustering, so the split points are every index — spec §4.5
    // step 4).
    for indices in &line_pool_indices {
        for window in indices.windows(2) {
            let u = node_of_pool_index[window[0]];
            let v = node_of_pool_index[window[1]];
            if u == v {
                continue; // self-loop, discarded per spec §4.5 step 5.
            }
            let u_point = graph.node(u).unwrap().point;
            let v_point = graph.node(v).unwrap().point;
            let geometry = geo_types::LineString::from(vec![
                (u_point.x(), u_point.y()),
                (v_point.x(), v_point.y()),
            ]);
            let metric = graph.projection.to_metric(geometry.clone());
            let length = (metric.euclidean_length() * 100.0).round() / 100.0;
            graph.insert_edge_pair(u, v, geometry, length);
        }
    }

    log::debug!(
        "prepared graph: {} nodes, {} directed edges from {} input lines",
        graph.node_count(),
        graph.edge_count(),
        lines.len()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &[(f64, f64)]) -> geo_types::LineString<f64> {
        geo_types::LineString::from(coords.to_vec())
    }

    /// S1: three lines sharing endpoint (1,1). Expect 4 nodes, 6 directed
    /// edges (spec §8 S1).
    #[test]
    fn s1_simple_prepare() {
        let lines = vec![
            line(&[(0.0, 0.0), (1.0, 1.0)]),
            line(&[(1.0, 1.0), (2.0, 2.0)]),
            line(&[(1.0, 1.0), (2.0, 0.0)]),
        ];
        let graph = prepare(lines, DEFAULT_CLUSTER_THRESHOLD_M).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 6);
    }

    /// S2: S1's lines plus a disconnected pair. Expect 7 nodes, 10 directed
    /// edges (spec §8 S2).
    #[test]
    fn s2_disconnected_prepare() {
        let lines = vec![
            line(&[(0.0, 0.0), (1.0, 1.0)]),
            line(&[(1.0, 1.0), (2.0, 2.0)]),
            line(&[(1.0, 1.0), (2.0, 0.0)]),
            line(&[(0.0, 1.0), (0.0, 2.0)]),
            line(&[(0.0, 2.0), (0.0, 3.0)]),
        ];
        let graph = prepare(lines, DEFAULT_CLUSTER_THRESHOLD_M).unwrap();
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 10);
    }

    /// S3: approximate clustering collapses three near-coincident
    /// endpoints at (~1,1) (spec §8 S3). Thresholds are degree-scaled here
    /// since the fixture coordinates aren't real WGS84 positions; the
    /// offsets (1e-5) are well within 5 m at any latitude.
    #[test]
    fn s3_approximate_clustering() {
        let lines = vec![
            line(&[(0.0, 0.0), (1.00001, 1.0)]),
            line(&[(1.0, 1.0), (2.0, 2.0)]),
            line(&[(0.99998, 1.0), (2.0, 0.0)]),
        ];
        let graph = prepare(lines, DEFAULT_CLUSTER_THRESHOLD_M).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn edge_pairing_holds_for_every_forward_edge() {
        let lines = vec![line(&[(0.0, 0.0), (1.0, 1.0)]), line(&[(1.0, 1.0), (2.0, 0.0)])];
        let graph = prepare(lines, DEFAULT_CLUSTER_THRESHOLD_M).unwrap();
        for (idx, data) in graph.forward_edges() {
            let reversed = graph.edge(idx.reversed()).expect("matching reverse edge");
            assert_eq!(reversed.length, data.length);
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(prepare(vec![], DEFAULT_CLUSTER_THRESHOLD_M).is_err());
    }
}
