//! Prepared-graph persistence (spec §6 "Prepared graph (on disk)").
//!
//! The on-disk encoding is explicitly opaque to the core — "any format
//! that round-trips these fields losslessly is acceptable" — so this
//! picks a plain JSON document (nodes + forward edges; reverse edges are
//! rebuilt on load via [`gr_graph::Graph::insert_edge_pair`]) rather than
//! inventing a binary format.

use std::fs;
use std::io::Write;
use std::path::Path;

use gr_core::{NodeId, Point};
use gr_geom::UtmProjection;
use gr_graph::{Graph, NodeData};
use serde_json::json;

use crate::error::{ServiceError, ServiceResult};

pub fn save_graph<W: Write>(graph: &Graph, out: &mut W) -> ServiceResult<()> {
    let nodes: Vec<_> = graph
        .nodes()
        .map(|(id, data)| json!({"id": id.0, "lon": data.point.x(), "lat": data.point.y()}))
        .collect();

    let edges: Vec<_> = graph
        .forward_edges()
        .map(|(idx, data)| {
            let coords: Vec<[f64; 2]> = data.geometry.coords().map(|c| [c.x, c.y]).collect();
            json!({"u": idx.u.0, "v": idx.v.0, "length": data.length, "geometry": coords})
        })
        .collect();

    let doc = json!({
        "projection": {"zone": graph.projection.zone, "north": graph.projection.north},
        "nodes": nodes,
        "edges": edges,
    });

    out.write_all(serde_json::to_string(&doc).map_err(|e| ServiceError::Internal(e.to_string()))?.as_bytes())
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

pub fn load_graph(path: &Path) -> ServiceResult<Graph> {
    let text = fs::read_to_string(path).map_err(|e| ServiceError::Internal(e.to_string()))?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let zone = doc["projection"]["zone"]
        .as_u64()
        .ok_or_else(|| ServiceError::Internal("missing projection.zone".into()))? as u8;
    let north = doc["projection"]["north"]
        .as_bool()
        .ok_or_else(|| ServiceError::Internal("missing projection.north".into()))?;

    let mut graph = Graph::new(UtmProjection { zone, north });

    for node in doc["nodes"].as_array().ok_or_else(|| ServiceError::Internal("missing nodes".into()))? {
        let id = NodeId(node["id"].as_u64().ok_or_else(|| ServiceError::Internal("node missing id".into()))?);
        let lon = node["lon"].as_f64().ok_or_else(|| ServiceError::Internal("node missing lon".into()))?;
        let lat = node["lat"].as_f64().ok_or_else(|| ServiceError::Internal("node missing lat".into()))?;
        graph.insert_node(id, NodeData { point: Point::new(lon, lat) });
    }

    for edge in doc["edges"].as_array().ok_or_else(|| ServiceError::Internal("missing edges".into()))? {
        let u = NodeId(edge["u"].as_u64().ok_or_else(|| ServiceError::Internal("edge missing u".into()))?);
        let v = NodeId(edge["v"].as_u64().ok_or_else(|| ServiceError::Internal("edge missing v".into()))?);
        let length = edge["length"].as_f64().ok_or_else(|| ServiceError::Internal("edge missing length".into()))?;
        let coords = edge["geometry"]
            .as_array()
            .ok_or_else(|| ServiceError::Internal("edge missing geometry".into()))?
            .iter()
            .map(|c| {
                let arr = c.as_array().ok_or_else(|| ServiceError::Internal("bad coordinate".into()))?;
                let x = arr[0].as_f64().ok_or_else(|| ServiceError::Internal("bad coordinate".into()))?;
                let y = arr[1].as_f64().ok_or_else(|| ServiceError::Internal("bad coordinate".into()))?;
                Ok((x, y))
            })
            .collect::<ServiceResult<Vec<_>>>()?;
        let geometry = geo_types::LineString::from(coords);
        graph.insert_edge_pair(u, v, geometry, length);
    }

    log::debug!("loaded graph from {}: {} nodes, {} edges", path.display(), graph.node_count(), graph.edge_count());
    Ok(graph)
}
