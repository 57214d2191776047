//! Query Orchestrator (spec §4.9): composes exclusion resolution, the
//! Specializer, two Splicer calls, and the Router into one request handler.
//!
//! Grounded on `lambda_handler.py::handle`'s top-level request flow.

use std::collections::HashMap;

use geo::{Buffer, BooleanOps};
use geojson::FeatureCollection;
use gr_core::{Arn, CatalogEntry, ExclusionArea, GeofenceCatalog, MultiPolygon, RouteRequest};
use gr_graph::Graph;

use crate::error::{RouteError, RouteResult};
use crate::route::{route, to_geojson};
use crate::splice::splice;
use crate::specialize::specialize;

fn resolve_exclusions(
    graph: &Graph,
    avoid: &[ExclusionArea],
    catalog: &dyn GeofenceCatalog,
) -> RouteResult<MultiPolygon> {
    let arn_refs: Vec<Arn> = avoid
        .iter()
        .filter_map(|a| match a {
            ExclusionArea::GeofenceRef(arn) => Some(arn.clone()),
            _ => None,
        })
        .collect();

    let fetched = if arn_refs.is_empty() {
        HashMap::new()
    } else {
        catalog
            .prefetch(&arn_refs)
            .map_err(RouteError::GeofenceUnavailable)?
    };

    let mut polygons = Vec::new();
    for area in avoid {
        match area {
            ExclusionArea::Circle { center, radius_meters } => {
                polygons.push(buffer_circle(graph, *center, *radius_meters));
            }
            ExclusionArea::Polygon(p) => polygons.push(p.clone()),
            ExclusionArea::GeofenceRef(arn) => {
                let key = format!(
                    "{}{}",
                    arn.without_entry(),
                    arn.entry_id.as_ref().map(|id| format!("#{id}")).unwrap_or_default()
                );
                let entry = fetched
                    .get(&key)
                    .ok_or_else(|| RouteError::GeofenceUnavailable(arn.to_string()))?;
                match entry {
                    CatalogEntry::Circle { center, radius_meters } => {
                        polygons.push(buffer_circle(graph, *center, *radius_meters));
                    }
                    CatalogEntry::Polygon(p) => polygons.push(p.clone()),
                }
            }
        }
    }

    let mut merged = MultiPolygon::new(vec![]);
    for p in polygons {
        let single = MultiPolygon::new(vec![p]);
        merged = merged.union(&single);
    }
    Ok(merged)
}

fn buffer_circle(graph: &Graph, center: gr_core::Point, radius_meters: f64) -> gr_core::Polygon {
    let center_m = graph.projection.to_metric_point(center);
    let buffered: MultiPolygon = center_m.buffer(radius_meters);
    let back = graph.projection.to_geographic(buffered);
    back.0.into_iter().next().expect("buffering a point always yields one polygon")
}

/// Handle one routing request end-to-end (spec §4.9).
pub fn handle(
    graph: &Graph,
    request: &RouteRequest,
    catalog: &dyn GeofenceCatalog,
) -> RouteResult<FeatureCollection> {
    let exclusions = resolve_exclusions(graph, &request.avoid, catalog)?;

    let mut working = specialize(graph, &exclusions);

    let origin_result = splice(&mut working, request.origin)?;
    let destination_result = splice(&mut working, request.destination)?;

    let found = route(&working, origin_result.node, destination_result.node)?;
    to_geojson(&working, &found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_core::Point;
    use gr_geom::UtmProjection;
    use gr_graph::NodeData;

    struct EmptyCatalog;
    impl GeofenceCatalog for EmptyCatalog {
        fn prefetch(&self, _arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
            Ok(HashMap::new())
        }
    }

    struct FailingCatalog;
    impl GeofenceCatalog for FailingCatalog {
        fn prefetch(&self, _arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
            Err("catalog unreachable".into())
        }
    }

    fn proj() -> UtmProjection {
        UtmProjection { zone: 16, north: true }
    }

    fn line_graph() -> Graph {
        let mut g = Graph::new(proj());
        g.insert_node(gr_core::NodeId(0), NodeData { point: Point::new(-88.04, 30.69) });
        g.insert_node(gr_core::NodeId(1), NodeData { point: Point::new(-88.03, 30.69) });
        let line = geo_types::LineString::from(vec![(-88.04, 30.69), (-88.03, 30.69)]);
        g.insert_edge_pair(gr_core::NodeId(0), gr_core::NodeId(1), line, 963.0);
        g
    }

    #[test]
    fn simple_request_without_exclusions_returns_a_route() {
        let g = line_graph();
        let request = RouteRequest {
            origin: Point::new(-88.0395, 30.69),
            destination: Point::new(-88.0305, 30.69),
            avoid: vec![],
        };
        let fc = handle(&g, &request, &EmptyCatalog).unwrap();
        assert!(!fc.features.is_empty());
    }

    #[test]
    fn unresolvable_arn_maps_to_geofence_unavailable() {
        let g = line_graph();
        let arn = Arn::parse("arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet#entry-1").unwrap();
        let request = RouteRequest {
            origin: Point::new(-88.0395, 30.69),
            destination: Point::new(-88.0305, 30.69),
            avoid: vec![ExclusionArea::GeofenceRef(arn)],
        };
        let err = handle(&g, &request, &EmptyCatalog).unwrap_err();
        assert!(matches!(err, RouteError::GeofenceUnavailable(_)));
    }

    #[test]
    fn catalog_fetch_failure_maps_to_geofence_unavailable() {
        let g = line_graph();
        let arn = Arn::parse("arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet#entry-1").unwrap();
        let request = RouteRequest {
            origin: Point::new(-88.0395, 30.69),
            destination: Point::new(-88.0305, 30.69),
            avoid: vec![ExclusionArea::GeofenceRef(arn)],
        };
        let err = handle(&g, &request, &FailingCatalog).unwrap_err();
        assert!(matches!(err, RouteError::GeofenceUnavailable(_)));
    }
}
