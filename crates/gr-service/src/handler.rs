//! The request handler: wraps `gr_route::orchestrate::handle` with envelope
//! (de)serialization, mirroring `lambda_handler.py::handle`'s outer
//! try/except shape (there: `LambdaException` caught and mapped to a
//! status-coded JSON body; here: `ServiceError` and
//! [`crate::envelope::build_response`]).

use gr_core::GeofenceCatalog;
use gr_graph::Graph;

use crate::envelope::{build_response, parse_request};
use crate::error::ServiceError;

/// Process-wide state: the immutable static graph plus a shared geofence
/// catalog client (spec §5 "Shared-resource policy").
pub struct ServiceState<C: GeofenceCatalog> {
    pub graph: Graph,
    pub catalog: C,
}

impl<C: GeofenceCatalog> ServiceState<C> {
    pub fn new(graph: Graph, catalog: C) -> Self {
        Self { graph, catalog }
    }

    /// Handle one request envelope end to end, returning a response
    /// envelope string. Never panics on malformed input; all failure
    /// paths produce a status-coded error body (spec §6, §7).
    pub fn handle_event(&self, envelope_json: &str) -> String {
        let result = self.handle_inner(envelope_json);
        build_response(result)
    }

    fn handle_inner(&self, envelope_json: &str) -> Result<geojson::FeatureCollection, ServiceError> {
        let request = parse_request(envelope_json)?;
        let fc = gr_route::handle(&self.graph, &request, &self.catalog)?;
        Ok(fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_core::{Arn, CatalogEntry, NodeId, Point};
    use gr_geom::UtmProjection;
    use gr_graph::NodeData;
    use serde_json::json;
    use std::collections::HashMap;

    struct EmptyCatalog;
    impl GeofenceCatalog for EmptyCatalog {
        fn prefetch(&self, _arns: &[Arn]) -> Result<HashMap<String, CatalogEntry>, String> {
            Ok(HashMap::new())
        }
    }

    fn state() -> ServiceState<EmptyCatalog> {
        let mut g = Graph::new(UtmProjection { zone: 16, north: true });
        g.insert_node(NodeId(0), NodeData { point: Point::new(-88.04, 30.69) });
        g.insert_node(NodeId(1), NodeData { point: Point::new(-88.03, 30.69) });
        let line = geo_types::LineString::from(vec![(-88.04, 30.69), (-88.03, 30.69)]);
        g.insert_edge_pair(NodeId(0), NodeId(1), line, 963.0);
        ServiceState::new(g, EmptyCatalog)
    }

    #[test]
    fn valid_request_returns_a_200_geojson_response() {
        let envelope = json!({
            "body": json!({
                "Origin": [-88.0395, 30.69],
                "Destination": [-88.0305, 30.69],
            }).to_string()
        })
        .to_string();

        let response = state().handle_event(&envelope);
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["statusCode"], 200);
    }

    #[test]
    fn malformed_body_is_an_internal_error() {
        let envelope = json!({"body": "not json"}).to_string();
        let response = state().handle_event(&envelope);
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["statusCode"], 500);
    }
}
