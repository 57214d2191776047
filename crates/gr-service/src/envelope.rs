//! Request/response envelope (de)serialization (spec §6), grounded on
//! `lambda_handler.py::handle`'s `event["body"]` JSON-in/JSON-out shape and
//! `get_exclusion_areas`'s per-area validation.

use std::collections::HashMap;

use geojson::FeatureCollection;
use gr_core::{Arn, ExclusionArea, Point, Polygon, RouteRequest};
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;

/// The outer `{ "body": "<stringified JSON>" }` request envelope.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct RequestBody {
    #[serde(rename = "Origin")]
    origin: [f64; 2],
    #[serde(rename = "Destination")]
    destination: [f64; 2],
    #[serde(rename = "Avoid", default)]
    avoid: AvoidBody,
}

#[derive(Debug, Default, Deserialize)]
struct AvoidBody {
    #[serde(rename = "Areas", default)]
    areas: Vec<AreaBody>,
}

#[derive(Debug, Deserialize)]
struct AreaBody {
    #[serde(rename = "Area")]
    area: RawArea,
}

#[derive(Debug, Default, Deserialize)]
struct RawArea {
    #[serde(rename = "Circle")]
    circle: Option<RawCircle>,
    #[serde(rename = "Polygon")]
    polygon: Option<Vec<Vec<[f64; 2]>>>,
    #[serde(rename = "Arn")]
    arn: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCircle {
    #[serde(rename = "Center")]
    center: [f64; 2],
    #[serde(rename = "Radius")]
    radius: f64,
}

/// Parse the request envelope's `body` into a [`RouteRequest`], enforcing
/// "exactly one of {Circle, Polygon, Arn} per area" (spec §4.9, §8 S6) and
/// `service == "geo"` on any Arn (spec §C, `get_exclusion_areas`).
pub fn parse_request(envelope_json: &str) -> Result<RouteRequest, ServiceError> {
    let envelope: RequestEnvelope =
        serde_json::from_str(envelope_json).map_err(|e| ServiceError::Internal(e.to_string()))?;
    let body: RequestBody =
        serde_json::from_str(&envelope.body).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut avoid = Vec::with_capacity(body.avoid.areas.len());
    for area in body.avoid.areas {
        let present = [area.area.circle.is_some(), area.area.polygon.is_some(), area.area.arn.is_some()]
            .iter()
            .filter(|p| **p)
            .count();
        if present != 1 {
            return Err(ServiceError::InvalidArea);
        }

        let resolved = if let Some(circle) = area.area.circle {
            ExclusionArea::Circle {
                center: Point::new(circle.center[0], circle.center[1]),
                radius_meters: circle.radius,
            }
        } else if let Some(rings) = area.area.polygon {
            let mut rings = rings.into_iter();
            let exterior = rings.next().ok_or(ServiceError::InvalidArea)?;
            let interiors: Vec<_> = rings
                .map(|ring| geo_types::LineString::from(ring.into_iter().map(|c| (c[0], c[1])).collect::<Vec<_>>()))
                .collect();
            ExclusionArea::Polygon(Polygon::new(
                geo_types::LineString::from(exterior.into_iter().map(|c| (c[0], c[1])).collect::<Vec<_>>()),
                interiors,
            ))
        } else {
            let raw_arn = area.area.arn.expect("exactly one of the three fields is present");
            let arn = Arn::parse(&raw_arn).map_err(|_| ServiceError::InvalidArea)?;
            if arn.service != "geo" {
                return Err(ServiceError::InvalidArea);
            }
            ExclusionArea::GeofenceRef(arn)
        };
        avoid.push(resolved);
    }

    Ok(RouteRequest {
        origin: Point::new(body.origin[0], body.origin[1]),
        destination: Point::new(body.destination[0], body.destination[1]),
        avoid,
    })
}

/// Build the `{ "statusCode", "headers", "body" }` response envelope
/// (spec §6) from a routing outcome.
pub fn build_response(result: Result<FeatureCollection, ServiceError>) -> String {
    let mut headers = HashMap::new();
    headers.insert("Access-Control-Allow-Origin", "*");

    let envelope = match result {
        Ok(fc) => {
            headers.insert("Content-Type", "application/geo+json");
            json!({
                "statusCode": 200,
                "headers": headers,
                "body": fc.to_string(),
            })
        }
        Err(err) => {
            json!({
                "statusCode": err.status_code(),
                "headers": headers,
                "body": json!({"Error": err.message()}).to_string(),
            })
        }
    };

    envelope.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_request_with_no_avoidance() {
        let envelope = json!({
            "body": json!({
                "Origin": [-88.04, 30.69],
                "Destination": [-88.03, 30.69],
            }).to_string()
        })
        .to_string();
        let request = parse_request(&envelope).unwrap();
        assert_eq!(request.avoid.len(), 0);
    }

    #[test]
    fn circle_and_polygon_together_is_invalid() {
        let envelope = json!({
            "body": json!({
                "Origin": [-88.04, 30.69],
                "Destination": [-88.03, 30.69],
                "Avoid": {"Areas": [{"Area": {
                    "Circle": {"Center": [-88.04, 30.69], "Radius": 50.0},
                    "Polygon": [[[-88.04, 30.69], [-88.03, 30.69], [-88.03, 30.70], [-88.04, 30.69]]],
                }}]},
            }).to_string()
        })
        .to_string();
        assert!(matches!(parse_request(&envelope), Err(ServiceError::InvalidArea)));
    }

    #[test]
    fn unrecognized_arn_service_is_invalid() {
        let envelope = json!({
            "body": json!({
                "Origin": [-88.04, 30.69],
                "Destination": [-88.03, 30.69],
                "Avoid": {"Areas": [{"Area": {
                    "Arn": "arn:aws:s3:us-east-1:123456789012:bucket/my-bucket",
                }}]},
            }).to_string()
        })
        .to_string();
        assert!(matches!(parse_request(&envelope), Err(ServiceError::InvalidArea)));
    }

    #[test]
    fn error_response_carries_mapped_status_code() {
        let body = build_response(Err(ServiceError::NoRoute));
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["statusCode"], 404);
        let inner: serde_json::Value = serde_json::from_str(parsed["body"].as_str().unwrap()).unwrap();
        assert_eq!(inner["Error"], "No route found.");
    }
}
