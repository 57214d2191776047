//! ARN parsing for geofence-reference exclusion areas (spec §6, §C).
//!
//! Mirrors `lambda_handler.py::parse_arn`: an AWS-style
//! `arn:partition:service:region:account:resource[/type|:type]` string,
//! plus an optional `#<entry-id>` suffix identifying one entry within the
//! referenced geofence collection.

use std::fmt;

/// A parsed `Arn` reference, e.g.
/// `arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet#entry-7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account: String,
    pub resource_type: Option<String>,
    pub resource: String,
    /// The `#<entry-id>` suffix, if present.
    pub entry_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ArnParseError {
    #[error("malformed ARN (expected at least 6 colon-separated elements): {0}")]
    TooFewElements(String),
}

impl Arn {
    /// The ARN without its `#<entry-id>` suffix — the key used to group
    /// geofence-catalog prefetch requests (spec §C "Geofence pre-fetch
    /// batching").
    pub fn without_entry(&self) -> String {
        let resource = match &self.resource_type {
            Some(t) => format!("{}/{}", t, self.resource),
            None => self.resource.clone(),
        };
        format!(
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, resource
        )
    }

    pub fn parse(input: &str) -> Result<Arn, ArnParseError> {
        let (body, entry_id) = match input.split_once('#') {
            Some((body, id)) => (body, Some(id.to_string())),
            None => (input, None),
        };

        let elements: Vec<&str> = body.splitn(6, ':').collect();
        if elements.len() < 6 {
            return Err(ArnParseError::TooFewElements(input.to_string()));
        }

        let mut resource = elements[5].to_string();
        let mut resource_type = None;
        if let Some((t, r)) = resource.split_once('/') {
            resource_type = Some(t.to_string());
            resource = r.to_string();
        } else if let Some((t, r)) = resource.split_once(':') {
            resource_type = Some(t.to_string());
            resource = r.to_string();
        }

        Ok(Arn {
            partition: elements[1].to_string(),
            service: elements[2].to_string(),
            region: elements[3].to_string(),
            account: elements[4].to_string(),
            resource_type,
            resource,
            entry_id,
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.without_entry())?;
        if let Some(id) = &self.entry_id {
            write!(f, "#{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_geofence_collection_resource_with_entry() {
        let arn = Arn::parse("arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet#entry-7").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "geo");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource_type.as_deref(), Some("geofence-collection"));
        assert_eq!(arn.resource, "Fleet");
        assert_eq!(arn.entry_id.as_deref(), Some("entry-7"));
    }

    #[test]
    fn parses_without_entry_id() {
        let arn = Arn::parse("arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet").unwrap();
        assert_eq!(arn.entry_id, None);
        assert_eq!(arn.without_entry(), "arn:aws:geo:us-east-1:123456789012:geofence-collection/Fleet");
    }

    #[test]
    fn rejects_too_few_elements() {
        assert!(Arn::parse("arn:aws:geo").is_err());
    }
}
