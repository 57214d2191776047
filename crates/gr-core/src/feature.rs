//! `Feature` — a geometry plus an opaque property mapping (spec §3).

use serde_json::{Map, Value};

use crate::geometry::Geometry;

/// Opaque string→value property bag, matching GeoJSON `Feature.properties`.
pub type PropertyMap = Map<String, Value>;

/// A geometry plus its properties.
///
/// The reserved property `visibility` (default `true`) is consulted by the
/// Geometry Cleaner; everything else is opaque to the core.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: PropertyMap,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: PropertyMap) -> Self {
        Self { geometry, properties }
    }

    /// The `visibility` property, defaulting to `true` when absent or not a
    /// boolean (spec §4.3 step 1).
    pub fn visibility(&self) -> bool {
        self.properties
            .get("visibility")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Canonical serialization of `properties` used for property-equality
    /// grouping (spec §4.3 step 2, §9 "Property-bag polymorphism").
    ///
    /// Relies on `serde_json::Map`'s default `BTreeMap` backing (the
    /// `preserve_order` feature is not enabled anywhere in this workspace),
    /// which sorts keys at every nesting level on serialization.
    pub fn canonical_properties(&self) -> String {
        serde_json::to_string(&self.properties).expect("property map always serializes")
    }
}
