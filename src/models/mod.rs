//! Domain models for the catalog ingestion client.
//!
//! This module contains the data structures a host application hands to the
//! ingestor:
//!
//! - [`CatalogPayload`] - Full ingestion payload (type + data)
//! - [`CatalogData`] - The three record collections
//! - [`Group`] / [`Item`] / [`Variation`] - Catalog records
//! - [`KeyValue`] - Metadata/facet pairs with per-instance value shape
//! - [`IngestionType`] - Full replacement vs. incremental update

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Ingestion Type
// =============================================================================

/// How the uploaded catalog is applied on the remote side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngestionType {
    /// Full ingestion. Overrides the existing catalog.
    #[default]
    Full,
    /// Incremental ingestion. Adds new products to the existing catalog.
    Delta,
}

// =============================================================================
// Payload
// =============================================================================

/// The base payload used to ingest data into the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPayload {
    /// Ingestion type. Determines the HTTP verb used for the upload.
    #[serde(rename = "type", default)]
    pub ingestion_type: IngestionType,
    /// The record collections to ingest.
    pub data: CatalogData,
}

/// The three record collections of one catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogData {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub variations: Vec<Variation>,
}

impl CatalogData {
    /// Per-kind record counts, used for ingestion-event reporting.
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            groups: self.groups.len(),
            items: self.items.len(),
            variations: self.variations.len(),
        }
    }
}

/// Number of records per kind in one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordCounts {
    pub groups: usize,
    pub items: usize,
    pub variations: usize,
}

// =============================================================================
// Records
// =============================================================================

/// A catalog group.
///
/// Catalogs need a default root group, usually called `All`:
///
/// ```json
/// { "parent_id": null, "id": "All", "name": "All" }
/// ```
///
/// Other groups can inherit from any group, but should inherit from `All`
/// when they are defined at the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub parent_id: Option<String>,
    pub id: String,
    pub name: String,
}

/// A catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub item_name: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub keywords: Vec<String>,

    /// The group ids this item belongs to.
    /// Must be present in the `groups` collection of the same catalog.
    #[serde(default)]
    pub group_ids: Vec<String>,

    /// Open-ended metadata. Values may be plain strings, string arrays,
    /// or arbitrary JSON (objects, booleans, mixed arrays).
    #[serde(default)]
    pub metadata: Vec<KeyValue>,

    /// Facets used for filtering. Facet values are always treated as plain,
    /// never as JSON.
    #[serde(default)]
    pub facets: Vec<KeyValue>,
}

/// A variation of an item. Always points to its item via `item_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variation {
    pub variation_id: String,
    pub item_id: String,
    pub item_name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub metadata: Vec<KeyValue>,
    #[serde(default)]
    pub facets: Vec<KeyValue>,
}

// =============================================================================
// Key/Value pairs
// =============================================================================

/// One metadata or facet pair.
///
/// The value shape is open: upstream data sources deliver untyped values, so
/// classification between "plain" and "JSON-valued" happens per-instance at
/// flatten time (see [`crate::payload::flatten::is_json_metadata_value`]).
/// Two pairs with the same key on different records may differ in kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingestion_type_wire_format() {
        assert_eq!(serde_json::to_value(IngestionType::Full).unwrap(), "full");
        assert_eq!(serde_json::to_value(IngestionType::Delta).unwrap(), "delta");

        let parsed: IngestionType = serde_json::from_str("\"delta\"").unwrap();
        assert_eq!(parsed, IngestionType::Delta);
    }

    #[test]
    fn test_payload_deserialization() {
        let payload: CatalogPayload = serde_json::from_value(json!({
            "type": "full",
            "data": {
                "groups": [
                    { "parent_id": null, "id": "all", "name": "All" }
                ],
                "items": [],
                "variations": []
            }
        }))
        .unwrap();

        assert_eq!(payload.ingestion_type, IngestionType::Full);
        assert_eq!(payload.data.groups.len(), 1);
        assert_eq!(payload.data.groups[0].id, "all");
        assert!(payload.data.groups[0].parent_id.is_none());
    }

    #[test]
    fn test_key_value_accepts_arbitrary_json() {
        let item: Item = serde_json::from_value(json!({
            "id": "item-id",
            "item_name": "item-name",
            "description": "item-description",
            "url": "item-url",
            "image_url": null,
            "active": true,
            "metadata": [
                { "key": "plain", "value": "string" },
                { "key": "nested", "value": { "a": 1 } },
                { "key": "flag", "value": true }
            ]
        }))
        .unwrap();

        assert_eq!(item.metadata.len(), 3);
        assert_eq!(item.metadata[0].value, json!("string"));
        assert_eq!(item.metadata[1].value, json!({ "a": 1 }));
        assert!(item.keywords.is_empty());
        assert!(item.facets.is_empty());
    }

    #[test]
    fn test_counts() {
        let data = CatalogData {
            groups: vec![Group {
                parent_id: None,
                id: "all".into(),
                name: "All".into(),
            }],
            ..Default::default()
        };

        let counts = data.counts();
        assert_eq!(counts.groups, 1);
        assert_eq!(counts.items, 0);
        assert_eq!(counts.variations, 0);
    }
}
