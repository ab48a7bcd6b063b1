//! Flattening of catalog records into flat CSV rows.
//!
//! Each record becomes one [`FlatRow`]: fixed scalar fields pass through,
//! plain string arrays are joined with `|`, and the open-ended `facets` /
//! `metadata` collections expand into dynamically named columns
//! (`facet:<key>`, `metadata:<key>`, `metadata:json:<key>`).

use serde_json::Value;

use crate::error::PayloadResult;
use crate::models::{Group, Item, KeyValue, Variation};

/// Column prefix for expanded facet pairs.
pub const FACET_PREFIX: &str = "facet";

/// Column prefix for expanded metadata pairs.
pub const METADATA_PREFIX: &str = "metadata";

/// Separator used when joining string-array values into one cell.
const ARRAY_SEPARATOR: &str = "|";

// =============================================================================
// Flat Row
// =============================================================================

/// The column -> value mapping produced from one record.
///
/// Columns keep insertion order; the column planner relies on it for the
/// first-discovery ordering of dynamic columns. An absent value (`None`)
/// renders as an empty CSV field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    cells: Vec<(String, Option<String>)>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. Re-pushing an existing column overwrites its
    /// value in place, so duplicate pair keys within one record resolve to
    /// the last occurrence.
    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// The value for a column, if the column is present and non-null.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Whether the row carries the column at all (even with a null value).
    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }
}

// =============================================================================
// Record flattening
// =============================================================================

/// Flatten one group. Groups carry no array or nested fields.
pub fn flatten_group(group: &Group) -> PayloadResult<FlatRow> {
    let mut row = FlatRow::new();
    row.push("parent_id", group.parent_id.clone());
    row.push("id", Some(group.id.clone()));
    row.push("name", Some(group.name.clone()));
    Ok(row)
}

/// Flatten one item.
pub fn flatten_item(item: &Item) -> PayloadResult<FlatRow> {
    let mut row = FlatRow::new();
    row.push("id", Some(item.id.clone()));
    row.push("item_name", Some(item.item_name.clone()));
    row.push("url", Some(item.url.clone()));
    row.push("image_url", item.image_url.clone());
    row.push("description", Some(item.description.clone()));
    push_joined(&mut row, "keywords", &item.keywords);
    push_joined(&mut row, "group_ids", &item.group_ids);
    row.push("active", Some(item.active.to_string()));
    expand_pairs(&mut row, FACET_PREFIX, &item.facets, false)?;
    expand_pairs(&mut row, METADATA_PREFIX, &item.metadata, true)?;
    Ok(row)
}

/// Flatten one variation.
pub fn flatten_variation(variation: &Variation) -> PayloadResult<FlatRow> {
    let mut row = FlatRow::new();
    row.push("variation_id", Some(variation.variation_id.clone()));
    row.push("item_id", Some(variation.item_id.clone()));
    row.push("item_name", Some(variation.item_name.clone()));
    row.push("url", variation.url.clone());
    row.push("image_url", variation.image_url.clone());
    row.push("active", Some(variation.active.to_string()));
    expand_pairs(&mut row, FACET_PREFIX, &variation.facets, false)?;
    expand_pairs(&mut row, METADATA_PREFIX, &variation.metadata, true)?;
    Ok(row)
}

/// Join a plain string-array field into one `x|y` cell.
/// Empty arrays contribute no column for the row.
fn push_joined(row: &mut FlatRow, column: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    row.push(column, Some(values.join(ARRAY_SEPARATOR)));
}

/// Expand a `facets` or `metadata` collection into dynamic columns.
///
/// Empty collections contribute nothing. JSON-valued pairs (metadata only)
/// are routed to `metadata:json:<key>` with the serialized JSON text; all
/// other pairs become `<prefix>:<key>` with the plain value.
fn expand_pairs(
    row: &mut FlatRow,
    prefix: &str,
    pairs: &[KeyValue],
    allow_json: bool,
) -> PayloadResult<()> {
    for pair in pairs {
        if allow_json && is_json_metadata_value(&pair.value) {
            let column = format!("{}:json:{}", prefix, pair.key);
            row.push(column, Some(serde_json::to_string(&pair.value)?));
            continue;
        }

        // Plain all-string arrays take the same join path as other
        // string-array fields, including empty-array elision.
        if let Value::Array(elements) = &pair.value {
            if elements.is_empty() {
                continue;
            }
            let joined = elements
                .iter()
                .map(plain_fragment)
                .collect::<Vec<_>>()
                .join(ARRAY_SEPARATOR);
            row.push(format!("{}:{}", prefix, pair.key), Some(joined));
            continue;
        }

        row.push(format!("{}:{}", prefix, pair.key), plain_cell(&pair.value));
    }
    Ok(())
}

/// Classify a metadata pair value as JSON-valued.
///
/// The value is JSON-valued iff it is not null AND (a boolean, a non-array
/// object, or an array containing at least one non-string element). Plain
/// strings, all-string arrays, nulls, and numbers pass through as plain
/// values. Facets never reach this predicate.
pub fn is_json_metadata_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) => true,
        Value::Object(_) => true,
        Value::Array(elements) => elements.iter().any(|element| !element.is_string()),
        _ => false,
    }
}

/// Render a non-array plain value. Nulls become absent cells.
fn plain_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        _ => Some(plain_fragment(value)),
    }
}

/// Render one plain scalar as cell text. Strings are unquoted; anything
/// else (numbers, and non-string shapes under facets) uses its JSON text.
fn plain_fragment(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_fixture() -> Item {
        Item {
            id: "item-id".into(),
            item_name: "item-name".into(),
            description: "item-description".into(),
            url: "item-url".into(),
            image_url: Some("item-image-url".into()),
            active: true,
            keywords: vec!["item-keyword".into()],
            group_ids: vec!["all".into(), "group-id".into()],
            metadata: vec![
                KeyValue::new("metadata-1-key", "metadata-1-value"),
                KeyValue::new("metadata-2-key", "metadata-2-value"),
            ],
            facets: vec![
                KeyValue::new("facet-1-key", "facet-1-value"),
                KeyValue::new("facet-2-key", "facet-2-value"),
            ],
        }
    }

    #[test]
    fn test_flatten_group() {
        let group = Group {
            parent_id: None,
            id: "all".into(),
            name: "All".into(),
        };

        let row = flatten_group(&group).unwrap();
        assert!(row.contains("parent_id"));
        assert_eq!(row.value("parent_id"), None);
        assert_eq!(row.value("id"), Some("all"));
        assert_eq!(row.value("name"), Some("All"));
    }

    #[test]
    fn test_flatten_item_joins_arrays_and_expands_pairs() {
        let row = flatten_item(&item_fixture()).unwrap();

        assert_eq!(row.value("group_ids"), Some("all|group-id"));
        assert_eq!(row.value("keywords"), Some("item-keyword"));
        assert_eq!(row.value("active"), Some("true"));
        assert_eq!(row.value("facet:facet-1-key"), Some("facet-1-value"));
        assert_eq!(row.value("metadata:metadata-2-key"), Some("metadata-2-value"));
    }

    #[test]
    fn test_flatten_item_empty_arrays_contribute_nothing() {
        let mut item = item_fixture();
        item.keywords.clear();
        item.group_ids.clear();
        item.metadata.clear();
        item.facets.clear();

        let row = flatten_item(&item).unwrap();
        assert!(!row.contains("keywords"));
        assert!(!row.contains("group_ids"));
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(
            columns,
            vec!["id", "item_name", "url", "image_url", "description", "active"]
        );
    }

    #[test]
    fn test_flatten_item_null_scalar_keeps_column() {
        let mut item = item_fixture();
        item.image_url = None;

        let row = flatten_item(&item).unwrap();
        assert!(row.contains("image_url"));
        assert_eq!(row.value("image_url"), None);
    }

    #[test]
    fn test_json_metadata_routed_to_json_column() {
        let mut item = item_fixture();
        item.metadata = vec![KeyValue::new("extra", json!({ "a": 1 }))];

        let row = flatten_item(&item).unwrap();
        assert!(!row.contains("metadata:extra"));
        assert_eq!(row.value("metadata:json:extra"), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_string_array_metadata_is_joined_not_json() {
        let mut item = item_fixture();
        item.metadata = vec![KeyValue::new("tags", json!(["just", "strings"]))];

        let row = flatten_item(&item).unwrap();
        assert_eq!(row.value("metadata:tags"), Some("just|strings"));
        assert!(!row.contains("metadata:json:tags"));
    }

    #[test]
    fn test_empty_array_metadata_contributes_nothing() {
        let mut item = item_fixture();
        item.metadata = vec![KeyValue::new("tags", json!([]))];

        let row = flatten_item(&item).unwrap();
        assert!(!row.contains("metadata:tags"));
        assert!(!row.contains("metadata:json:tags"));
    }

    #[test]
    fn test_null_metadata_keeps_plain_column_with_empty_cell() {
        let mut item = item_fixture();
        item.metadata = vec![KeyValue::new("gone", json!(null))];

        let row = flatten_item(&item).unwrap();
        assert!(row.contains("metadata:gone"));
        assert_eq!(row.value("metadata:gone"), None);
    }

    #[test]
    fn test_facets_are_never_json() {
        let mut item = item_fixture();
        item.facets = vec![KeyValue::new("flag", json!(true))];

        let row = flatten_item(&item).unwrap();
        assert!(!row.contains("facet:json:flag"));
        assert_eq!(row.value("facet:flag"), Some("true"));
    }

    #[test]
    fn test_flatten_variation() {
        let variation = Variation {
            variation_id: "variation-id".into(),
            item_id: "item-id".into(),
            item_name: "variation-item-name".into(),
            url: Some("variation-url".into()),
            image_url: Some("variation-image-url".into()),
            active: true,
            metadata: vec![],
            facets: vec![KeyValue::new("color", "red")],
        };

        let row = flatten_variation(&variation).unwrap();
        assert_eq!(row.value("variation_id"), Some("variation-id"));
        assert_eq!(row.value("facet:color"), Some("red"));
    }

    #[test]
    fn test_duplicate_pair_keys_resolve_to_last() {
        let mut item = item_fixture();
        item.metadata = vec![
            KeyValue::new("dup", "first"),
            KeyValue::new("dup", "second"),
        ];

        let row = flatten_item(&item).unwrap();
        assert_eq!(row.value("metadata:dup"), Some("second"));
        assert_eq!(row.columns().filter(|c| *c == "metadata:dup").count(), 1);
    }

    #[test]
    fn test_is_json_metadata_value() {
        // Plain values
        assert!(!is_json_metadata_value(&json!("string")));
        assert!(!is_json_metadata_value(&json!(["string", "string2"])));
        assert!(!is_json_metadata_value(&json!(null)));
        assert!(!is_json_metadata_value(&json!(10)));

        // JSON values
        assert!(is_json_metadata_value(&json!(true)));
        assert!(is_json_metadata_value(&json!(false)));
        assert!(is_json_metadata_value(&json!({})));
        assert!(is_json_metadata_value(&json!({ "object": true })));
        assert!(is_json_metadata_value(&json!(["string", 10, false])));
    }
}
