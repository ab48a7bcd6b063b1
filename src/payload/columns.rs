//! Column planning: the deterministic, ordered header for one CSV blob.
//!
//! Fixed columns come first in the record kind's canonical declared order,
//! restricted to the columns that actually appear in the batch. Dynamic
//! columns follow, facets before metadata, each group keeping the order in
//! which its columns were first discovered across the batch.

use std::collections::HashSet;

use crate::payload::flatten::{FlatRow, FACET_PREFIX, METADATA_PREFIX};

// =============================================================================
// Record kinds and canonical column orders
// =============================================================================

/// The three record kinds of a catalog payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Groups,
    Items,
    Variations,
}

impl RecordKind {
    /// The canonical declared order of the kind's fixed columns.
    pub fn canonical_columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Groups => &["parent_id", "id", "name"],
            RecordKind::Items => &[
                "id",
                "item_name",
                "url",
                "image_url",
                "description",
                "keywords",
                "group_ids",
                "active",
            ],
            RecordKind::Variations => &[
                "variation_id",
                "item_id",
                "item_name",
                "url",
                "image_url",
                "active",
            ],
        }
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Compute the ordered column list for a batch of flattened rows.
///
/// Every column present in any row appears exactly once. Stable: the same
/// batch always produces the same plan.
pub fn plan_columns(kind: RecordKind, rows: &[FlatRow]) -> Vec<String> {
    let facet_marker = format!("{}:", FACET_PREFIX);
    let metadata_marker = format!("{}:", METADATA_PREFIX);

    // Unique columns in first-seen order across the batch.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut common: Vec<&str> = Vec::new();
    let mut facet_columns: Vec<&str> = Vec::new();
    let mut metadata_columns: Vec<&str> = Vec::new();

    for row in rows {
        for column in row.columns() {
            if !seen.insert(column) {
                continue;
            }
            if column.starts_with(&facet_marker) {
                facet_columns.push(column);
            } else if column.starts_with(&metadata_marker) {
                metadata_columns.push(column);
            } else {
                common.push(column);
            }
        }
    }

    // A conforming flattener only emits known fixed columns.
    debug_assert!(
        common
            .iter()
            .all(|column| kind.canonical_columns().contains(column)),
        "unknown fixed column in batch"
    );

    let present: HashSet<&str> = common.into_iter().collect();

    kind.canonical_columns()
        .iter()
        .filter(|column| present.contains(**column))
        .copied()
        .chain(facet_columns)
        .chain(metadata_columns)
        .map(String::from)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
