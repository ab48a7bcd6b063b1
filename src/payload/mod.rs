//! CSV payload construction for catalog ingestion.
//!
//! Converts the three record collections into flat CSV blobs:
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────────┐     ┌───────────┐
//! │ CatalogData  │────▶│  Flatten   │────▶│ Plan columns │────▶│  Encode   │
//! │ (records)    │     │ (FlatRow)  │     │ (header)     │     │  (CSV)    │
//! └──────────────┘     └────────────┘     └──────────────┘     └───────────┘
//! ```
//!
//! The three conversions are independent and pure: the same input always
//! produces byte-identical blobs. An empty collection yields no blob at all
//! rather than an empty string.

pub mod columns;
pub mod encode;
pub mod flatten;

use std::fs;
use std::io;
use std::path::Path;

use crate::error::PayloadResult;
use crate::models::CatalogData;
use columns::{plan_columns, RecordKind};
use encode::encode_csv;
use flatten::{flatten_group, flatten_item, flatten_variation, FlatRow};

/// File names used when the blobs are packaged as multipart file parts or
/// written to disk.
pub const GROUPS_FILE_NAME: &str = "item_groups.csv";
pub const ITEMS_FILE_NAME: &str = "items.csv";
pub const VARIATIONS_FILE_NAME: &str = "variations.csv";

// =============================================================================
// CSV Payload
// =============================================================================

/// The catalog data converted into CSV blobs, one per record kind.
/// `None` means the input collection was empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvPayload {
    /// The input groups converted into CSV format.
    pub groups: Option<String>,

    /// The input items converted into CSV format.
    pub items: Option<String>,

    /// The input variations converted into CSV format.
    pub variations: Option<String>,
}

impl CsvPayload {
    /// Whether no blob is present at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_none() && self.items.is_none() && self.variations.is_none()
    }

    /// Write the present blobs to a directory using the conventional file
    /// names. Returns the names written.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<Vec<&'static str>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        for (blob, name) in [
            (&self.groups, GROUPS_FILE_NAME),
            (&self.items, ITEMS_FILE_NAME),
            (&self.variations, VARIATIONS_FILE_NAME),
        ] {
            if let Some(csv) = blob {
                fs::write(dir.join(name), csv)?;
                written.push(name);
            }
        }

        Ok(written)
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Build the CSV payload for a catalog ingestion.
///
/// Each record kind is converted independently; kinds with empty input
/// collections produce `None`.
pub fn build_csv_payload(data: &CatalogData) -> PayloadResult<CsvPayload> {
    Ok(CsvPayload {
        groups: to_csv(RecordKind::Groups, &data.groups, flatten_group)?,
        items: to_csv(RecordKind::Items, &data.items, flatten_item)?,
        variations: to_csv(RecordKind::Variations, &data.variations, flatten_variation)?,
    })
}

/// Convert one record collection into a CSV blob.
fn to_csv<T>(
    kind: RecordKind,
    records: &[T],
    flatten: impl Fn(&T) -> PayloadResult<FlatRow>,
) -> PayloadResult<Option<String>> {
    if records.is_empty() {
        return Ok(None);
    }

    let rows = records
        .iter()
        .map(&flatten)
        .collect::<PayloadResult<Vec<_>>>()?;
    let plan = plan_columns(kind, &rows);

    encode_csv(&plan, &rows).map(Some)
}

// =============================================================================
// Tests
// =============================================================================
