//! # catalog-ingestor - Catalog CSV ingestion client
//!
//! Converts an in-memory catalog (groups, items, variations with open-ended
//! metadata and facets) into flat CSV files, uploads them to a remote
//! catalog service, and reports an ingestion event.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CatalogData  │────▶│ CSV payload │────▶│   Upload    │────▶│   Report    │
//! │ (in memory)  │     │  (flatten)  │     │ (multipart) │     │   (event)   │
//! └──────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_ingestor::{CatalogIngestor, IngestorOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ingestor = CatalogIngestor::new(
//!         IngestorOptions::new("api-key", "api-token").with_connection_id("connection-id"),
//!     );
//!
//!     let outcome = ingestor.ingest(|| async { Ok(fetch_catalog().await?) }).await.unwrap();
//!     println!("Created ingestion task {}", outcome.task_id);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Group, Item, Variation, KeyValue)
//! - [`payload`] - CSV payload construction (flatten, plan columns, encode)
//! - [`api`] - Catalog upload and ingestion-event clients
//! - [`ingestor`] - End-to-end orchestration
//! - [`logs`] - Progress log broadcasting

// Core modules
pub mod error;
pub mod models;

// CSV payload construction
pub mod payload;

// HTTP clients
pub mod api;

// Orchestration
pub mod ingestor;

// Progress logs
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ApiError, IngestError, PayloadError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CatalogData,
    CatalogPayload,
    Group,
    IngestionType,
    Item,
    KeyValue,
    RecordCounts,
    Variation,
};

// =============================================================================
// Re-exports - Payload
// =============================================================================

pub use payload::{build_csv_payload, CsvPayload};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{create_ingestion_event, ingest_catalog_csv, ApiConfig, IngestOptions, IngestionEvent};

// =============================================================================
// Re-exports - Ingestor
// =============================================================================

pub use ingestor::{CatalogIngestor, IngestOutcome, IngestorOptions};
