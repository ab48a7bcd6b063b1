//! HTTP clients for the catalog service and the events side channel.

pub mod catalog;
pub mod config;
pub mod events;

pub use catalog::{ingest_catalog_csv, IngestOptions};
pub use config::ApiConfig;
pub use events::{create_ingestion_event, IngestionEvent};
