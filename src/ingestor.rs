//! The catalog ingestor: fetch data, build CSVs, upload, report.

use std::error::Error;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::api::{create_ingestion_event, ingest_catalog_csv, ApiConfig, IngestOptions};
use crate::api::events::IngestionEvent;
use crate::error::{IngestError, IngestResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{CatalogPayload, RecordCounts};
use crate::payload::build_csv_payload;

/// Error type callers may return from their data source.
pub type SourceError = Box<dyn Error + Send + Sync>;

/// Options for constructing a [`CatalogIngestor`].
#[derive(Debug, Clone)]
pub struct IngestorOptions {
    /// Index key identifying the catalog.
    pub api_key: String,
    /// Secret API token.
    pub api_token: String,
    /// Connection id used for ingestion-event reporting. When absent, event
    /// creation is skipped.
    pub connection_id: Option<String>,
    /// Email notified when the ingestion finishes.
    pub notification_email: Option<String>,
    /// Process the ingestion even if the service flags it as destructive.
    /// Defaults to `true`.
    pub force: bool,
}

impl IngestorOptions {
    pub fn new(api_key: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_token: api_token.into(),
            connection_id: None,
            notification_email: None,
            force: true,
        }
    }

    pub fn with_connection_id(mut self, connection_id: impl Into<String>) -> Self {
        self.connection_id = Some(connection_id.into());
        self
    }

    pub fn with_notification_email(mut self, email: impl Into<String>) -> Self {
        self.notification_email = Some(email.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// The result of a completed ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Task id created by the catalog service.
    pub task_id: String,
    /// Per-kind record counts of the ingested catalog.
    pub counts: RecordCounts,
    /// Wall-clock time of the whole ingestion.
    pub elapsed: Duration,
}

/// Performs catalog data ingestions.
pub struct CatalogIngestor {
    options: IngestorOptions,
    config: ApiConfig,
}

impl CatalogIngestor {
    /// Create an ingestor with API endpoints taken from the environment.
    pub fn new(options: IngestorOptions) -> Self {
        Self::with_config(options, ApiConfig::from_env())
    }

    /// Create an ingestor with an explicit API config.
    pub fn with_config(options: IngestorOptions, config: ApiConfig) -> Self {
        Self { options, config }
    }

    /// The options this ingestor was created with.
    pub fn options(&self) -> &IngestorOptions {
        &self.options
    }

    /// Perform a catalog data ingestion.
    ///
    /// `get_data` fetches the data to be ingested. It is generally advised
    /// to execute everything you need inside it, since that allows failures
    /// to be reported as ingestion events and timed precisely.
    ///
    /// Every attempt, successful or not, is reported to the events side
    /// channel (unless no connection id is configured); reporting never
    /// changes the returned result.
    pub async fn ingest<F, Fut>(&self, get_data: F) -> IngestResult<IngestOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CatalogPayload, SourceError>>,
    {
        let started = Instant::now();

        log_info("Fetching catalog data...");
        let payload = match get_data().await {
            Ok(payload) => payload,
            Err(err) => {
                self.report(IngestionEvent::failed(
                    RecordCounts::default(),
                    elapsed_ms(started),
                ))
                .await;
                return Err(IngestError::Source(err));
            }
        };

        let counts = payload.data.counts();
        log_success(format!(
            "Catalog data fetched ({} groups, {} items, {} variations).",
            counts.groups, counts.items, counts.variations
        ));

        log_info("Building CSV payload...");
        let csv_payload = match build_csv_payload(&payload.data) {
            Ok(csv_payload) => csv_payload,
            Err(err) => {
                self.report(IngestionEvent::failed(counts, elapsed_ms(started)))
                    .await;
                return Err(err.into());
            }
        };

        let upload_options = IngestOptions {
            api_key: self.options.api_key.clone(),
            api_token: self.options.api_token.clone(),
            ingestion_type: payload.ingestion_type,
            force: self.options.force,
            notification_email: self.options.notification_email.clone(),
        };

        match ingest_catalog_csv(&self.config, &csv_payload, &upload_options).await {
            Ok(task_id) => {
                let elapsed = started.elapsed();
                self.report(IngestionEvent::succeeded(
                    task_id.clone(),
                    counts,
                    elapsed.as_millis() as u64,
                ))
                .await;

                Ok(IngestOutcome {
                    task_id,
                    counts,
                    elapsed,
                })
            }
            Err(err) => {
                self.report(IngestionEvent::failed(counts, elapsed_ms(started)))
                    .await;
                Err(err.into())
            }
        }
    }

    /// Report an ingestion event, skipping with a warning when no connection
    /// id is configured.
    async fn report(&self, event: IngestionEvent) {
        match &self.options.connection_id {
            Some(connection_id) => {
                create_ingestion_event(&self.config, connection_id, &event).await;
            }
            None => {
                log_warning(
                    "The connection id is not provided. Skipping ingestion event creation.",
                );
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
