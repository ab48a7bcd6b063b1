//! Ingestion-event reporting.
//!
//! Best-effort telemetry side channel: every ingestion attempt (successful
//! or not) is reported to the events service so connected integrations can
//! display ingestion history. Reporting never fails the ingestion itself;
//! any error is logged and swallowed.

use serde::Serialize;

use crate::api::config::ApiConfig;
use crate::logs::log_warning;
use crate::models::RecordCounts;

/// The outcome record reported after one ingestion attempt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestionEvent {
    /// Whether the ingestion succeeded end to end.
    pub success: bool,
    /// Task id returned by the catalog service, when the upload got that far.
    pub cio_task_id: Option<String>,
    pub count_of_groups: usize,
    pub count_of_items: usize,
    pub count_of_variations: usize,
    /// Wall-clock time of the whole ingestion.
    pub total_ingestion_time_ms: u64,
}

impl IngestionEvent {
    /// A successful outcome with the created task id.
    pub fn succeeded(task_id: String, counts: RecordCounts, elapsed_ms: u64) -> Self {
        Self {
            success: true,
            cio_task_id: Some(task_id),
            count_of_groups: counts.groups,
            count_of_items: counts.items,
            count_of_variations: counts.variations,
            total_ingestion_time_ms: elapsed_ms,
        }
    }

    /// A failed outcome. Counts are zero when the failure happened before
    /// the catalog data could be fetched.
    pub fn failed(counts: RecordCounts, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            cio_task_id: None,
            count_of_groups: counts.groups,
            count_of_items: counts.items,
            count_of_variations: counts.variations,
            total_ingestion_time_ms: elapsed_ms,
        }
    }
}

/// Report an ingestion event for a connection. Fire-and-forget: failures
/// are logged as warnings, never propagated.
pub async fn create_ingestion_event(
    config: &ApiConfig,
    connection_id: &str,
    event: &IngestionEvent,
) {
    let url = format!(
        "{}/catalog-ingestion-events/create/{}",
        config.events_base_url, connection_id
    );

    let client = reqwest::Client::new();
    let result = client
        .post(&url)
        .json(event)
        .send()
        .await
        .and_then(|response| response.error_for_status());

    if result.is_err() {
        log_warning(
            "Failed to create catalog ingestion event. Are your credentials correct?",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format() {
        let event = IngestionEvent::succeeded(
            "task-1".into(),
            RecordCounts {
                groups: 2,
                items: 1,
                variations: 1,
            },
            1500,
        );

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "success": true,
                "cioTaskId": "task-1",
                "countOfGroups": 2,
                "countOfItems": 1,
                "countOfVariations": 1,
                "totalIngestionTimeMs": 1500
            })
        );
    }

    #[test]
    fn test_failed_event_has_null_task_id() {
        let event = IngestionEvent::failed(RecordCounts::default(), 10);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["cioTaskId"], json!(null));
        assert_eq!(value["countOfGroups"], json!(0));
    }
}
