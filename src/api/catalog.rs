//! Catalog CSV upload client.
//!
//! Packages the present CSV blobs as multipart file parts and submits them
//! to the catalog endpoint. Full ingestions replace the catalog (`PUT`),
//! delta ingestions update it (`PATCH`). The service answers with a task id
//! that can be used to track the ingestion.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;

use crate::api::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::logs::{log_info, log_success};
use crate::models::IngestionType;
use crate::payload::{CsvPayload, GROUPS_FILE_NAME, ITEMS_FILE_NAME, VARIATIONS_FILE_NAME};

/// Options for one upload request.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Index key identifying the catalog, sent as the `key` query param.
    pub api_key: String,
    /// Secret token, sent via HTTP basic auth.
    pub api_token: String,
    /// Chooses the full-replace vs. incremental-update verb.
    pub ingestion_type: IngestionType,
    /// Process the ingestion even if the service flags it as destructive.
    pub force: bool,
    /// Email notified when the ingestion finishes.
    pub notification_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngestResponse {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    task_status_path: Option<String>,
}

/// Upload the CSV payload to the catalog service.
///
/// Returns the created task id, or an error when the request fails or the
/// response carries no task id.
pub async fn ingest_catalog_csv(
    config: &ApiConfig,
    payload: &CsvPayload,
    options: &IngestOptions,
) -> ApiResult<String> {
    log_info("Sending request to ingest catalog CSV files.");

    let method = match options.ingestion_type {
        IngestionType::Full => Method::PUT,
        IngestionType::Delta => Method::PATCH,
    };
    let url = format!("{}/v1/catalog", config.catalog_base_url);

    let client = reqwest::Client::new();
    let mut request = client
        .request(method, &url)
        .query(&[
            ("section", "Products"),
            ("key", options.api_key.as_str()),
            ("force", if options.force { "true" } else { "false" }),
        ])
        .basic_auth(&options.api_token, None::<&str>)
        .multipart(build_form(payload)?);

    if let Some(email) = &options.notification_email {
        request = request.query(&[("notification_email", email.as_str())]);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let task_id = parse_task_id(&body)?;
    log_success(format!("Catalog ingestion task created: {}", task_id));

    Ok(task_id)
}

/// Extract the task id from a success response body.
fn parse_task_id(body: &str) -> ApiResult<String> {
    let response: IngestResponse =
        serde_json::from_str(body).map_err(|err| ApiError::InvalidResponse(err.to_string()))?;

    match response.task_id {
        Some(task_id) if !task_id.is_empty() => Ok(task_id),
        _ => Err(ApiError::MissingTaskId),
    }
}

/// Package the present blobs as named CSV file parts.
fn build_form(payload: &CsvPayload) -> ApiResult<Form> {
    let mut form = Form::new();

    for (blob, field, filename) in [
        (&payload.groups, "groups", GROUPS_FILE_NAME),
        (&payload.items, "items", ITEMS_FILE_NAME),
        (&payload.variations, "variations", VARIATIONS_FILE_NAME),
    ] {
        if let Some(csv) = blob {
            form = form.part(field, csv_part(csv, filename)?);
        }
    }

    Ok(form)
}

fn csv_part(csv: &str, filename: &'static str) -> ApiResult<Part> {
    let part = Part::text(csv.to_string())
        .file_name(filename)
        .mime_str("application/octet-stream")?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_id() {
        let task_id =
            parse_task_id(r#"{"task_id":"task-1","task_status_path":"/v1/tasks/task-1"}"#)
                .unwrap();
        assert_eq!(task_id, "task-1");
    }

    #[test]
    fn test_parse_task_id_missing() {
        assert!(matches!(
            parse_task_id(r#"{"message":"accepted"}"#),
            Err(ApiError::MissingTaskId)
        ));
        assert!(matches!(
            parse_task_id(r#"{"task_id":""}"#),
            Err(ApiError::MissingTaskId)
        ));
    }

    #[test]
    fn test_parse_task_id_invalid_body() {
        assert!(matches!(
            parse_task_id("<html>gateway timeout</html>"),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_build_form_with_partial_payload() {
        let payload = CsvPayload {
            groups: Some("parent_id,id,name\n,all,All".into()),
            items: None,
            variations: None,
        };

        // Only present blobs become parts; absent ones are skipped entirely.
        assert!(build_form(&payload).is_ok());
    }
}
