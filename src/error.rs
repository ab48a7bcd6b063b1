//! Error types for the catalog ingestion client.
//!
//! One enum per concern, with automatic conversion via `From` so `?` works
//! across boundaries:
//!
//! - [`PayloadError`] - CSV payload construction errors
//! - [`ApiError`] - Catalog API upload errors
//! - [`IngestError`] - Top-level orchestration errors

use thiserror::Error;

// =============================================================================
// Payload Errors
// =============================================================================

/// Errors while building the CSV payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Failed to serialize a JSON-valued metadata pair.
    #[error("Failed to serialize metadata value: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV writer rejected a record.
    #[error("Failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to finish the CSV blob.
    #[error("Failed to encode CSV: {0}")]
    Encode(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors from the catalog API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the catalog API.
    #[error("Catalog API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed.
    #[error("Invalid catalog API response: {0}")]
    InvalidResponse(String),

    /// The response did not include a task id.
    #[error("Catalog API response did not include a task id")]
    MissingTaskId,
}

// =============================================================================
// Ingest Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by
/// [`crate::ingestor::CatalogIngestor::ingest`]. It wraps all lower-level
/// errors and adds a variant for caller-supplied data-fetch failures.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV payload construction error.
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Catalog API error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The caller-supplied data source failed.
    #[error("Failed to obtain catalog data: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for payload construction.
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Result type for catalog API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // PayloadError -> IngestError
        let payload_err = PayloadError::Encode("broken writer".into());
        let ingest_err: IngestError = payload_err.into();
        assert!(ingest_err.to_string().contains("broken writer"));

        // ApiError -> IngestError
        let api_err = ApiError::MissingTaskId;
        let ingest_err: IngestError = api_err.into();
        assert!(ingest_err.to_string().contains("task id"));
    }

    #[test]
    fn test_status_error_format() {
        let err = ApiError::Status {
            status: 401,
            body: "invalid key".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid key"));
    }
}
