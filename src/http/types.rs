//! HTTP API request/response types

use serde::{Deserialize, Serialize};

use crate::types::{DocPreview, IngestReport, LabeledResults};

/// Query string parameters for the search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// The query text
    pub q: Option<String>,
    /// Result count override
    pub limit: Option<usize>,
}

/// Response to a successful ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    /// Human-readable outcome summary
    pub status: String,
    pub index: String,
    pub success_count: usize,
    pub error_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_error: Option<String>,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            status: format!(
                "Index '{}' rebuilt with {} documents ingested successfully",
                report.index, report.success_count
            ),
            index: report.index,
            success_count: report.success_count,
            error_count: report.error_count,
            sample_error: report.sample_error,
        }
    }
}

/// Response to the fan-out search across all indices
#[derive(Debug, Clone, Serialize)]
pub struct SearchAllResponse {
    pub query: String,
    pub groups: Vec<LabeledResults>,
}

/// Per-index row in the content diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub source: String,
    pub label: String,
    pub index: String,
    /// Document count, absent when the index has not been built yet
    pub documents: Option<u64>,
    pub sample_titles: Vec<String>,
}

/// Response for `GET /check_content`
#[derive(Debug, Clone, Serialize)]
pub struct CheckContentResponse {
    pub indices: Vec<IndexStatus>,
}

/// Response for `GET /debug_cfa`
#[derive(Debug, Clone, Serialize)]
pub struct DebugIndexResponse {
    pub index: String,
    pub documents: u64,
    pub sample: Vec<DocPreview>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
