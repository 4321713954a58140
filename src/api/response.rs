//! Response types for the leave ledger API.
//!
//! This module defines the error response structures and the mapping from
//! [`LedgerError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::BulkMarkOutcome;

/// Response body for `POST /attendance/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkResponse {
    /// Number of entries written.
    pub succeeded: usize,
    /// Number of entries rejected.
    pub failed: usize,
    /// One outcome per entry, in request order.
    pub results: Vec<BulkMarkOutcome>,
}

impl From<Vec<BulkMarkOutcome>> for BulkMarkResponse {
    fn from(results: Vec<BulkMarkOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid period error response.
    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::new("INVALID_PERIOD", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 404 response carrying `error`.
    pub fn not_found(error: ApiError) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            LedgerError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            err @ LedgerError::Validation { .. } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(err.to_string()))
            }
            err @ LedgerError::InvalidPeriod { .. } => {
                ApiErrorResponse::bad_request(ApiError::invalid_period(err.to_string()))
            }
            LedgerError::EmployeeNotFound { employee_id } => {
                ApiErrorResponse::not_found(ApiError::with_details(
                    "EMPLOYEE_NOT_FOUND",
                    format!("Employee not found: {}", employee_id),
                    "No employee with this id exists in the directory",
                ))
            }
            err @ LedgerError::MarkNotFound { .. } => {
                ApiErrorResponse::not_found(ApiError::new("MARK_NOT_FOUND", err.to_string()))
            }
            LedgerError::Storage { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "STORAGE_ERROR",
                    "Storage operation failed; no changes were applied to the ledger",
                    message,
                ),
            },
        }
    }
}
