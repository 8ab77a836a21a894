//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and the mapping
//! from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing-credentials error response.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new("UNAUTHENTICATED", message)
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
    /// Creates an error response with the given status and body.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, code) = match &error {
            EngineError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            EngineError::InvalidStateTransition { .. } => (StatusCode::CONFLICT, "INVALID_STATE"),
            EngineError::RunAlreadyExists { .. } => (StatusCode::CONFLICT, "RUN_EXISTS"),
            EngineError::DuplicatePendingChange { .. } => {
                (StatusCode::CONFLICT, "DUPLICATE_PENDING_CHANGE")
            }
            EngineError::RuleImmutable { .. } => (StatusCode::CONFLICT, "RULE_IMMUTABLE"),
            EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EngineError::MissingCompensation { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_COMPENSATION")
            }
            EngineError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            EngineError::RuleConfiguration { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "RULE_CONFIGURATION")
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParse { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
        };

        ApiErrorResponse {
            status,
            error: ApiError::new(code, error.to_string()),
        }
    }
}
