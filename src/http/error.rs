//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::validation::FieldErrors;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation messages, when the failure is field-level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// Application error type for HTTP handlers.
///
/// Every validation-class failure is detected before any mutation is
/// attempted; persistence failures surface after the store has rolled the
/// in-flight transaction back.
#[derive(Debug)]
pub enum AppError {
    /// Create payload is missing one or more required fields
    MissingFields(Vec<String>),
    /// Update payload carries no recognized data
    EmptyPayload,
    /// Per-field schema validation failed
    Validation(FieldErrors),
    /// Natural-key duplicate detected before or during the write
    Duplicate(String),
    /// Resource not found
    NotFound(String),
    /// Malformed request outside the field-level taxonomy
    BadRequest(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    "MISSING_FIELDS",
                    format!("Missing required fields: {}", fields.join(", ")),
                ),
            ),
            AppError::EmptyPayload => (
                StatusCode::BAD_REQUEST,
                ApiError::new("EMPTY_PAYLOAD", "No data provided"),
            ),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("VALIDATION_ERROR", "Payload validation failed")
                    .with_fields(fields),
            ),
            AppError::Duplicate(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("DUPLICATE", msg))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Repository(e) => {
                if e.is_not_found() {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string()))
                } else if e.is_duplicate() {
                    (StatusCode::BAD_REQUEST, ApiError::new("DUPLICATE", e.to_string()))
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("PERSISTENCE_ERROR", e.to_string()),
                    )
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_missing_fields_is_bad_request() {
        let response = AppError::MissingFields(vec!["name".to_string(), "bio".to_string()])
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let response =
            AppError::Repository(RepositoryError::not_found("Doctor 9 not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_duplicate_maps_to_400() {
        let response =
            AppError::Repository(RepositoryError::duplicate("kmpdc K1 taken")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_repository_errors_map_to_500() {
        let response =
            AppError::Repository(RepositoryError::connection("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
