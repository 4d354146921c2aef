use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::resume::Selection;
use crate::selection::orchestrator::GenerationError;
use crate::selection::selector::SelectionError;
use crate::selection::validator::Violation;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resume constraint config is malformed")]
    Configuration(Vec<Violation>),

    #[error("Selection failed validation")]
    SelectionInvalid {
        violations: Vec<Violation>,
        selection: Box<Selection>,
    },

    #[error("Selection request failed: {0}")]
    SelectionRequest(String),

    #[error("Selection parse error: {reason}")]
    SelectionParse { reason: String, raw: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::InvalidUser(_) => AppError::Validation(err.to_string()),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::EmptyJobDescription => AppError::Validation(err.to_string()),
            SelectionError::Request(e) => AppError::SelectionRequest(e.to_string()),
            SelectionError::Parse { reason, raw } => AppError::SelectionParse { reason, raw },
            SelectionError::Serialize(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Configuration(violations) => AppError::Configuration(violations),
            GenerationError::Selection(e) => e.into(),
            GenerationError::Invalid {
                violations,
                selection,
            } => AppError::SelectionInvalid {
                violations,
                selection,
            },
            GenerationError::Render(e) => AppError::Internal(e.context("Render failed")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match self {
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None)
                }
                AppError::Configuration(violations) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CONFIGURATION_ERROR",
                    "The resume's constraint config is malformed".to_string(),
                    Some(json!({ "violations": violations })),
                ),
                AppError::SelectionInvalid {
                    violations,
                    selection,
                } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SELECTION_INVALID",
                    format!(
                        "The selection broke {} constraint(s); generate again to retry",
                        violations.len()
                    ),
                    Some(json!({ "violations": violations, "selection": selection })),
                ),
                AppError::SelectionRequest(msg) => {
                    tracing::error!("Selection request error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SELECTION_REQUEST_ERROR",
                        "The text-generation service could not be reached".to_string(),
                        Some(json!({ "cause": msg })),
                    )
                }
                AppError::SelectionParse { reason, raw } => {
                    tracing::error!("Selection parse error: {reason}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SELECTION_PARSE_ERROR",
                        format!("The text-generation service returned no usable JSON: {reason}"),
                        Some(json!({ "raw_reply": raw })),
                    )
                }
                AppError::Storage(msg) => {
                    tracing::error!("Storage error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "A storage error occurred".to_string(),
                        None,
                    )
                }
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
