//! Error types and their HTTP representation.
//!
//! Handlers return `Result<_, AppError>`; this is the only place where error
//! kinds are mapped to status codes and JSON bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::store::StoreError;

/// One entry in a 422 response's `detail` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    /// Error located at a named body field.
    pub fn new(field: &str, kind: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
        }
    }

    /// Error about the body as a whole.
    pub fn body(kind: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            loc: vec!["body".to_string()],
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "value_error",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_unreadable",
        };
        AppError::Validation(vec![FieldError::body(kind, rejection.body_text())])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!(?errors, "Rejected request body");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors })))
                    .into_response()
            }
            AppError::Persistence(err) => {
                tracing::error!(error = %err, "Persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
