//! Body extractor that deserializes and validates before the handler runs.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldError};
use crate::model::Validate;

/// JSON body that has passed both deserialization and [`Validate`].
///
/// A request without a `Content-Type` header is still read as JSON; any other
/// non-JSON content type is rejected. Every failure is a 422, so handlers only
/// ever see valid input.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if req.headers().contains_key(CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        } else {
            let body = Bytes::from_request(req, state).await.map_err(|rejection| {
                AppError::Validation(vec![FieldError::body(
                    "body_unreadable",
                    rejection.body_text(),
                )])
            })?;
            parse_untyped_body(&body)?
        };

        value.validate().map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

/// Deserialize a body that arrived without a content type.
fn parse_untyped_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        let kind = if e.is_data() { "value_error" } else { "json_invalid" };
        AppError::Validation(vec![FieldError::body(kind, e.to_string())])
    })
}
