//! Contact form submission.
//!
//! The body is validated by [`ValidJson`] before the handler runs; a rejected
//! submission never reaches the store. Store failures become a 500 carrying the
//! store's error text. Nothing is retried.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::config::CONTACT_COLLECTION;
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::model::ContactMessage;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

/// Handler for `POST /contact`
#[instrument(name = "contact::submit", skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ValidJson(message): ValidJson<ContactMessage>,
) -> Result<Json<Ack>, AppError> {
    let source = message.source.clone();
    let id = state
        .store
        .insert(CONTACT_COLLECTION, message.into_record())
        .await?;

    tracing::info!(%id, source = source.as_deref().unwrap_or("-"), "Contact message stored");

    Ok(Json(Ack { status: "ok" }))
}
