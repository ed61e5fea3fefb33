//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

use crate::config::LIVENESS_MESSAGE;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub message: &'static str,
}

/// Returns a fixed payload whenever the process can answer HTTP.
/// Does not touch the store.
pub async fn index() -> Json<Liveness> {
    Json(Liveness {
        message: LIVENESS_MESSAGE,
    })
}
