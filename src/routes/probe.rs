//! Database connectivity probe.
//!
//! Writes a heartbeat record and reports the outcome in the body. The HTTP
//! status is always 200; a store failure is diagnostic data, not an error.
//! Every call appends one heartbeat document and nothing removes them.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::config::{HEARTBEAT_COLLECTION, PROBE_ERROR_MAX_CHARS};
use crate::model::HeartbeatRecord;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub backend: &'static str,
    pub database: String,
}

/// Handler for `GET /test`
#[instrument(name = "probe::test_database", skip_all)]
pub async fn test_database(State(state): State<AppState>) -> Json<ProbeReport> {
    let database = match state
        .store
        .insert(HEARTBEAT_COLLECTION, HeartbeatRecord.into_record())
        .await
    {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(store = state.store.name(), error = %e, "Heartbeat write failed");
            format_probe_error(&e)
        }
    };

    Json(ProbeReport {
        backend: "running",
        database,
    })
}

/// `error: ` followed by at most [`PROBE_ERROR_MAX_CHARS`] characters of the
/// error description.
fn format_probe_error(err: &StoreError) -> String {
    let description: String = err.to_string().chars().take(PROBE_ERROR_MAX_CHARS).collect();
    format!("error: {description}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_error_kept_whole() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(format_probe_error(&err), "error: connection refused");
    }

    #[test]
    fn test_long_error_truncated_to_limit() {
        let err = StoreError::Unavailable("x".repeat(500));
        let formatted = format_probe_error(&err);
        assert_eq!(formatted, format!("error: {}", "x".repeat(120)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let err = StoreError::Unavailable("é".repeat(200));
        let formatted = format_probe_error(&err);
        let description = formatted.strip_prefix("error: ").unwrap();
        assert_eq!(description.chars().count(), PROBE_ERROR_MAX_CHARS);
    }
}
