//! Document store gateway.
//!
//! A single write operation over named collections of schemaless JSON records.
//! Handlers depend only on the [`DocumentStore`] trait; the concrete backend is
//! chosen from configuration at startup:
//!
//! - **none**: no database configured, every write fails as unavailable
//! - **memory**: process-local collections (development and tests)
//! - **file**: append-only JSON lines on disk, one file per collection

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{StoreBackend, StoreConfig};

pub use file::FileStore;
pub use memory::MemoryStore;

/// A schemaless record: field name to JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Identifier assigned to every stored document
pub type DocumentId = Uuid;

/// Shared handle to the configured backend
pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),

    #[error("Failed to write to collection '{collection}': {reason}")]
    Write { collection: String, reason: String },
}

impl StoreError {
    pub(crate) fn write(collection: &str, reason: impl ToString) -> Self {
        Self::Write {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A record as it sits in a collection, with the metadata added on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub collection: String,
    pub created_at: DateTime<Utc>,
    pub record: Document,
}

impl StoredDocument {
    fn new(collection: &str, record: Document) -> Self {
        Self {
            id: Uuid::new_v4(),
            collection: collection.to_string(),
            created_at: Utc::now(),
            record,
        }
    }
}

/// Durable write access to a document store.
///
/// Each call is independent and atomic only with respect to itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append `record` to `collection`, returning the new document's id.
    async fn insert(&self, collection: &str, record: Document) -> Result<DocumentId, StoreError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Backend used when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledStore;

#[async_trait]
impl DocumentStore for DisabledStore {
    async fn insert(&self, _collection: &str, _record: Document) -> Result<DocumentId, StoreError> {
        Err(StoreError::Unavailable(
            "Database not available. Set [store] backend in the configuration file".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Build the backend selected by `config`.
pub fn from_config(config: &StoreConfig) -> SharedStore {
    match config.backend {
        StoreBackend::None => Arc::new(DisabledStore),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::new(&config.path)),
    }
}

/// Collection names double as file names, so keep them to a safe alphabet.
pub(crate) fn validate_collection(collection: &str) -> Result<(), StoreError> {
    if collection.is_empty() {
        return Err(StoreError::write(collection, "collection name must not be empty"));
    }
    if !collection
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StoreError::write(
            collection,
            "collection name may only contain ASCII letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_collection() {
        assert!(validate_collection("contact").is_ok());
        assert!(validate_collection("heart_beat-2").is_ok());
        assert!(validate_collection("").is_err());
        assert!(validate_collection("../etc").is_err());
        assert!(validate_collection("a b").is_err());
    }

    #[tokio::test]
    async fn test_disabled_store_reports_unavailable() {
        let err = DisabledStore.insert("contact", Document::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().starts_with("Database not available"));
    }

    #[test]
    fn test_write_error_display() {
        let err = StoreError::write("contact", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to write to collection 'contact': disk full"
        );
    }

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = StoreConfig {
            backend: StoreBackend::None,
            path: PathBuf::from("unused"),
        };
        assert_eq!(from_config(&config).name(), "none");

        config.backend = StoreBackend::Memory;
        assert_eq!(from_config(&config).name(), "memory");

        config.backend = StoreBackend::File;
        assert_eq!(from_config(&config).name(), "file");
    }
}
