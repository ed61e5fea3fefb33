//! Append-only JSON lines store.
//!
//! Every collection is a `<collection>.jsonl` file in the data directory. One
//! line per document, written whole under a lock so concurrent inserts never
//! interleave. The directory is created on first write; if that fails the
//! store is reported as unavailable rather than failing startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{validate_collection, Document, DocumentId, DocumentStore, StoreError, StoredDocument};

const FILE_EXTENSION: &str = "jsonl";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.{FILE_EXTENSION}"))
    }

    /// Read every document in `collection`. A collection never written to is empty.
    pub async fn documents(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        validate_collection(collection)?;

        let contents = match fs::read_to_string(self.collection_path(collection)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| StoreError::Unavailable(format!("Corrupt document in {collection}: {e}")))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<DocumentId, StoreError> {
        validate_collection(collection)?;

        let doc = StoredDocument::new(collection, record);
        let mut line = serde_json::to_vec(&doc).map_err(|e| StoreError::write(collection, e))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.root).await.map_err(|e| {
            StoreError::Unavailable(format!(
                "Cannot open data directory '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        let path = self.collection_path(collection);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::write(collection, e))?;
        file.write_all(&line)
            .await
            .map_err(|e| StoreError::write(collection, e))?;
        file.flush().await.map_err(|e| StoreError::write(collection, e))?;

        tracing::debug!(collection, id = %doc.id, path = %path.display(), "Document appended");
        Ok(doc.id)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/data"));

        let id = store
            .insert("contact", record(json!({"name": "Ada", "email": "ada@example.com"})))
            .await
            .unwrap();

        assert!(dir.path().join("nested/data/contact.jsonl").exists());
        let docs = store.documents("contact").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(
            docs[0].record,
            record(json!({"name": "Ada", "email": "ada@example.com"}))
        );
    }

    #[tokio::test]
    async fn test_appends_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for n in 0..3 {
            store.insert("heartbeat", record(json!({"n": n}))).await.unwrap();
        }

        let docs = store.documents("heartbeat").await.unwrap();
        let ns: Vec<_> = docs.iter().map(|d| d.record["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_write_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let tasks: Vec<_> = (0..20)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert("contact", record(json!({"message": "x".repeat(512), "n": n})))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.documents("contact").await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_unwritable_root_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = FileStore::new(&blocker);
        let err = store.insert("contact", Document::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.to_string().starts_with("Cannot open data directory"));
    }

    #[tokio::test]
    async fn test_unwritten_collection_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.documents("contact").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.insert("../escape", Document::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
