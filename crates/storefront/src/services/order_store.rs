//! Local fallback order store.
//!
//! A single JSON file holding a map of key to stored orders; orders live under
//! [`ORDERS_KEY`]. A missing or empty file reads as an empty map. Writes go to
//! a sibling temp file that is then renamed over the original.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use fitplan_core::{Order, StoredOrder};

/// Key the order list is stored under.
pub const ORDERS_KEY: &str = "orders";

type Document = BTreeMap<String, Vec<StoredOrder>>;

/// Errors reading or writing the local store.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a valid order file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed order list.
///
/// Clones share one lock, so concurrent appends from different sessions
/// never interleave their read-modify-write.
#[derive(Debug, Clone)]
pub struct FileOrderStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileOrderStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<StoredOrder>, LocalStoreError> {
        let _guard = self.lock.lock().await;
        let mut document = read_document(&self.path).await?;
        Ok(document.remove(ORDERS_KEY).unwrap_or_default())
    }

    /// Append an order with a fresh identifier and timestamp.
    ///
    /// # Errors
    ///
    /// Returns error if the existing file is unreadable or the new file
    /// cannot be written. The file is left untouched on failure.
    #[instrument(skip(self, order), fields(path = %self.path.display()))]
    pub async fn append(&self, order: Order) -> Result<StoredOrder, LocalStoreError> {
        let _guard = self.lock.lock().await;

        let mut document = read_document(&self.path).await?;
        let stored = StoredOrder::new(order, Utc::now());
        let orders = document.entry(ORDERS_KEY.to_string()).or_default();
        orders.push(stored.clone());
        debug!(count = orders.len(), order_id = %stored.order_id, "Appending local order");

        write_document(&self.path, &document).await?;
        Ok(stored)
    }

    /// Whether the store can currently be read.
    pub async fn is_readable(&self) -> bool {
        self.list().await.is_ok()
    }
}

async fn read_document(path: &Path) -> Result<Document, LocalStoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(source) => {
            return Err(LocalStoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }

    serde_json::from_slice(&bytes).map_err(|source| LocalStoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_document(path: &Path, document: &Document) -> Result<(), LocalStoreError> {
    let io_err = |source| LocalStoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let json = serde_json::to_vec_pretty(document).map_err(|source| LocalStoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await.map_err(io_err)?;
    fs::rename(&tmp, path).await.map_err(io_err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use fitplan_core::intake::{self, IntakeDraft};
    use fitplan_core::{Category, catalog};
    use tempfile::tempdir;

    pub(crate) fn sample_order() -> Order {
        let draft = IntakeDraft {
            name: "Meera".to_string(),
            age: "29".to_string(),
            gender: "female".to_string(),
            height: "162".to_string(),
            weight: "58".to_string(),
            goal_get_toned: true,
            activity_level: "lightly-active".to_string(),
            ..IntakeDraft::default()
        };
        let intake = intake::parse(Category::Workout, &draft).unwrap();
        let selection = catalog::select(Category::Workout, "full-body").unwrap();
        Order::new(&selection, intake, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let temp = tempdir().unwrap();
        let store = FileOrderStore::new(temp.path().join("orders.json"));

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.is_readable().await);
    }

    #[tokio::test]
    async fn test_append_creates_file_and_keeps_order() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/orders.json");
        let store = FileOrderStore::new(&path);

        let first = store.append(sample_order()).await.unwrap();
        let second = store.append(sample_order()).await.unwrap();
        assert_ne!(first.order_id, second.order_id);

        let orders = store.list().await.unwrap();
        assert_eq!(orders, vec![first, second]);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[ORDERS_KEY].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_other_keys_are_preserved() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("orders.json");
        std::fs::write(&path, r#"{"archived": []}"#).unwrap();

        let store = FileOrderStore::new(&path);
        store.append(sample_order()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.get("archived").is_some());
        assert_eq!(raw[ORDERS_KEY].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_and_not_overwritten() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("orders.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileOrderStore::new(&path);
        assert!(matches!(
            store.append(sample_order()).await,
            Err(LocalStoreError::Corrupt { .. })
        ));
        assert!(!store.is_readable().await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let temp = tempdir().unwrap();
        let store = FileOrderStore::new(temp.path().join("orders.json"));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.append(sample_order()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 8);
    }
}
