//! Order submission with local fallback.
//!
//! Every order is offered to the remote document store first. If that store
//! is not configured or the write fails for any reason, the order is appended
//! to the local file instead. Only a failure of both is an error.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use fitplan_core::{Order, OrderId, StoredOrder};

use super::document_store::{DocumentStoreClient, RemoteStoreError};
use super::order_store::{FileOrderStore, LocalStoreError};

/// Primary order destination.
pub trait RemoteOrderStore: Send + Sync {
    /// Write an order, returning the store's identifier if it reports one.
    fn insert(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<Option<String>, RemoteStoreError>> + Send;
}

/// Fallback order destination.
pub trait LocalOrderStore: Send + Sync {
    /// Append an order, assigning it a local identifier and timestamp.
    fn append(
        &self,
        order: Order,
    ) -> impl Future<Output = Result<StoredOrder, LocalStoreError>> + Send;
}

impl RemoteOrderStore for DocumentStoreClient {
    async fn insert(&self, order: &Order) -> Result<Option<String>, RemoteStoreError> {
        self.insert_order(order).await
    }
}

impl LocalOrderStore for FileOrderStore {
    async fn append(&self, order: Order) -> Result<StoredOrder, LocalStoreError> {
        Self::append(self, order).await
    }
}

/// Where an order ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Accepted by the document store.
    Remote { document_id: Option<String> },
    /// Saved to the local fallback file.
    Local { order_id: OrderId },
}

impl SubmissionOutcome {
    /// Reference shown to the customer, when there is one.
    #[must_use]
    pub fn reference(&self) -> Option<String> {
        match self {
            Self::Remote { document_id } => document_id.clone(),
            Self::Local { order_id } => Some(order_id.to_string()),
        }
    }
}

/// Neither store accepted the order.
#[derive(Debug, Error)]
#[error("order could not be stored (remote: {remote}; local: {local})")]
pub struct SubmissionError {
    /// Why the remote store was skipped or failed.
    pub remote: String,
    /// Why the local append failed.
    #[source]
    pub local: LocalStoreError,
}

/// Submits orders to the remote store, falling back to the local one.
#[derive(Debug, Clone)]
pub struct OrderSubmitter<R, L> {
    remote: Option<R>,
    local: L,
}

impl<R: RemoteOrderStore, L: LocalOrderStore> OrderSubmitter<R, L> {
    #[must_use]
    pub const fn new(remote: Option<R>, local: L) -> Self {
        Self { remote, local }
    }

    /// Whether a remote store is configured at all.
    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    #[must_use]
    pub const fn local(&self) -> &L {
        &self.local
    }

    /// Store an order.
    ///
    /// A remote failure is logged and absorbed; the returned outcome says
    /// which store took the order.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError`] only when the local fallback also fails.
    #[instrument(skip(self, order), fields(category = %order.category, plan = %order.plan))]
    pub async fn submit(&self, order: Order) -> Result<SubmissionOutcome, SubmissionError> {
        let remote = match &self.remote {
            Some(store) => match store.insert(&order).await {
                Ok(document_id) => {
                    info!(document_id = ?document_id, "Order stored remotely");
                    return Ok(SubmissionOutcome::Remote { document_id });
                }
                Err(e) => {
                    warn!(error = %e, "Remote order store unavailable, falling back to local");
                    e.to_string()
                }
            },
            None => {
                debug!("Remote order store not configured");
                "not configured".to_string()
            }
        };

        match self.local.append(order).await {
            Ok(stored) => {
                info!(order_id = %stored.order_id, "Order stored locally");
                Ok(SubmissionOutcome::Local {
                    order_id: stored.order_id,
                })
            }
            Err(local) => {
                error!(remote = %remote, error = %local, "Order could not be stored");
                Err(SubmissionError { remote, local })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::services::order_store::tests::sample_order;

    #[derive(Default)]
    struct FakeRemote {
        fail: bool,
        calls: AtomicUsize,
    }

    impl RemoteOrderStore for FakeRemote {
        async fn insert(&self, _order: &Order) -> Result<Option<String>, RemoteStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(RemoteStoreError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(Some("doc-1".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct FakeLocal {
        fail: bool,
        orders: Mutex<Vec<StoredOrder>>,
    }

    impl LocalOrderStore for FakeLocal {
        async fn append(&self, order: Order) -> Result<StoredOrder, LocalStoreError> {
            if self.fail {
                return Err(LocalStoreError::Io {
                    path: PathBuf::from("orders.json"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            let stored = StoredOrder::new(order, Utc::now());
            self.orders.lock().unwrap().push(stored.clone());
            Ok(stored)
        }
    }

    #[tokio::test]
    async fn test_remote_success_skips_local() {
        let submitter = OrderSubmitter::new(Some(FakeRemote::default()), FakeLocal::default());

        let outcome = submitter.submit(sample_order()).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Remote {
            document_id: Some("doc-1".to_string())
        });
        assert!(submitter.local().orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_writes_exactly_one_local_order() {
        let remote = FakeRemote {
            fail: true,
            ..FakeRemote::default()
        };
        let submitter = OrderSubmitter::new(Some(remote), FakeLocal::default());

        let outcome = submitter.submit(sample_order()).await.unwrap();
        let orders = submitter.local().orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 1);
        assert_eq!(outcome, SubmissionOutcome::Local {
            order_id: orders[0].order_id
        });
        assert!(!orders[0].timestamp.is_empty());
        assert_eq!(submitter.remote.as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_remote_goes_straight_to_local() {
        let submitter: OrderSubmitter<FakeRemote, _> =
            OrderSubmitter::new(None, FakeLocal::default());
        assert!(!submitter.has_remote());

        let outcome = submitter.submit(sample_order()).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Local { .. }));
        assert!(outcome.reference().is_some());
    }

    #[tokio::test]
    async fn test_total_failure_reports_both_causes() {
        let remote = FakeRemote {
            fail: true,
            ..FakeRemote::default()
        };
        let local = FakeLocal {
            fail: true,
            ..FakeLocal::default()
        };
        let submitter = OrderSubmitter::new(Some(remote), local);

        let err = submitter.submit(sample_order()).await.unwrap_err();
        assert!(err.remote.contains("503"));
        assert!(matches!(err.local, LocalStoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_file_store_fallback() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileOrderStore::new(temp.path().join("orders.json"));
        let remote = FakeRemote {
            fail: true,
            ..FakeRemote::default()
        };
        let submitter = OrderSubmitter::new(Some(remote), store.clone());

        submitter.submit(sample_order()).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
