//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::session::Id;

use crate::config::StorefrontConfig;
use crate::services::{DocumentStoreClient, FileOrderStore, OrderSubmitter, RemoteStoreError};

/// Submitter wired to the production stores.
pub type Orders = OrderSubmitter<DocumentStoreClient, FileOrderStore>;

/// How long an unused checkout lock is kept.
const CHECKOUT_LOCK_IDLE: Duration = Duration::from_secs(10 * 60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the order stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    orders: Orders,
    checkout_locks: Cache<Id, Arc<Mutex<()>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote document store client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, RemoteStoreError> {
        let remote = config
            .orders
            .remote
            .as_ref()
            .map(DocumentStoreClient::new)
            .transpose()?;
        let local = FileOrderStore::new(config.orders.local_path.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                orders: OrderSubmitter::new(remote, local),
                checkout_locks: Cache::builder()
                    .max_capacity(10_000)
                    .time_to_idle(CHECKOUT_LOCK_IDLE)
                    .build(),
                config,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order submitter.
    #[must_use]
    pub fn orders(&self) -> &Orders {
        &self.inner.orders
    }

    /// Lock serializing checkout submissions for one session.
    ///
    /// Every caller with the same session id gets the same mutex while it is
    /// in use.
    pub async fn checkout_lock(&self, session_id: Id) -> Arc<Mutex<()>> {
        self.inner
            .checkout_locks
            .get_with(session_id, async { Arc::new(Mutex::new(())) })
            .await
    }
}
