//! Order persistence
//!
//! One [`OrderList`] per [`Scope`], stored as a JSON array of names. Two
//! production backends exist:
//!
//! | Backend | Used when | Key |
//! |---------|-----------|-----|
//! | [`LocalOrderStore`] | no authenticated session | `order:<scope>` |
//! | [`RemoteOrderStore`] | authenticated session | `<scope>` under the account |
//!
//! [`MemoryOrderStore`] is a process-local backend for tests and ephemeral runs.
//!
//! The backend is picked once, when a controller is activated, by
//! [`StoreFactory::for_session`]. A later login or logout needs a fresh activation.

mod local;
mod memory;
mod remote;

pub use local::LocalOrderStore;
pub use memory::MemoryOrderStore;
pub use remote::RemoteOrderStore;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{OrderList, Scope};

use crate::error::StoreResult;

/// Which backend a store talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Device-scoped, anonymous callers
    Local,
    /// Account-scoped, authenticated callers
    Remote,
    /// Process-local
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Remote => write!(f, "remote"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// Keyed order persistence
///
/// `load` returns `Ok(None)` only when no record was ever written (or the
/// record is unreadable); transport failures are errors.
#[async_trait]
pub trait OrderStore: Send + Sync {
    fn backend(&self) -> Backend;

    async fn load(&self, scope: Scope) -> StoreResult<Option<OrderList>>;

    /// Replace the stored order for `scope`
    async fn save(&self, scope: Scope, order: &OrderList) -> StoreResult<()>;
}

/// Authenticated account session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: String,
    pub token: String,
}

impl Session {
    pub fn new(account_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Picks the backend for a controller activation
#[derive(Clone)]
pub struct StoreFactory {
    local: Arc<dyn OrderStore>,
    remote_base_url: String,
    request_timeout: Duration,
}

impl StoreFactory {
    pub fn new(
        local: Arc<dyn OrderStore>,
        remote_base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            local,
            remote_base_url: remote_base_url.into(),
            request_timeout,
        }
    }

    /// Open the local database and build a factory from configuration
    pub fn from_config(config: &crate::Config) -> StoreResult<Self> {
        if let Some(parent) = config.db_path().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                crate::error::StoreError::Internal(format!(
                    "cannot create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let local = LocalOrderStore::open(config.db_path())?;
        Ok(Self::new(
            Arc::new(local),
            config.remote_base_url.clone(),
            config.request_timeout(),
        ))
    }

    /// Backend for the given authentication signal
    ///
    /// No session → the device-local store; a session → the account's remote store.
    pub fn for_session(&self, session: Option<&Session>) -> StoreResult<Arc<dyn OrderStore>> {
        match session {
            None => {
                tracing::debug!("No session, using local order store");
                Ok(self.local.clone())
            }
            Some(session) => {
                tracing::debug!(account_id = %session.account_id, "Using remote order store");
                let remote =
                    RemoteOrderStore::new(&self.remote_base_url, session.clone(), self.request_timeout)?;
                Ok(Arc::new(remote))
            }
        }
    }
}

/// Decode a persisted record
///
/// Corrupted or mis-shaped records are treated as "never written".
/// Duplicates are kept as stored so the controller sees that the record
/// differs from the reconciled order and rewrites it.
pub(crate) fn decode_order(scope: Scope, backend: Backend, bytes: &[u8]) -> Option<OrderList> {
    match serde_json::from_slice::<OrderList>(bytes) {
        Ok(order) => {
            if !order.is_unique() {
                tracing::warn!(%scope, %backend, "Stored order has duplicates, it will be rewritten");
            }
            Some(order)
        }
        Err(e) => {
            tracing::warn!(%scope, %backend, error = %e, "Stored order is malformed, ignoring it");
            None
        }
    }
}
