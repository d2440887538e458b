use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{OrderList, Scope};

use super::{Backend, OrderStore, decode_order};
use crate::error::StoreResult;

/// Process-local order store
///
/// Records are kept serialized so corrupted payloads can be planted with
/// [`MemoryOrderStore::raw_insert`] and exercise the same decode path as
/// the real backends.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    records: Arc<Mutex<HashMap<Scope, Vec<u8>>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a scope
    pub fn with_order(self, scope: Scope, order: &OrderList) -> Self {
        if let Ok(bytes) = serde_json::to_vec(order) {
            self.records.lock().insert(scope, bytes);
        }
        self
    }

    /// Store raw bytes for a scope, bypassing serialization
    pub fn raw_insert(&self, scope: Scope, bytes: impl Into<Vec<u8>>) {
        self.records.lock().insert(scope, bytes.into());
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Decoded current value, bypassing the async interface
    pub fn snapshot(&self, scope: Scope) -> Option<OrderList> {
        let records = self.records.lock();
        records
            .get(&scope)
            .and_then(|bytes| decode_order(scope, Backend::Memory, bytes))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn load(&self, scope: Scope) -> StoreResult<Option<OrderList>> {
        Ok(self.snapshot(scope))
    }

    async fn save(&self, scope: Scope, order: &OrderList) -> StoreResult<()> {
        let bytes = serde_json::to_vec(order)?;
        self.records.lock().insert(scope, bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
