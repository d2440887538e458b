//! Device-local order store backed by redb
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `order_preferences` | `order:<scope>` | JSON array of category names |
//!
//! redb commits are durable once `commit()` returns, so a saved order
//! survives an unexpected shutdown of the device.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use shared::models::{OrderList, Scope};

use super::{Backend, OrderStore, decode_order};
use crate::error::StoreResult;

/// Table for display orders: key = storage key, value = JSON-serialized OrderList
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("order_preferences");

/// Order store backed by an embedded redb file
#[derive(Clone)]
pub struct LocalOrderStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for LocalOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalOrderStore").finish_non_exhaustive()
    }
}

impl LocalOrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_raw(db: &Database, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn write_raw(db: &Database, key: &str, value: &[u8]) -> StoreResult<()> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Write raw bytes under a scope's key
    #[cfg(test)]
    pub(crate) fn put_raw(&self, scope: Scope, value: &[u8]) -> StoreResult<()> {
        Self::write_raw(&self.db, &scope.storage_key(), value)
    }
}

#[async_trait]
impl OrderStore for LocalOrderStore {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    async fn load(&self, scope: Scope) -> StoreResult<Option<OrderList>> {
        let db = self.db.clone();
        let raw = tokio::task::spawn_blocking(move || Self::read_raw(&db, &scope.storage_key()))
            .await??;

        Ok(raw.and_then(|bytes| decode_order(scope, Backend::Local, &bytes)))
    }

    async fn save(&self, scope: Scope, order: &OrderList) -> StoreResult<()> {
        let value = serde_json::to_vec(order)?;
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || Self::write_raw(&db, &scope.storage_key(), &value))
            .await??;

        tracing::debug!(%scope, len = order.len(), "Order saved to local store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_absent() {
        let store = LocalOrderStore::open_in_memory().unwrap();
        for scope in Scope::ALL {
            assert!(store.load(scope).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = LocalOrderStore::open_in_memory().unwrap();
        let order = OrderList::from_names(["ORDER", "LOYALTY", "PAYMENT"]);

        store.save(Scope::Vertical, &order).await.unwrap();
        assert_eq!(store.load(Scope::Vertical).await.unwrap(), Some(order));

        // Scopes are independent
        assert!(store.load(Scope::StatusActive).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_list_is_not_absent() {
        let store = LocalOrderStore::open_in_memory().unwrap();
        store
            .save(Scope::StatusArchive, &OrderList::default())
            .await
            .unwrap();
        assert_eq!(
            store.load(Scope::StatusArchive).await.unwrap(),
            Some(OrderList::default())
        );
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = LocalOrderStore::open_in_memory().unwrap();
        store
            .save(Scope::StatusActive, &OrderList::from_names(["A", "B"]))
            .await
            .unwrap();
        store
            .save(Scope::StatusActive, &OrderList::from_names(["B", "A"]))
            .await
            .unwrap();
        assert_eq!(
            store.load(Scope::StatusActive).await.unwrap().unwrap(),
            ["B", "A"]
        );
    }

    #[tokio::test]
    async fn test_corrupted_record_reads_as_absent() {
        let store = LocalOrderStore::open_in_memory().unwrap();
        store.put_raw(Scope::Vertical, b"[\"ORDER\",").unwrap();
        assert!(store.load(Scope::Vertical).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.redb");
        let order = OrderList::from_names(["CSF", "ORDER"]);

        {
            let store = LocalOrderStore::open(&path).unwrap();
            store.save(Scope::Vertical, &order).await.unwrap();
        }

        let store = LocalOrderStore::open(&path).unwrap();
        assert_eq!(store.load(Scope::Vertical).await.unwrap(), Some(order));
    }
}
