//! OrderSyncService - one controller per scope, one store for the whole session

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::{CategoryName, Scope};

use crate::controller::{CategoryFeed, OrderController, OrderControllerHandle, OrderView};
use crate::error::SyncResult;
use crate::store::OrderStore;
use crate::sync::PolicySet;
use crate::tasks::BackgroundTasks;

/// Live category feeds, one per scope
#[derive(Debug, Clone, Default)]
pub struct CategoryFeeds {
    pub status_active: CategoryFeed,
    pub status_archive: CategoryFeed,
    pub vertical: CategoryFeed,
}

impl CategoryFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: Scope) -> &CategoryFeed {
        match scope {
            Scope::StatusActive => &self.status_active,
            Scope::StatusArchive => &self.status_archive,
            Scope::Vertical => &self.vertical,
        }
    }

    /// Push every scope present in `snapshot`
    pub fn publish(&self, snapshot: &CategorySnapshot) {
        for scope in Scope::ALL {
            if let Some(names) = snapshot.get(scope) {
                self.get(scope).publish(names.iter().cloned());
            }
        }
    }
}

/// Category names for all scopes at one point in time
///
/// ```json
/// {"status_active": ["Not Started"], "status_archive": ["Done"], "vertical": ["ORDER"]}
/// ```
///
/// A missing scope means "not known yet", not "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_active: Option<Vec<CategoryName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_archive: Option<Vec<CategoryName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<Vec<CategoryName>>,
}

impl CategorySnapshot {
    pub fn get(&self, scope: Scope) -> Option<&Vec<CategoryName>> {
        match scope {
            Scope::StatusActive => self.status_active.as_ref(),
            Scope::StatusArchive => self.status_archive.as_ref(),
            Scope::Vertical => self.vertical.as_ref(),
        }
    }
}

/// Running controllers for all scopes
///
/// The store is chosen once at [`start`](Self::start). A session change
/// (login/logout) means `shutdown` and `start` again with the new store.
pub struct OrderSyncService {
    tasks: BackgroundTasks,
    handles: Vec<OrderControllerHandle>,
}

impl OrderSyncService {
    pub fn start(store: Arc<dyn OrderStore>, policies: PolicySet, feeds: &CategoryFeeds) -> Self {
        let mut tasks = BackgroundTasks::new();
        let shutdown = tasks.shutdown_token();

        let handles = Scope::ALL
            .into_iter()
            .map(|scope| {
                let (controller, handle) = OrderController::new(
                    scope,
                    store.clone(),
                    policies.get(scope).clone(),
                    feeds.get(scope),
                    shutdown.child_token(),
                );
                tasks.spawn(format!("order-controller:{scope}"), controller.run());
                handle
            })
            .collect();

        tracing::info!(backend = %store.backend(), "Order sync service started");
        Self { tasks, handles }
    }

    pub fn controller(&self, scope: Scope) -> &OrderControllerHandle {
        &self.handles[slot(scope)]
    }

    pub fn controllers(&self) -> impl Iterator<Item = &OrderControllerHandle> {
        self.handles.iter()
    }

    /// Current view of every scope, in `Scope::ALL` order
    pub fn views(&self) -> Vec<OrderView> {
        self.handles.iter().map(OrderControllerHandle::view).collect()
    }

    /// Wait until every scope has been reconciled once
    pub async fn wait_ready(&self) -> SyncResult<Vec<OrderView>> {
        let mut views = Vec::with_capacity(self.handles.len());
        for handle in &self.handles {
            views.push(handle.wait_ready().await?);
        }
        Ok(views)
    }

    /// Wait for queued saves on every scope
    pub async fn flush(&self) -> SyncResult<()> {
        for handle in &self.handles {
            handle.flush().await?;
        }
        Ok(())
    }

    /// Names of controllers that stopped unexpectedly
    pub fn stopped(&self) -> Vec<&str> {
        self.tasks.finished()
    }

    /// Cancel in-flight work and stop all controllers
    ///
    /// Handles held elsewhere start failing with [`SyncError::Closed`](crate::error::SyncError::Closed).
    pub async fn shutdown(self, timeout: Duration) {
        self.tasks.shutdown(timeout).await;
    }
}

/// Position of `scope` in `Scope::ALL`, which is also the order of `handles`
fn slot(scope: Scope) -> usize {
    match scope {
        Scope::StatusActive => 0,
        Scope::StatusArchive => 1,
        Scope::Vertical => 2,
    }
}

impl std::fmt::Debug for OrderSyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSyncService")
            .field("controllers", &self.handles.len())
            .finish()
    }
}
