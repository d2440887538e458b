//! OrderController: per-scope actor
//!
//! 1. Load the stored order and wait for the first live snapshot (both required)
//! 2. Reconcile, publish Ready, persist the correction if any
//! 3. Re-reconcile on every live change; serve update/reset commands
//!
//! All saves for a scope happen inside this task, one at a time.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{CategoryName, OrderList, Scope};
use shared::util::now_millis;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use super::feed::CategoryFeed;
use super::handle::OrderControllerHandle;
use super::view::{OrderView, Phase};
use crate::error::{StoreError, SyncError, SyncResult};
use crate::store::OrderStore;
use crate::sync::{DefaultOrderPolicy, reconcile_with};

/// Pending commands per controller
const COMMAND_BUFFER: usize = 32;

pub(crate) enum Command {
    Update {
        order: OrderList,
        reply: oneshot::Sender<SyncResult<()>>,
    },
    Reset {
        reply: oneshot::Sender<SyncResult<OrderList>>,
    },
    /// Move one entry of the controller's current order
    Move {
        from: usize,
        to: usize,
        reply: oneshot::Sender<SyncResult<OrderList>>,
    },
    /// Answered once every earlier save has finished
    Flush { reply: oneshot::Sender<SyncResult<()>> },
}

impl Command {
    fn reject(self, err: impl Fn() -> SyncError) {
        // A dropped receiver means the caller gave up; nothing to report.
        match self {
            Command::Update { reply, .. } | Command::Flush { reply } => {
                let _ = reply.send(Err(err()));
            }
            Command::Reset { reply } | Command::Move { reply, .. } => {
                let _ = reply.send(Err(err()));
            }
        }
    }
}

pub struct OrderController {
    scope: Scope,
    store: Arc<dyn OrderStore>,
    policy: DefaultOrderPolicy,
    live_rx: watch::Receiver<Option<Vec<CategoryName>>>,
    live: Vec<CategoryName>,
    commands: mpsc::Receiver<Command>,
    view_tx: watch::Sender<OrderView>,
    shutdown: CancellationToken,
    /// Set when the initial load failed; auto-sync must not overwrite the
    /// stored record until the caller saves explicitly
    load_failed: bool,
}

impl OrderController {
    /// Build a controller and its handle; the controller does nothing until [`run`](Self::run)
    pub fn new(
        scope: Scope,
        store: Arc<dyn OrderStore>,
        policy: DefaultOrderPolicy,
        feed: &CategoryFeed,
        shutdown: CancellationToken,
    ) -> (Self, OrderControllerHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(OrderView::new(scope));

        let controller = Self {
            scope,
            store,
            policy,
            live_rx: feed.subscribe(),
            live: Vec::new(),
            commands: cmd_rx,
            view_tx,
            shutdown,
            load_failed: false,
        };
        let handle = OrderControllerHandle::new(scope, cmd_tx, view_rx);
        (controller, handle)
    }

    /// Build and spawn onto the current runtime
    pub fn spawn(
        scope: Scope,
        store: Arc<dyn OrderStore>,
        policy: DefaultOrderPolicy,
        feed: &CategoryFeed,
        shutdown: CancellationToken,
    ) -> OrderControllerHandle {
        let (controller, handle) = Self::new(scope, store, policy, feed, shutdown);
        tokio::spawn(controller.run());
        handle
    }

    pub async fn run(mut self) {
        let scope = self.scope;
        tracing::info!(%scope, backend = %self.store.backend(), "Order controller started");

        if self.initialize().await {
            self.serve().await;
        }

        tracing::info!(%scope, "Order controller stopped");
    }

    /// Loading → Reconciling → Ready. Returns false on teardown.
    async fn initialize(&mut self) -> bool {
        let scope = self.scope;
        self.view_tx.send_modify(|view| view.phase = Phase::Loading);

        let (loaded, live) = {
            let store = self.store.clone();
            let live_rx = &mut self.live_rx;
            let inputs = async move { tokio::join!(store.load(scope), wait_for_live(live_rx)) };
            tokio::pin!(inputs);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        tracing::debug!(%scope, "Shutdown during load, dropping in-flight I/O");
                        return false;
                    }
                    cmd = self.commands.recv() => match cmd {
                        Some(cmd) => cmd.reject(|| SyncError::NotReady(scope)),
                        None => {
                            tracing::debug!(%scope, "All handles dropped during load");
                            return false;
                        }
                    },
                    (loaded, live) = &mut inputs => break (loaded, live),
                }
            }
        };

        let Some(live) = live else {
            tracing::warn!(%scope, "Category feed closed before its first snapshot");
            return false;
        };
        self.live = live;
        self.view_tx.send_modify(|view| view.phase = Phase::Reconciling);

        match loaded {
            Ok(stored) => {
                let order = reconcile_with(stored.as_ref(), &self.live, &self.policy);
                let changed = stored.as_ref() != Some(&order);
                tracing::info!(
                    %scope,
                    stored = stored.is_some(),
                    changed,
                    len = order.len(),
                    "Initial order reconciled"
                );
                self.publish_ready(order.clone(), None);
                if changed {
                    self.persist_in_background(&order, "initial sync").await;
                }
            }
            Err(e) => {
                tracing::warn!(%scope, error = %e, "Failed to load order, falling back to default");
                let order = self.policy.arrange(&self.live);
                self.load_failed = true;
                self.publish_ready(order, Some(load_error(scope, &e)));
            }
        }

        true
    }

    /// Ready loop
    async fn serve(&mut self) {
        let scope = self.scope;
        let mut feed_open = true;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,

                changed = self.live_rx.changed(), if feed_open => {
                    if changed.is_err() {
                        tracing::debug!(%scope, "Category feed closed, keeping last snapshot");
                        feed_open = false;
                        continue;
                    }
                    let snapshot = self.live_rx.borrow_and_update().clone();
                    if let Some(live) = snapshot {
                        self.resync(live).await;
                    }
                }

                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle(cmd).await,
                    None => break,
                },
            }
        }
    }

    async fn resync(&mut self, live: Vec<CategoryName>) {
        let scope = self.scope;
        self.live = live;

        let current = self.view_tx.borrow().order.clone();
        let order = reconcile_with(Some(&current), &self.live, &self.policy);
        if order == current {
            tracing::debug!(%scope, "Live categories changed, order already consistent");
            return;
        }

        tracing::info!(
            %scope,
            before = current.len(),
            after = order.len(),
            "Live categories changed, order repaired"
        );
        self.view_tx.send_modify(|view| view.phase = Phase::Reconciling);
        self.publish_ready(order.clone(), None);
        if self.load_failed {
            tracing::debug!(%scope, "Stored order never loaded, skipping auto-sync save");
            return;
        }
        self.persist_in_background(&order, "auto sync").await;
    }

    async fn handle(&mut self, cmd: Command) {
        let scope = self.scope;
        match cmd {
            Command::Update { order, reply } => {
                tracing::debug!(%scope, len = order.len(), "Order updated by caller");
                self.publish_ready(order.clone(), None);
                let result = self.save_explicit(&order).await;
                let _ = reply.send(result);
            }
            Command::Reset { reply } => {
                let order = self.policy.arrange(&self.live);
                tracing::info!(%scope, len = order.len(), "Order reset to default");
                self.publish_ready(order.clone(), None);
                let result = self.save_explicit(&order).await.map(|()| order);
                let _ = reply.send(result);
            }
            Command::Move { from, to, reply } => {
                // Applied to the actor's order so live changes handled earlier are kept
                let current = self.view_tx.borrow().order.clone();
                let Some(order) = current.move_item(from, to) else {
                    let _ = reply.send(Err(SyncError::InvalidMove { from, to }));
                    return;
                };
                tracing::debug!(%scope, from, to, "Entry moved by caller");
                self.publish_ready(order.clone(), None);
                let result = self.save_explicit(&order).await.map(|()| order);
                let _ = reply.send(result);
            }
            Command::Flush { reply } => {
                let _ = reply.send(Ok(()));
            }
        }
    }

    /// Save a caller-initiated change
    ///
    /// The first success after a failed load makes the stored record
    /// authoritative again and clears the load warning.
    async fn save_explicit(&mut self, order: &OrderList) -> SyncResult<()> {
        self.persist(order).await?;
        if self.load_failed {
            self.load_failed = false;
            self.view_tx.send_modify(|view| view.error = None);
        }
        Ok(())
    }

    /// Save and surface the failure to the caller; in-memory state is kept either way
    async fn persist(&self, order: &OrderList) -> SyncResult<()> {
        self.store.save(self.scope, order).await.map_err(|e| {
            tracing::warn!(scope = %self.scope, error = %e, "Failed to save order");
            SyncError::Store(e)
        })
    }

    /// Save where nobody is waiting for the result; failures are only logged
    async fn persist_in_background(&self, order: &OrderList, reason: &str) {
        let scope = self.scope;
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                tracing::debug!(%scope, reason, "Shutdown during save, dropping it");
            }
            result = self.store.save(scope, order) => {
                if let Err(e) = result {
                    tracing::warn!(%scope, reason, error = %e, "Failed to persist reconciled order");
                }
            }
        }
    }

    /// Publish a Ready view. `load_error` replaces the retained error only when given.
    fn publish_ready(&self, order: OrderList, load_error: Option<AppError>) {
        self.view_tx.send_modify(|view| {
            view.phase = Phase::Ready;
            view.is_loading = false;
            view.order = order;
            view.synced_at = Some(now_millis());
            if load_error.is_some() {
                view.error = load_error;
            }
        });
    }
}

/// Wait until the feed has a snapshot; `None` if it closed first
async fn wait_for_live(
    rx: &mut watch::Receiver<Option<Vec<CategoryName>>>,
) -> Option<Vec<CategoryName>> {
    loop {
        let current = rx.borrow_and_update().clone();
        if current.is_some() {
            return current;
        }
        if rx.changed().await.is_err() {
            return None;
        }
    }
}

fn load_error(scope: Scope, err: &StoreError) -> AppError {
    AppError::with_message(ErrorCode::OrderLoadFailed, err.to_string())
        .with_detail("scope", scope.as_str())
        .with_detail("cause", err.code().code())
}
