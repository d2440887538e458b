use shared::error::AppError;
use shared::models::{OrderList, Scope};
use tokio::sync::{mpsc, oneshot, watch};

use super::view::OrderView;
use super::worker::Command;
use crate::error::{SyncError, SyncResult};

/// Caller-side view of one scope's controller
///
/// Cheap to clone; the controller stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct OrderControllerHandle {
    scope: Scope,
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<OrderView>,
}

impl OrderControllerHandle {
    pub(crate) fn new(
        scope: Scope,
        commands: mpsc::Sender<Command>,
        view: watch::Receiver<OrderView>,
    ) -> Self {
        Self {
            scope,
            commands,
            view,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Current snapshot
    pub fn view(&self) -> OrderView {
        self.view.borrow().clone()
    }

    pub fn order(&self) -> OrderList {
        self.view.borrow().order.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.view.borrow().is_loading
    }

    pub fn error(&self) -> Option<AppError> {
        self.view.borrow().error.clone()
    }

    /// True once the controller has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Receiver that wakes on every published change
    pub fn subscribe(&self) -> watch::Receiver<OrderView> {
        self.view.clone()
    }

    /// Wait for the first Ready view
    pub async fn wait_ready(&self) -> SyncResult<OrderView> {
        let mut rx = self.view.clone();
        rx.wait_for(OrderView::is_ready)
            .await
            .map(|view| (*view).clone())
            .map_err(|_| SyncError::Closed(self.scope))
    }

    /// Replace the order with a caller-produced permutation (e.g. after a drag-drop move)
    ///
    /// The new order is published before it is persisted and stays in place
    /// even if the save fails.
    pub async fn update_order(&self, order: OrderList) -> SyncResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Update { order, reply }).await?;
        rx.await.map_err(|_| SyncError::Closed(self.scope))?
    }

    /// Move one entry and persist the result
    ///
    /// Indices refer to the controller's order at the time the command is
    /// handled, which may be newer than [`order`](Self::order).
    pub async fn move_item(&self, from: usize, to: usize) -> SyncResult<OrderList> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Move { from, to, reply }).await?;
        rx.await.map_err(|_| SyncError::Closed(self.scope))?
    }

    /// Discard customization and fall back to the scope's default order
    pub async fn reset_order(&self) -> SyncResult<OrderList> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply }).await?;
        rx.await.map_err(|_| SyncError::Closed(self.scope))?
    }

    /// Wait for saves already queued in the controller to finish
    pub async fn flush(&self) -> SyncResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Flush { reply }).await?;
        rx.await.map_err(|_| SyncError::Closed(self.scope))?
    }

    async fn send(&self, cmd: Command) -> SyncResult<()> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| SyncError::Closed(self.scope))
    }
}
