use serde::Serialize;
use shared::error::AppError;
use shared::models::{OrderList, Scope};

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    /// Waiting for the stored order and the first live snapshot
    Loading,
    Reconciling,
    Ready,
}

/// What the UI layer sees for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub scope: Scope,
    pub phase: Phase,
    pub order: OrderList,
    /// True until the first Ready
    pub is_loading: bool,
    /// Load failure, kept for an optional user-facing warning
    pub error: Option<AppError>,
    /// When the in-memory order last changed (ms since epoch)
    pub synced_at: Option<i64>,
}

impl OrderView {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            phase: Phase::Uninitialized,
            order: OrderList::default(),
            is_loading: true,
            error: None,
            synced_at: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }
}
