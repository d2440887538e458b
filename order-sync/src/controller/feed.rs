use std::sync::Arc;

use shared::models::CategoryName;
use tokio::sync::watch;

/// Live category names for one scope, pushed by the category-definition side
///
/// `None` until the first snapshot arrives. Publishing an identical snapshot
/// does not wake subscribers.
#[derive(Debug, Clone)]
pub struct CategoryFeed {
    tx: Arc<watch::Sender<Option<Vec<CategoryName>>>>,
}

impl CategoryFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// A feed whose first snapshot is already known
    pub fn with_snapshot<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryName>,
    {
        let feed = Self::new();
        feed.publish(names);
        feed
    }

    /// Replace the live snapshot
    pub fn publish<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<CategoryName>,
    {
        let names: Vec<CategoryName> = names.into_iter().map(Into::into).collect();
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&names) {
                return false;
            }
            *current = Some(names);
            true
        });
    }

    pub fn current(&self) -> Option<Vec<CategoryName>> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<CategoryName>>> {
        self.tx.subscribe()
    }
}

impl Default for CategoryFeed {
    fn default() -> Self {
        Self::new()
    }
}
