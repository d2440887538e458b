//! Per-scope order controllers
//!
//! ```text
//! CategoryFeed ──► OrderController ◄──► OrderStore
//!                    │  ▲
//!        OrderView ◄─┘  └── update_order / reset_order (OrderControllerHandle)
//! ```
//!
//! Phases: `Uninitialized → Loading → Reconciling → Ready`, and back to
//! `Reconciling` whenever the live category set changes.

mod feed;
mod handle;
mod view;
mod worker;

pub use feed::CategoryFeed;
pub use handle::OrderControllerHandle;
pub use view::{OrderView, Phase};
pub use worker::OrderController;
