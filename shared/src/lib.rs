//! Shared types for the order-sync workspace
//!
//! Data model for user-customizable category display orders and the
//! structured error type surfaced to the UI layer.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, ErrorCode};
pub use models::{CategoryName, OrderList, Scope};
pub use serde::{Deserialize, Serialize};
