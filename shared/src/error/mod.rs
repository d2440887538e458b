//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Response envelope used by the remote preference service
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::OrderSaveFailed, "quota exceeded")
//!     .with_detail("scope", "vertical");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4102));
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
