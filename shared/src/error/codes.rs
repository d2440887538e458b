//! Numeric error codes shared with the UI layer
//!
//! | Range | Area |
//! |-------|------|
//! | 0xxx | general |
//! | 1xxx | authentication |
//! | 2xxx | permission |
//! | 41xx | display order |
//! | 9xxx | system / transport |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares the code table once; the enum, its message lookup and the
/// `u16` conversion are generated from it.
macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal => $msg:literal, )+) => {
        /// Error code, serialized as a bare `u16`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every defined code, in table order
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$name, )+];

            /// Developer-facing English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $msg, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    Success = 0 => "Operation completed successfully",
    Unknown = 1 => "An unknown error occurred",
    ValidationFailed = 2 => "Validation failed",
    InvalidFormat = 6 => "Invalid format",

    NotAuthenticated = 1001 => "Caller is not authenticated",
    TokenExpired = 1003 => "Token has expired",

    PermissionDenied = 2001 => "Permission denied",

    /// Stored order could not be read; a default is shown instead
    OrderLoadFailed = 4101 => "Failed to load saved order",
    OrderSaveFailed = 4102 => "Failed to save order",
    /// Controller has not finished its initial load
    OrderNotReady = 4103 => "Order is still loading",
    OrderControllerClosed = 4104 => "Order controller has shut down",

    InternalError = 9001 => "Internal error",
    StorageUnavailable = 9101 => "Storage backend unavailable",
    /// Remote backend unreachable or answered unexpectedly
    NetworkError = 9102 => "Network error",
    Timeout = 9103 => "Request timed out",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);
