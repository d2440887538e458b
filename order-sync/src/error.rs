//! Error types for the order-sync service

use shared::error::{AppError, ErrorCode};
use shared::models::Scope;
use thiserror::Error;

/// Storage errors (either backend)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a structured error body
    #[error("Remote error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("Authentication rejected by remote store")]
    Unauthorized,

    /// Remote service answered with an unexpected status and no structured body
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid remote store URL: {0}")]
    InvalidUrl(String),

    #[error("Account id {0:?} cannot be used in a record path")]
    InvalidAccountId(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Transport-level classification for the UI layer
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Database(_)
            | StoreError::Transaction(_)
            | StoreError::Table(_)
            | StoreError::Storage(_)
            | StoreError::Commit(_)
            | StoreError::Join(_) => ErrorCode::StorageUnavailable,
            StoreError::Http(e) if e.is_timeout() => ErrorCode::Timeout,
            StoreError::Http(_) | StoreError::Status { .. } => ErrorCode::NetworkError,
            StoreError::Api { code, .. } => {
                ErrorCode::try_from(*code).unwrap_or(ErrorCode::NetworkError)
            }
            StoreError::Unauthorized => ErrorCode::NotAuthenticated,
            StoreError::Serialization(_) => ErrorCode::InvalidFormat,
            StoreError::InvalidUrl(_) | StoreError::InvalidAccountId(_) => {
                ErrorCode::ValidationFailed
            }
            StoreError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<&StoreError> for AppError {
    fn from(err: &StoreError) -> Self {
        AppError::with_message(err.code(), err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned to callers of a controller handle
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to persist order: {0}")]
    Store(#[from] StoreError),

    #[error("Order for {0} is still loading")]
    NotReady(Scope),

    #[error("Order controller for {0} has shut down")]
    Closed(Scope),

    #[error("Cannot move entry {from} to {to}: index out of range")]
    InvalidMove { from: usize, to: usize },
}

impl SyncError {
    /// Structured form for the UI layer (e.g. a failure toast)
    pub fn to_app_error(&self) -> AppError {
        match self {
            SyncError::Store(e) => AppError::with_message(ErrorCode::OrderSaveFailed, e.to_string())
                .with_detail("cause", e.code().code()),
            SyncError::NotReady(scope) => AppError::not_ready().with_detail("scope", scope.as_str()),
            SyncError::Closed(scope) => AppError::closed().with_detail("scope", scope.as_str()),
            SyncError::InvalidMove { from, to } => AppError::validation(self.to_string())
                .with_detail("from", *from)
                .with_detail("to", *to),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
