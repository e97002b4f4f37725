use mc_api::{ApiError, ErrorInfo};
use thiserror::Error;

use crate::task::SyncKind;

/// Failure of a local store operation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Row for {table} has {actual} values, expected {expected}")]
    RowShape {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown column {column} in {table}")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Errors raised while syncing
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Could not open a sync connection: {0}")]
    Connection(ApiError),

    #[error("{0} does not support single-entity sync")]
    UnsupportedEntity(SyncKind),

    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("Invalid sync configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Code published with a failed task
    ///
    /// Remote failures keep the transport code; local failures use codes the
    /// transports never produce.
    pub fn code(&self) -> i32 {
        match self {
            SyncError::Api(e) | SyncError::Connection(e) => e.code(),
            SyncError::Store(_) => 100,
            SyncError::UnsupportedEntity(_) => 101,
            SyncError::NoRuntime(_) | SyncError::Config(_) => 102,
        }
    }

    pub fn info(&self) -> ErrorInfo {
        let server_code = match self {
            SyncError::Api(e) | SyncError::Connection(e) => e.server_code(),
            _ => None,
        };
        ErrorInfo::new(self.code(), self.to_string()).with_server_code(server_code)
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
