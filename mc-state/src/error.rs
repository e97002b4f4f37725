//! Error types for mc-state

use thiserror::Error;

/// Result type for mc-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while driving a reconciler
#[derive(Debug, Error)]
pub enum StateError {
    /// The reconciler must be created inside a Tokio runtime
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),

    /// The reconciler task has shut down
    #[error("State reconciler is no longer running")]
    Closed,

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from mc-api
    #[error("API error: {0}")]
    Api(#[from] mc_api::ApiError),
}
