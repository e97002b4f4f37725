use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("State error: {0}")]
    State(#[from] mc_state::StateError),

    #[error("API error: {0}")]
    Api(#[from] mc_api::ApiError),

    #[error("Sync error: {0}")]
    Sync(#[from] mc_sync::SyncError),

    #[error("Store error: {0}")]
    Store(#[from] mc_sync::StoreError),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("No host selected")]
    NoActiveHost,

    #[error("Invalid host configuration: {0}")]
    InvalidHost(String),

    #[error("No {0} directory on this platform")]
    NoPlatformDir(&'static str),

    #[error("Registry I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
