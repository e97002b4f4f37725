//! Media-center remote SDK
//!
//! Ties the layers together per host:
//!
//! - [`HostRegistry`] remembers known hosts and which one is selected
//! - [`HostContext`] owns the connection and the live state of one host
//! - [`MediaCenter`] switches between hosts and shares one library store and
//!   sync service across all of them
//!
//! The lower layers are re-exported as [`api`], [`state`] and [`sync`].

mod config;
mod context;
mod error;
mod host;
mod registry;
mod system;

pub use config::SdkConfig;
pub use context::{http_transport, open_transport, HostContext};
pub use error::{Result, SdkError};
pub use host::{HostConfig, TransportPreference};
pub use registry::{default_library_path, default_registry_path, HostRegistry};
pub use system::{HostDirectory, MediaCenter};

pub use mc_api as api;
pub use mc_state as state;
pub use mc_sync as sync;
