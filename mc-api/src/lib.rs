//! Typed JSON-RPC API for media-center hosts
//!
//! This crate layers a compile-time checked method catalog on top of the private
//! `rpc-client` transports:
//!
//! - [`RpcMethod`]: one zero-sized type per remote method, fixing its parameter
//!   and result types
//! - [`RemoteClient`]: executes methods over any [`Transport`]
//! - [`notifications`]: decodes host-pushed events and routes them to a
//!   [`NotificationSink`]
//!
//! ```rust,ignore
//! use mc_api::{RemoteClient, methods::player::GetActivePlayers, types::NoParams};
//!
//! let players = client.execute::<GetActivePlayers>(&NoParams).await?;
//! ```
//!
//! Enable the `test-support` feature for a scripted [`mock::MockTransport`].

pub mod client;
pub mod error;
pub mod method;
pub mod methods;
pub mod namespace;
pub mod notifications;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use client::RemoteClient;
pub use error::{ApiError, ErrorCode, ErrorInfo, Result};
pub use method::RpcMethod;
pub use namespace::Namespace;
pub use notifications::{dispatch, Notification, NotificationCategory, NotificationSink};
pub use rpc_client::{
    HttpEndpoint, HttpTransport, RawNotification, TcpTransport, Transport, TransportError,
    TransportKind,
};
