//! Library synchronization from a media-center host into a local store
//!
//! A sync request is a list of [`SyncTask`]s. The [`SyncService`] runs them per
//! host, strictly one after another, over a connection opened just for the run.
//! Each task walks the host's paginated catalog for its kind and writes the
//! projected rows into a [`LibraryStore`]:
//!
//! - movies and TV shows page through the list; TV shows then fetch seasons and
//!   episodes show by show
//! - music fetches artists, genres, albums and songs in that order
//! - music videos arrive in a single call
//!
//! A failed task is reported and skipped; the rest of the queue still runs.

pub mod config;
pub mod cursor;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod service;
pub mod store;
pub mod task;

pub use config::SyncConfig;
pub use cursor::PageCursor;
pub use error::{Result, StoreError, SyncError};
pub use pipeline::{ConnectionFactory, RunSummary, SyncPipeline, SyncQueue};
pub use service::SyncService;
pub use store::{LibraryStore, MemoryStore, Row, SqlValue, SqliteStore, Table};
pub use task::{HostId, SyncKind, SyncParams, SyncResult, SyncStatus, SyncTask};
