//! Live state of a media-center host
//!
//! A [`StateReconciler`] turns either transport model into one de-duplicated
//! feed per state family:
//!
//! - on a push transport it listens to host notifications and pings the host
//!   to notice when it goes away
//! - on a poll-only transport it re-fetches every observed family on a timer
//!
//! Observers only hear about changes. A late observer receives the cached
//! value straight away without any remote call.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mc_state::{PlayerObserver, PlayerState, ReconcilerConfig, StateReconciler};
//!
//! struct Printer;
//!
//! impl PlayerObserver for Printer {
//!     fn on_player_state(&self, state: &PlayerState) {
//!         println!("{:?}", state);
//!     }
//! }
//!
//! let reconciler = StateReconciler::new(client, ReconcilerConfig::default())?;
//! reconciler.register_player(Arc::new(Printer))?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod observer;
pub mod reconciler;

pub use config::ReconcilerConfig;
pub use error::{Result, StateError};
pub use model::{
    ApplicationState, ConnectionStatus, HostState, PlayerSnapshot, PlayerState, PlaylistSnapshot,
    PlaylistState, StateFamily,
};
pub use observer::{
    ApplicationObserver, ConnectionObserver, Observer, PlayerObserver, PlaylistObserver,
};
pub use reconciler::{ReconcilerStatus, StateReconciler};
