//! Observer traits, one per state family
//!
//! Callbacks run on the reconciler task, in registration order. They must
//! return quickly; hand work off to another task if it may block.

use std::sync::Arc;

use mc_api::notifications::InputRequest;
use mc_api::ErrorInfo;

use crate::model::{ConnectionStatus, PlayerState, PlaylistSnapshot, StateFamily};

pub trait PlayerObserver: Send + Sync {
    /// The player state changed, or is replayed on registration
    fn on_player_state(&self, state: &PlayerState);

    /// The host is quitting, restarting or going to sleep
    fn on_system_quit(&self) {}

    /// The host asks for text input
    fn on_input_requested(&self, _request: &InputRequest) {}

    /// Observation stopped; no further callbacks follow
    fn on_stop_observing(&self) {}
}

pub trait ApplicationObserver: Send + Sync {
    fn on_volume_changed(&self, volume: u8, muted: bool);

    fn on_application_error(&self, _error: &ErrorInfo) {}
}

pub trait PlaylistObserver: Send + Sync {
    /// Every non-empty playlist, replacing anything seen before
    fn on_playlists_available(&self, playlists: &[PlaylistSnapshot]);

    fn on_playlist_cleared(&self, playlistid: i32);

    fn on_playlist_error(&self, _error: &ErrorInfo) {}
}

pub trait ConnectionObserver: Send + Sync {
    fn on_connection_status(&self, status: &ConnectionStatus);
}

/// A registered observer of one family
///
/// Identity is the `Arc` allocation, so registering the same `Arc` twice is a
/// no-op and unregistering needs a clone of the registered `Arc`.
#[derive(Clone)]
pub enum Observer {
    Player(Arc<dyn PlayerObserver>),
    Application(Arc<dyn ApplicationObserver>),
    Playlist(Arc<dyn PlaylistObserver>),
    Connection(Arc<dyn ConnectionObserver>),
}

impl Observer {
    pub fn family(&self) -> StateFamily {
        match self {
            Observer::Player(_) => StateFamily::Player,
            Observer::Application(_) => StateFamily::Application,
            Observer::Playlist(_) => StateFamily::Playlist,
            Observer::Connection(_) => StateFamily::Connection,
        }
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Observer::{}", self.family())
    }
}

/// Ordered set of observers with pointer identity
pub(crate) struct ObserverSet<T: ?Sized> {
    items: Vec<Arc<T>>,
}

impl<T: ?Sized> Default for ObserverSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

fn same<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl<T: ?Sized> ObserverSet<T> {
    /// Add unless already present; returns whether it was added
    pub fn add(&mut self, observer: Arc<T>) -> bool {
        if self.items.iter().any(|o| same(o, &observer)) {
            return false;
        }
        self.items.push(observer);
        true
    }

    /// Returns whether it was present
    pub fn remove(&mut self, observer: &Arc<T>) -> bool {
        let before = self.items.len();
        self.items.retain(|o| !same(o, observer));
        self.items.len() != before
    }

    /// Copy of the current observers, safe to iterate while callbacks re-enter
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.items.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;

    impl ConnectionObserver for Quiet {
        fn on_connection_status(&self, _status: &ConnectionStatus) {}
    }

    #[test]
    fn test_set_identity() {
        let a: Arc<dyn ConnectionObserver> = Arc::new(Quiet);
        let b: Arc<dyn ConnectionObserver> = Arc::new(Quiet);
        let mut set = ObserverSet::default();

        assert!(set.add(Arc::clone(&a)));
        assert!(!set.add(Arc::clone(&a)));
        assert!(set.add(Arc::clone(&b)));
        assert_eq!(set.len(), 2);

        assert!(set.remove(&a));
        assert!(!set.remove(&a));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_observer_family() {
        let observer = Observer::Connection(Arc::new(Quiet));
        assert_eq!(observer.family(), StateFamily::Connection);
        assert_eq!(format!("{:?}", observer), "Observer::connection");
    }
}
