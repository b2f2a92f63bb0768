//! Store: owner of the current snapshot
//!
//! The store holds the one live `AppState`, runs every dispatched action
//! through the reducer and publishes each new snapshot to observers.
//!
//! # Ordering
//!
//! `dispatch` takes `&mut self`, so transitions are applied one at a time
//! and in call order. Hosts that receive events from several threads must
//! funnel them through a single owner of the store.
//!
//! # Observers
//!
//! Snapshots are published on a `tokio::sync::broadcast` channel. Sending
//! never blocks: with no subscribers the snapshot is dropped, and a
//! subscriber that falls more than `capacity` snapshots behind skips the
//! oldest ones.
//!
//! # Example
//!
//! ```
//! use libmixshell::app::actions;
//! use libmixshell::Store;
//! use serde_json::json;
//!
//! let mut store = Store::new(16);
//! let mut observer = store.subscribe();
//!
//! store.dispatch(&actions::resize(json!({"width": 800, "height": 600}))).unwrap();
//!
//! let changed = observer.try_recv().unwrap();
//! assert_eq!(changed.state.size.width, 800);
//! ```

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::app::{reducer, Action, ActionRecord, AppState};
use crate::config::StoreConfig;
use crate::error::ValidationError;

/// Receiver of published snapshots
pub type StateReceiver = broadcast::Receiver<StateChanged>;

/// A snapshot published after a successful dispatch
#[derive(Debug, Clone, Serialize)]
pub struct StateChanged {
    /// 1-based count of accepted dispatches
    pub sequence: u64,
    /// Kind of the action that produced this snapshot
    pub kind: String,
    pub state: AppState,
}

pub struct Store {
    state: AppState,
    sequence: u64,
    sender: broadcast::Sender<StateChanged>,
}

impl Store {
    /// Create a store holding the initial state
    ///
    /// `capacity` is the per-subscriber buffer; 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self::with_state(AppState::initial(), capacity)
    }

    /// Create a store starting from an existing snapshot
    pub fn with_state(state: AppState, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            state,
            sequence: 0,
            sender,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// The latest snapshot
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of dispatches accepted so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Subscribe to snapshots published after this call
    pub fn subscribe(&self) -> StateReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Run an action record through the reducer
    ///
    /// On a validation failure the snapshot is left as it was, nothing is
    /// published and the error is returned.
    pub fn dispatch(&mut self, action: &ActionRecord) -> Result<&AppState, ValidationError> {
        match reducer::try_reduce(&self.state, action) {
            Ok(next) => Ok(self.commit(&action.kind, next)),
            Err(error) => {
                warn!(kind = %action.kind, %error, "Rejected action");
                Err(error)
            }
        }
    }

    /// Dispatch a typed action
    pub fn dispatch_action(&mut self, action: Action) -> Result<&AppState, ValidationError> {
        let kind = action.kind();
        match reducer::apply(&self.state, action) {
            Ok(next) => Ok(self.commit(kind.as_str(), next)),
            Err(error) => {
                warn!(%kind, %error, "Rejected action");
                Err(error)
            }
        }
    }

    fn commit(&mut self, kind: &str, next: AppState) -> &AppState {
        self.sequence += 1;
        self.state = next;
        debug!(sequence = self.sequence, kind, "State updated");

        // Err only means nobody is listening
        let _ = self.sender.send(StateChanged {
            sequence: self.sequence,
            kind: kind.to_string(),
            state: self.state.clone(),
        });

        &self.state
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions;
    use serde_json::{json, Value};
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_new_store_holds_initial_state() {
        let store = Store::default();
        assert_eq!(store.state(), &AppState::initial());
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn test_dispatch_publishes_snapshot() {
        let mut store = Store::new(4);
        let mut receiver = store.subscribe();

        store.dispatch(&actions::mute(Value::Null)).unwrap();

        let changed = receiver.try_recv().unwrap();
        assert_eq!(changed.sequence, 1);
        assert_eq!(changed.kind, "mute");
        assert!(changed.state.muted);
    }

    #[test]
    fn test_rejected_dispatch_publishes_nothing() {
        let mut store = Store::new(4);
        let mut receiver = store.subscribe();

        let result = store.dispatch(&actions::resize(json!({"width": -1, "height": 1})));
        assert!(result.is_err());
        assert_eq!(store.sequence(), 0);
        assert_eq!(store.state(), &AppState::initial());
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_dispatch_without_subscribers() {
        let mut store = Store::new(1);
        assert_eq!(store.subscriber_count(), 0);

        store.dispatch(&actions::source_add(json!({"id": "a"}))).unwrap();
        store.dispatch(&actions::source_add(json!({"id": "b"}))).unwrap();

        assert_eq!(store.state().audio_sources.len(), 2);
        assert_eq!(store.sequence(), 2);
    }

    #[test]
    fn test_lagging_subscriber_skips_oldest() {
        let mut store = Store::new(2);
        let mut receiver = store.subscribe();

        for width in 1..=4 {
            store
                .dispatch(&actions::resize(json!({"width": width, "height": 1})))
                .unwrap();
        }

        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Lagged(2))));
        assert_eq!(receiver.try_recv().unwrap().state.size.width, 3);
        assert_eq!(receiver.try_recv().unwrap().state.size.width, 4);
    }

    #[test]
    fn test_dispatch_typed_action() {
        let mut store = Store::default();
        let state = store.dispatch_action(Action::Mute).unwrap();
        assert!(state.muted);
        assert_eq!(store.sequence(), 1);
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let mut store = Store::new(0);
        let mut receiver = store.subscribe();
        store.dispatch(&actions::unmute(Value::Null)).unwrap();
        assert_eq!(receiver.try_recv().unwrap().kind, "unmute");
    }
}
