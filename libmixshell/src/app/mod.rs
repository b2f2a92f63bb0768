//! Application module
//!
//! Contains the state core:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: Pure function (State, Action) -> State
//!
//! State is immutable; every transition produces a new snapshot.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod sources;
pub mod state;

// Re-export commonly used types
pub use actions::{make_action, Action, ActionKind, ActionRecord, NewSource};
pub use event::HostEvent;
pub use reducer::{apply, reduce, try_reduce};
pub use state::{AppState, AudioSource, Size, SourceId};
