//! Mixshell - state core for an audio front-end shell
//!
//! This library holds the whole state-transition contract of the
//! application: tagged actions, a pure reducer over immutable snapshots,
//! and a small store that hosts can use to dispatch actions and observe
//! new snapshots.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use app::{reduce, try_reduce, Action, ActionKind, ActionRecord, AppState, AudioSource, SourceId};
pub use config::Config;
pub use error::{MixshellError, Result, ValidationError};
pub use store::{StateChanged, Store};
