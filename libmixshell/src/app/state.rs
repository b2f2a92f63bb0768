//! Application state
//!
//! Immutable snapshot types. Every transition goes through the reducer
//! (see `reducer.rs`), which builds a new `AppState` instead of editing
//! the one it was given.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of an audio source
///
/// Callers may pick either an integer or a string. Ids assigned by the
/// reducer are always `Index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceId {
    Index(u64),
    Name(String),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Index(n) => write!(f, "{}", n),
            SourceId::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for SourceId {
    fn from(n: u64) -> Self {
        SourceId::Index(n)
    }
}

impl From<&str> for SourceId {
    fn from(name: &str) -> Self {
        SourceId::Name(name.to_string())
    }
}

impl From<String> for SourceId {
    fn from(name: String) -> Self {
        SourceId::Name(name)
    }
}

/// Last known viewport dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A logical audio input tracked by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    pub id: SourceId,

    /// Display label, not interpreted by the reducer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Opaque descriptor of the underlying source
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub source: serde_json::Value,

    #[serde(default)]
    pub muted: bool,
}

impl AudioSource {
    pub fn new(id: impl Into<SourceId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            source: serde_json::Value::Null,
            muted: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Root application state
///
/// The single source of truth for the shell. Cloning is cheap: the source
/// list sits behind an `Arc` and is shared between snapshots until a
/// transition actually changes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub size: Size,

    /// Sources in display/playback order
    pub audio_sources: Arc<Vec<AudioSource>>,

    /// Global mute flag
    pub muted: bool,

    /// Next id handed out to a source added without one
    #[serde(default = "first_source_id")]
    pub next_source_id: u64,
}

fn first_source_id() -> u64 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            size: Size::default(),
            audio_sources: Arc::new(Vec::new()),
            muted: false,
            next_source_id: first_source_id(),
        }
    }
}

impl AppState {
    /// The state the shell starts in, and the one `reset` returns to
    pub fn initial() -> Self {
        Self::default()
    }

    /// Look up a source by id
    pub fn source(&self, id: &SourceId) -> Option<&AudioSource> {
        self.audio_sources.iter().find(|s| &s.id == id)
    }

    /// Ids in display order
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.audio_sources.iter().map(|s| s.id.clone()).collect()
    }

    /// A source is audible when neither it nor the whole shell is muted
    pub fn is_audible(&self, id: &SourceId) -> bool {
        !self.muted && self.source(id).map(|s| !s.muted).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_shape() {
        let state = AppState::initial();
        assert_eq!(state.size, Size::new(0, 0));
        assert!(state.audio_sources.is_empty());
        assert!(!state.muted);
        assert_eq!(state.next_source_id, 1);
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let value = serde_json::to_value(AppState::initial()).unwrap();
        assert_eq!(
            value,
            json!({
                "size": {"width": 0, "height": 0},
                "audioSources": [],
                "muted": false,
                "nextSourceId": 1
            })
        );
    }

    #[test]
    fn test_source_id_accepts_integer_or_string() {
        let id: SourceId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id, SourceId::Index(7));

        let id: SourceId = serde_json::from_value(json!("mic")).unwrap();
        assert_eq!(id, SourceId::Name("mic".to_string()));

        assert!(serde_json::from_value::<SourceId>(json!(1.5)).is_err());
        assert!(serde_json::from_value::<SourceId>(json!(-1)).is_err());
    }

    #[test]
    fn test_is_audible() {
        let mut state = AppState::initial();
        state.audio_sources = Arc::new(vec![
            AudioSource::new("a"),
            AudioSource {
                muted: true,
                ..AudioSource::new("b")
            },
        ]);

        assert!(state.is_audible(&"a".into()));
        assert!(!state.is_audible(&"b".into()));
        assert!(!state.is_audible(&"missing".into()));

        state.muted = true;
        assert!(!state.is_audible(&"a".into()));
    }
}
