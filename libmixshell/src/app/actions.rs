//! Actions for the reducer pattern
//!
//! Two layers live here:
//!
//! - `ActionRecord`: the untyped `{kind, value}` record hosts build and
//!   send around (and the shape actions have on the wire). The factory
//!   functions below construct these without looking at the payload.
//! - `Action`: the typed, validated form the reducer matches on.
//!   `Action::decode` is the single place payloads are checked.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use super::state::{Size, SourceId};
use crate::error::ValidationError;

/// A tagged action record: a kind plus an arbitrary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub kind: String,

    #[serde(default)]
    pub value: Value,
}

/// Build an action record from a kind and a payload
pub fn make_action(kind: impl Into<String>, value: Value) -> ActionRecord {
    ActionRecord {
        kind: kind.into(),
        value,
    }
}

pub fn reset(value: Value) -> ActionRecord {
    make_action(ActionKind::Reset.as_str(), value)
}

pub fn resize(value: Value) -> ActionRecord {
    make_action(ActionKind::Resize.as_str(), value)
}

pub fn mute(value: Value) -> ActionRecord {
    make_action(ActionKind::Mute.as_str(), value)
}

pub fn unmute(value: Value) -> ActionRecord {
    make_action(ActionKind::Unmute.as_str(), value)
}

pub fn source_add(value: Value) -> ActionRecord {
    make_action(ActionKind::SourceAdd.as_str(), value)
}

pub fn source_remove(value: Value) -> ActionRecord {
    make_action(ActionKind::SourceRemove.as_str(), value)
}

pub fn source_mute(value: Value) -> ActionRecord {
    make_action(ActionKind::SourceMute.as_str(), value)
}

pub fn source_unmute(value: Value) -> ActionRecord {
    make_action(ActionKind::SourceUnmute.as_str(), value)
}

pub fn source_move(value: Value) -> ActionRecord {
    make_action(ActionKind::SourceMove.as_str(), value)
}

/// The supported action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Reset,
    Resize,
    Mute,
    Unmute,
    SourceAdd,
    SourceRemove,
    SourceMute,
    SourceUnmute,
    SourceMove,
}

impl ActionKind {
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Reset,
        ActionKind::Resize,
        ActionKind::Mute,
        ActionKind::Unmute,
        ActionKind::SourceAdd,
        ActionKind::SourceRemove,
        ActionKind::SourceMute,
        ActionKind::SourceUnmute,
        ActionKind::SourceMove,
    ];

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Reset => "reset",
            ActionKind::Resize => "resize",
            ActionKind::Mute => "mute",
            ActionKind::Unmute => "unmute",
            ActionKind::SourceAdd => "source-add",
            ActionKind::SourceRemove => "source-remove",
            ActionKind::SourceMute => "source-mute",
            ActionKind::SourceUnmute => "source-unmute",
            ActionKind::SourceMove => "source-move",
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown action kind: '{}'", s))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `source-add`
///
/// Everything is optional: a source added with no id gets one from the
/// reducer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SourceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub source: Value,
}

impl NewSource {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_id(id: impl Into<SourceId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResizePayload {
    width: i64,
    height: i64,
}

impl ResizePayload {
    fn validate(self) -> Result<Size, ValidationError> {
        Ok(Size {
            width: dimension("width", self.width)?,
            height: dimension("height", self.height)?,
        })
    }
}

fn dimension(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeDimension { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::DimensionOverflow { field, value })
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    id: SourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovePayload {
    id: SourceId,
    to_index: i64,
}

/// A validated action
///
/// The reducer matches on this exhaustively, so adding a variant forces
/// every transition to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Return to the initial state
    Reset,

    /// Viewport changed size
    Resize(Size),

    /// Mute the whole shell
    Mute,

    /// Unmute the whole shell
    Unmute,

    /// Append a source to the end of the list
    SourceAdd(NewSource),

    SourceRemove(SourceId),

    SourceMute(SourceId),

    SourceUnmute(SourceId),

    /// Relocate a source; `to_index` is clamped into the list bounds
    SourceMove { id: SourceId, to_index: i64 },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Reset => ActionKind::Reset,
            Action::Resize(_) => ActionKind::Resize,
            Action::Mute => ActionKind::Mute,
            Action::Unmute => ActionKind::Unmute,
            Action::SourceAdd(_) => ActionKind::SourceAdd,
            Action::SourceRemove(_) => ActionKind::SourceRemove,
            Action::SourceMute(_) => ActionKind::SourceMute,
            Action::SourceUnmute(_) => ActionKind::SourceUnmute,
            Action::SourceMove { .. } => ActionKind::SourceMove,
        }
    }

    /// Validate a record's payload against its kind
    ///
    /// Returns `Ok(None)` when the kind is not one we know; those records
    /// are identity transitions, not errors.
    pub fn decode(record: &ActionRecord) -> Result<Option<Action>, ValidationError> {
        let kind = match record.kind.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(_) => return Ok(None),
        };

        let action = match kind {
            // Payloads of reset and the global mute pair are ignored
            ActionKind::Reset => Action::Reset,
            ActionKind::Mute => Action::Mute,
            ActionKind::Unmute => Action::Unmute,

            ActionKind::Resize => {
                let payload: ResizePayload = payload(kind, &record.value)?;
                Action::Resize(payload.validate()?)
            }

            ActionKind::SourceAdd => {
                if record.value.is_null() {
                    Action::SourceAdd(NewSource::default())
                } else {
                    Action::SourceAdd(payload(kind, &record.value)?)
                }
            }

            ActionKind::SourceRemove => {
                Action::SourceRemove(payload::<SourceRef>(kind, &record.value)?.id)
            }
            ActionKind::SourceMute => {
                Action::SourceMute(payload::<SourceRef>(kind, &record.value)?.id)
            }
            ActionKind::SourceUnmute => {
                Action::SourceUnmute(payload::<SourceRef>(kind, &record.value)?.id)
            }

            ActionKind::SourceMove => {
                let payload: MovePayload = payload(kind, &record.value)?;
                Action::SourceMove {
                    id: payload.id,
                    to_index: payload.to_index,
                }
            }
        };

        Ok(Some(action))
    }
}

fn payload<T: DeserializeOwned>(kind: ActionKind, value: &Value) -> Result<T, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::NotAnObject {
            kind: kind.to_string(),
        });
    }

    T::deserialize(value).map_err(|e| ValidationError::Malformed {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

impl From<Action> for ActionRecord {
    fn from(action: Action) -> Self {
        let kind = action.kind();
        let value = match action {
            Action::Reset | Action::Mute | Action::Unmute => Value::Null,
            Action::Resize(size) => json!({ "width": size.width, "height": size.height }),
            Action::SourceAdd(new_source) => json!(new_source),
            Action::SourceRemove(id) | Action::SourceMute(id) | Action::SourceUnmute(id) => {
                json!({ "id": id })
            }
            Action::SourceMove { id, to_index } => json!({ "id": id, "toIndex": to_index }),
        };
        make_action(kind.as_str(), value)
    }
}
