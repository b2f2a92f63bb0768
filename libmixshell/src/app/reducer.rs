//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`, with no side effects beyond tracing.
//! The reducer borrows the previous snapshot and builds a new one; the
//! source list is only reallocated when a transition actually changes it.

use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::actions::{Action, ActionRecord, NewSource};
use super::sources;
use super::state::{AppState, AudioSource, SourceId};
use crate::error::ValidationError;

/// Dispatch entry point
///
/// `None` stands for "no state yet": the action is applied to the initial
/// state. A record whose payload fails validation is logged and the prior
/// snapshot is returned unchanged. Callers that need to see the failure
/// use [`try_reduce`].
pub fn reduce(state: Option<&AppState>, action: &ActionRecord) -> AppState {
    let initial;
    let state = match state {
        Some(state) => state,
        None => {
            initial = AppState::initial();
            &initial
        }
    };

    match try_reduce(state, action) {
        Ok(next) => next,
        Err(error) => {
            warn!(kind = %action.kind, %error, "Rejected action, keeping previous state");
            state.clone()
        }
    }
}

/// Decode and apply an action record
///
/// Unknown kinds are identity transitions.
pub fn try_reduce(state: &AppState, action: &ActionRecord) -> Result<AppState, ValidationError> {
    match Action::decode(action)? {
        Some(action) => apply(state, action),
        None => {
            trace!(kind = %action.kind, "Ignoring unknown action kind");
            Ok(state.clone())
        }
    }
}

/// Apply a typed action
///
/// Only `SourceAdd` can fail here, on a taken id or when no fresh id is
/// left; every other payload was checked when the action was built.
pub fn apply(state: &AppState, action: Action) -> Result<AppState, ValidationError> {
    let next = match action {
        Action::Reset => AppState::initial(),

        Action::Resize(size) => AppState {
            size,
            ..state.clone()
        },

        Action::Mute => AppState {
            muted: true,
            ..state.clone()
        },

        Action::Unmute => AppState {
            muted: false,
            ..state.clone()
        },

        Action::SourceAdd(new_source) => add_source(state, new_source)?,

        Action::SourceRemove(id) => match sources::position(&state.audio_sources, &id) {
            Some(index) => with_sources(state, sources::without(&state.audio_sources, index)),
            None => not_found(state, "remove", &id),
        },

        Action::SourceMute(id) => set_source_muted(state, &id, true),

        Action::SourceUnmute(id) => set_source_muted(state, &id, false),

        Action::SourceMove { id, to_index } => {
            match sources::position(&state.audio_sources, &id) {
                Some(from) => {
                    with_sources(state, sources::moved(&state.audio_sources, from, to_index))
                }
                None => not_found(state, "move", &id),
            }
        }
    };

    Ok(next)
}

fn add_source(state: &AppState, new_source: NewSource) -> Result<AppState, ValidationError> {
    let NewSource { id, label, source } = new_source;

    let (id, next_source_id) = match id {
        Some(id) => {
            if sources::contains(&state.audio_sources, &id) {
                return Err(ValidationError::DuplicateId(id.to_string()));
            }
            // Keep auto-assigned ids clear of explicit integer ids. An id
            // with no successor would leave the counter nowhere to go.
            let next_source_id = match &id {
                SourceId::Index(n) => state.next_source_id.max(successor(*n)?),
                SourceId::Name(_) => state.next_source_id,
            };
            (id, next_source_id)
        }
        None => {
            let mut candidate = state.next_source_id;
            while sources::contains(&state.audio_sources, &SourceId::Index(candidate)) {
                candidate = successor(candidate)?;
            }
            (SourceId::Index(candidate), successor(candidate)?)
        }
    };

    debug!(%id, "Adding audio source");

    let added = AudioSource {
        id,
        label,
        source,
        muted: false,
    };

    Ok(AppState {
        audio_sources: Arc::new(sources::appended(&state.audio_sources, added)),
        next_source_id,
        ..state.clone()
    })
}

fn successor(id: u64) -> Result<u64, ValidationError> {
    id.checked_add(1).ok_or(ValidationError::IdSpaceExhausted)
}

fn set_source_muted(state: &AppState, id: &SourceId, muted: bool) -> AppState {
    match sources::position(&state.audio_sources, id) {
        // Already in the requested state: share the existing list
        Some(index) if state.audio_sources[index].muted == muted => state.clone(),
        Some(index) => with_sources(
            state,
            sources::with_muted(&state.audio_sources, index, muted),
        ),
        None => not_found(state, if muted { "mute" } else { "unmute" }, id),
    }
}

fn with_sources(state: &AppState, audio_sources: Vec<AudioSource>) -> AppState {
    AppState {
        audio_sources: Arc::new(audio_sources),
        ..state.clone()
    }
}

fn not_found(state: &AppState, operation: &str, id: &SourceId) -> AppState {
    debug!(%id, operation, "No audio source with this id, ignoring");
    state.clone()
}
