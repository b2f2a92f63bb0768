//! Host environment signals
//!
//! Hosts (window systems, terminals, test harnesses) translate what they
//! observe into `HostEvent`s; each one maps onto an action record that is
//! dispatched like any other.

use serde_json::{json, Value};

use super::actions::{self, ActionRecord};

/// Events a host can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Viewport changed size
    WindowResized { width: u32, height: u32 },

    /// User toggled the global mute control
    MuteToggled(bool),

    /// Host is starting over (e.g. a new session)
    Reset,
}

impl From<HostEvent> for ActionRecord {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::WindowResized { width, height } => {
                actions::resize(json!({ "width": width, "height": height }))
            }
            HostEvent::MuteToggled(true) => actions::mute(Value::Null),
            HostEvent::MuteToggled(false) => actions::unmute(Value::Null),
            HostEvent::Reset => actions::reset(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{reduce, state::Size};

    #[test]
    fn test_window_resize_becomes_resize_action() {
        let record = ActionRecord::from(HostEvent::WindowResized {
            width: 1280,
            height: 720,
        });
        assert_eq!(record.kind, "resize");

        let state = reduce(None, &record);
        assert_eq!(state.size, Size::new(1280, 720));
    }

    #[test]
    fn test_mute_toggle() {
        let muted = reduce(None, &HostEvent::MuteToggled(true).into());
        assert!(muted.muted);

        let unmuted = reduce(Some(&muted), &HostEvent::MuteToggled(false).into());
        assert!(!unmuted.muted);
    }
}
