//! Messages exchanged with the host menu surface.
//!
//! Inbound, the host reports which menu item was clicked:
//!
//! ```json
//! {"message": "toggleTimer"}
//! ```
//!
//! Outbound, the daemon acknowledges each applied change so the host can
//! update the item's check-state:
//!
//! ```json
//! {"id": "toggleTimer", "msgType": "deactivate"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Preference;

/// Menu id of the start/stop item.
pub const TOGGLE_TIMER_ID: &str = "toggleTimer";

/// Menu id of the quit item.
pub const QUIT_ID: &str = "quit";

// ============================================================================
// MenuEvent
// ============================================================================

/// A click reported by the host menu surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEvent {
    /// Id of the clicked menu item
    pub message: String,
}

impl MenuEvent {
    /// Creates an event for the given menu item id.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Classifies the event.
    pub fn kind(&self) -> MenuEventKind<'_> {
        match self.message.as_str() {
            TOGGLE_TIMER_ID => MenuEventKind::CycleToggle,
            name if Preference::from_name(name).is_some() => MenuEventKind::PreferenceToggle(name),
            other => MenuEventKind::Other(other),
        }
    }

    /// Returns true if the host asked the application to exit.
    pub fn is_quit(&self) -> bool {
        self.message == QUIT_ID
    }
}

/// What an inbound event asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEventKind<'a> {
    /// Flip the named preference
    PreferenceToggle(&'a str),
    /// Start or stop the work/break cycle
    CycleToggle,
    /// Anything else; ignored
    Other(&'a str),
}

// ============================================================================
// MenuCommand
// ============================================================================

/// Target check-state carried by an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgType {
    /// The item is now on
    Activate,
    /// The item is now off
    Deactivate,
}

impl MsgType {
    /// Maps an "is now on" flag to a message type.
    pub fn from_active(active: bool) -> Self {
        if active {
            MsgType::Activate
        } else {
            MsgType::Deactivate
        }
    }

    /// Returns true for `Activate`.
    pub fn is_activate(&self) -> bool {
        *self == MsgType::Activate
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgType::Activate => "activate",
            MsgType::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement sent to the host after a state change was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCommand {
    /// Menu item id
    pub id: String,
    /// New check-state of the item
    #[serde(rename = "msgType")]
    pub msg_type: MsgType,
}

impl MenuCommand {
    /// Creates a command for the given item.
    pub fn new(id: impl Into<String>, msg_type: MsgType) -> Self {
        Self {
            id: id.into(),
            msg_type,
        }
    }

    /// Acknowledges a preference change.
    pub fn preference(preference: Preference, active: bool) -> Self {
        Self::new(preference.as_str(), MsgType::from_active(active))
    }

    /// Acknowledges a cycle start/stop.
    pub fn cycle(running: bool) -> Self {
        Self::new(TOGGLE_TIMER_ID, MsgType::from_active(running))
    }
}

// ============================================================================
// Tests
// ============================================================================
