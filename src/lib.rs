//! Blinker Library
//!
//! This library provides the core functionality of the Blinker screen-break
//! reminder. It includes:
//! - Work/break timer scheduling on named one-shot timers
//! - Persisted boolean preferences with defaults
//! - Notification permission gating and desktop delivery
//! - The host menu model and its event/acknowledgement protocol
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod menubar;
pub mod notification;
pub mod settings;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{CycleConfig, CyclePhase, PermissionState, Preference, TimerKey};

pub use daemon::{Daemon, MenuEventBridge, NamedTimers, TimerFired, TimerScheduler};

pub use notification::{
    DesktopNotificationHost, MockNotificationHost, NotificationError, NotificationGate,
    NotificationHost, NotificationPayload,
};

pub use menubar::{MenuBuilder, MenuCommand, MenuConfig, MenuEvent, MenuItemId, MsgType};

pub use settings::{SettingsError, SettingsStore};
