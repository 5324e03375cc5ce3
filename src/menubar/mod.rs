//! Host menu surface for Blinker.
//!
//! This module provides:
//! - `event.rs`: inbound click events and outbound acknowledgement commands
//! - `menu.rs`: the tray menu layout and its check-state
//!
//! Both are platform-independent; the daemon talks to an actual host through
//! [`crate::daemon::host`].

pub mod event;
pub mod menu;

pub use event::{MenuCommand, MenuEvent, MenuEventKind, MsgType, QUIT_ID, TOGGLE_TIMER_ID};
pub use menu::{
    MenuBuilder, MenuConfig, MenuError, MenuItemConfig, MenuItemId, START_TIMER_LABEL,
    STOP_TIMER_LABEL,
};
