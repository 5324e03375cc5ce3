//! Tray menu layout and check-state.
//!
//! This module mirrors the host tray menu so acknowledgement commands can be
//! applied and inspected without a platform tray:
//! - `toggleTimer` swaps its label between "Stop the timer" and "Start the timer"
//! - preference items toggle their selected flag

use std::fmt;

use thiserror::Error;

use super::event::MenuCommand;

/// Label of the start/stop item while the cycle runs.
pub const STOP_TIMER_LABEL: &str = "Stop the timer";

/// Label of the start/stop item while the cycle is stopped.
pub const START_TIMER_LABEL: &str = "Start the timer";

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for tray menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Start/stop the cycle
    ToggleTimer,
    /// Launch on system startup preference
    LaunchOnStartup,
    /// Play sounds preference
    PlaySound,
    /// Show the about window
    ShowAbout,
    /// Quit the application
    Quit,
}

impl MenuItemId {
    /// Every item, in menu order.
    pub const ALL: [MenuItemId; 5] = [
        MenuItemId::ToggleTimer,
        MenuItemId::LaunchOnStartup,
        MenuItemId::PlaySound,
        MenuItemId::ShowAbout,
        MenuItemId::Quit,
    ];

    /// Returns the id used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemId::ToggleTimer => "toggleTimer",
            MenuItemId::LaunchOnStartup => "launchOnStartup",
            MenuItemId::PlaySound => "playSound",
            MenuItemId::ShowAbout => "showAbout",
            MenuItemId::Quit => "quit",
        }
    }

    /// Looks up an item by its wire id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == id)
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MenuItemConfig / MenuConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Item identifier
    pub id: MenuItemId,
    /// Display text
    pub text: String,
    /// Check-mark state (only meaningful for preference items)
    pub selected: bool,
}

impl MenuItemConfig {
    /// Creates a new, unselected menu item.
    pub fn new(id: MenuItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            selected: false,
        }
    }
}

/// Error applying an acknowledgement to the menu.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// The command names an item the menu does not contain.
    #[error("Unknown menu item: {0}")]
    UnknownItem(String),
}

/// The complete tray menu.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    items: Vec<MenuItemConfig>,
}

impl MenuConfig {
    /// Returns the items in menu order.
    pub fn items(&self) -> &[MenuItemConfig] {
        &self.items
    }

    /// Returns the item with the given id.
    pub fn item(&self, id: MenuItemId) -> Option<&MenuItemConfig> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Applies an acknowledgement command and returns the updated item.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::UnknownItem`] if `command.id` is not a menu item.
    pub fn apply(&mut self, command: &MenuCommand) -> Result<&MenuItemConfig, MenuError> {
        let id = MenuItemId::from_id(&command.id)
            .ok_or_else(|| MenuError::UnknownItem(command.id.clone()))?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| MenuError::UnknownItem(command.id.clone()))?;

        let active = command.msg_type.is_activate();
        if id == MenuItemId::ToggleTimer {
            item.text = if active {
                STOP_TIMER_LABEL.to_string()
            } else {
                START_TIMER_LABEL.to_string()
            };
        } else {
            item.selected = active;
        }

        Ok(item)
    }
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds the initial tray menu.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    /// Creates a new MenuBuilder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the menu as it appears at launch: the cycle is running and no
    /// preference is checked until the persisted values are synced.
    pub fn build(&self) -> MenuConfig {
        MenuConfig {
            items: vec![
                MenuItemConfig::new(MenuItemId::ToggleTimer, STOP_TIMER_LABEL),
                MenuItemConfig::new(
                    MenuItemId::LaunchOnStartup,
                    "Launch the application on system startup",
                ),
                MenuItemConfig::new(MenuItemId::PlaySound, "Play sounds with notifications"),
                MenuItemConfig::new(MenuItemId::ShowAbout, "About Blinker"),
                MenuItemConfig::new(MenuItemId::Quit, "Quit"),
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
