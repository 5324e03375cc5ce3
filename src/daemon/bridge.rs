//! Menu event bridge.
//!
//! Translates clicks from the host menu into settings and scheduler
//! operations, then acknowledges each applied change back to the host.

use crossbeam_channel::Sender;

use crate::menubar::{MenuCommand, MenuEvent, MenuEventKind, MsgType};
use crate::settings::{SettingsError, SettingsStore};
use crate::types::Preference;

use super::timer::TimerScheduler;

/// Handles inbound menu events and emits acknowledgement commands.
#[derive(Debug, Clone)]
pub struct MenuEventBridge {
    /// Outbound channel to the host menu surface
    ack_tx: Sender<MenuCommand>,
}

impl MenuEventBridge {
    /// Creates a bridge that acknowledges through `ack_tx`.
    pub fn new(ack_tx: Sender<MenuCommand>) -> Self {
        Self { ack_tx }
    }

    /// Applies an inbound event.
    ///
    /// Returns the acknowledgement that was sent, or `None` for events that
    /// are not recognized.
    ///
    /// # Errors
    ///
    /// Propagates store errors from preference toggles. Nothing is
    /// acknowledged in that case.
    pub fn handle(
        &self,
        event: &MenuEvent,
        store: &mut SettingsStore,
        scheduler: &mut TimerScheduler,
    ) -> Result<Option<MenuCommand>, SettingsError> {
        match event.kind() {
            MenuEventKind::PreferenceToggle(name) => self.toggle_preference(name, store).map(Some),
            MenuEventKind::CycleToggle => Ok(Some(self.toggle_cycle(scheduler))),
            MenuEventKind::Other(message) => {
                tracing::debug!(message = %message, "Ignoring menu event");
                Ok(None)
            }
        }
    }

    /// Flips a preference and acknowledges its new value.
    pub fn toggle_preference(
        &self,
        name: &str,
        store: &mut SettingsStore,
    ) -> Result<MenuCommand, SettingsError> {
        let previous = store.get(name)?;
        store.set(name, !previous)?;
        tracing::info!(preference = %name, value = !previous, "Preference toggled");

        Ok(self.acknowledge(MenuCommand::new(name, MsgType::from_active(!previous))))
    }

    /// Starts or stops the cycle and acknowledges the new state.
    pub fn toggle_cycle(&self, scheduler: &mut TimerScheduler) -> MenuCommand {
        let was_running = scheduler.toggle();
        self.acknowledge(MenuCommand::cycle(!was_running))
    }

    /// Tells the host which persisted preferences are on.
    ///
    /// Sends one `activate` command per preference whose value is `true`.
    pub fn sync_preferences(&self, store: &SettingsStore) -> Result<Vec<MenuCommand>, SettingsError> {
        let mut sent = Vec::new();
        for preference in Preference::ALL {
            if store.get_preference(preference)? {
                sent.push(self.acknowledge(MenuCommand::preference(preference, true)));
            }
        }
        Ok(sent)
    }

    fn acknowledge(&self, command: MenuCommand) -> MenuCommand {
        if self.ack_tx.send(command.clone()).is_err() {
            tracing::warn!(id = %command.id, "Menu surface disconnected; acknowledgement dropped");
        } else {
            tracing::debug!(id = %command.id, msg_type = %command.msg_type, "Acknowledgement sent");
        }
        command
    }
}

// ============================================================================
// Tests
// ============================================================================
