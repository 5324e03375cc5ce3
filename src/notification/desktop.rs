//! Desktop notification host backed by `notify-rust`.
//!
//! Freedesktop notification servers have no per-application permission
//! model: if a server answers on the session bus, notifications are allowed.
//! macOS and Windows delivery through `notify-rust` is likewise ungated.

use notify_rust::Notification;

use super::error::NotificationError;
use super::{NotificationHost, NotificationPayload};
use crate::types::PermissionState;

/// Sends notifications through the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotificationHost {
    /// Application name shown by the notification server
    app_name: String,
}

impl DesktopNotificationHost {
    /// Creates a host that labels notifications with `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Returns the application name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn probe_server() -> Result<(), NotificationError> {
        let info = notify_rust::get_server_information()
            .map_err(|e| NotificationError::NotAvailable(e.to_string()))?;
        tracing::debug!(server = %info.name, version = %info.version, "Notification server found");
        Ok(())
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn probe_server() -> Result<(), NotificationError> {
        Ok(())
    }
}

impl NotificationHost for DesktopNotificationHost {
    fn permission_status(&self) -> PermissionState {
        match Self::probe_server() {
            Ok(()) => PermissionState::Granted,
            Err(e) => {
                tracing::debug!("Notification permission not yet known: {}", e);
                PermissionState::Unknown
            }
        }
    }

    fn request_permission(&self) -> PermissionState {
        match Self::probe_server() {
            Ok(()) => PermissionState::Granted,
            Err(e) => {
                tracing::warn!("Notifications disabled: {} ({})", e, e.suggestion());
                PermissionState::Denied
            }
        }
    }

    fn deliver(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        Notification::new()
            .appname(&self.app_name)
            .summary(&payload.title)
            .body(&payload.body)
            .icon(&payload.icon)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
