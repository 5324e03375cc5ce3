//! Notification system error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
///
/// These never escape [`super::NotificationGate`]: delivery is best effort.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The host refused or failed to display the notification.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),

    /// No notification service is reachable.
    #[error("Notification service is not available: {0}")]
    NotAvailable(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "Check the system notification settings",
            Self::NotAvailable(_) => "Make sure a notification daemon is running",
        }
    }
}
