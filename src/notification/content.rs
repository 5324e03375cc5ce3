//! Notification content for the two cycle transitions.

/// Icon shipped with the application bundle.
pub const EYE_ICON: &str = "icons/eye.png";

/// Title of the notification sent when the work interval ends.
pub const TAKE_A_BREAK_TITLE: &str = "Take a break from the screen!";

/// Title of the notification sent when the break interval ends.
pub const BACK_TO_WORK_TITLE: &str = "Go back to work!";

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Summary line
    pub title: String,
    /// Body text
    pub body: String,
    /// Icon name or path
    pub icon: String,
}

impl NotificationPayload {
    /// Creates a payload from its parts.
    pub fn new(title: impl Into<String>, body: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: icon.into(),
        }
    }

    /// Sent when the work interval ends.
    #[must_use]
    pub fn take_a_break() -> Self {
        Self::new(TAKE_A_BREAK_TITLE, "Your eyes need to rest buddy.", EYE_ICON)
    }

    /// Sent when the break interval ends.
    #[must_use]
    pub fn back_to_work() -> Self {
        Self::new(BACK_TO_WORK_TITLE, "Yay!", EYE_ICON)
    }
}
