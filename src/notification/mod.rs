//! User notifications gated on a once-per-process permission check.
//!
//! This module provides:
//!
//! - `NotificationHost`: the seam to the platform notification service
//! - `NotificationGate`: permission resolution cached for the process
//!   lifetime, plus best-effort delivery
//! - `DesktopNotificationHost`: the `notify-rust` backed host
//! - `MockNotificationHost`: a recording host for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blinker::notification::{DesktopNotificationHost, NotificationGate, NotificationPayload};
//!
//! # async fn demo() {
//! let gate = NotificationGate::new(Arc::new(DesktopNotificationHost::new("Blinker")));
//!
//! // Asks the host at most once per process
//! gate.resolve().await;
//!
//! // Silently dropped unless permission was granted
//! gate.notify_if_permitted(&NotificationPayload::take_a_break());
//! # }
//! ```

mod content;
mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

pub use self::content::{
    NotificationPayload, BACK_TO_WORK_TITLE, EYE_ICON, TAKE_A_BREAK_TITLE,
};
pub use self::desktop::DesktopNotificationHost;
pub use self::error::NotificationError;

use crate::types::PermissionState;

// ============================================================================
// NotificationHost
// ============================================================================

/// The platform side of notifications.
///
/// Implementations may block while talking to the host; the gate calls the
/// permission methods from the blocking thread pool.
pub trait NotificationHost: Send + Sync {
    /// Queries the current permission without prompting.
    fn permission_status(&self) -> PermissionState;

    /// Asks the user for permission and returns the answer.
    fn request_permission(&self) -> PermissionState;

    /// Displays a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the host could not display it.
    fn deliver(&self, payload: &NotificationPayload) -> Result<(), NotificationError>;
}

// ============================================================================
// NotificationGate
// ============================================================================

/// Resolves and caches whether the process may emit notifications.
pub struct NotificationGate {
    host: Arc<dyn NotificationHost>,
    /// Cached outcome, readable synchronously from timer handlers
    permission: RwLock<PermissionState>,
    /// Serializes `resolve` so the user is prompted at most once
    resolving: tokio::sync::Mutex<()>,
}

impl NotificationGate {
    /// Creates a gate in the `Unknown` state.
    pub fn new(host: Arc<dyn NotificationHost>) -> Self {
        Self {
            host,
            permission: RwLock::new(PermissionState::Unknown),
            resolving: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the cached permission state.
    pub fn permission(&self) -> PermissionState {
        *self
            .permission
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if the cached state allows notifications.
    pub fn is_granted(&self) -> bool {
        self.permission().is_granted()
    }

    /// Resolves the permission state.
    ///
    /// Returns the cached state when it is already granted or denied.
    /// Otherwise queries the host and, if not granted, prompts the user once
    /// and adopts the answer. Host calls run on the blocking pool so pending
    /// timers keep firing meanwhile.
    pub async fn resolve(&self) -> PermissionState {
        let _guard = self.resolving.lock().await;

        let cached = self.permission();
        if cached.is_resolved() {
            return cached;
        }

        let host = Arc::clone(&self.host);
        let outcome = tokio::task::spawn_blocking(move || {
            let status = host.permission_status();
            if status.is_granted() {
                status
            } else {
                host.request_permission()
            }
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Notification permission check failed: {}", e);
            PermissionState::Unknown
        });

        *self
            .permission
            .write()
            .unwrap_or_else(PoisonError::into_inner) = outcome;

        tracing::info!(permission = %outcome, "Notification permission resolved");
        outcome
    }

    /// Sends `payload` if `granted` is true; otherwise does nothing.
    ///
    /// Delivery failures are logged and swallowed.
    pub fn notify(&self, granted: bool, payload: &NotificationPayload) {
        if !granted {
            tracing::debug!(title = %payload.title, "Notification skipped: permission not granted");
            return;
        }

        match self.host.deliver(payload) {
            Ok(()) => tracing::debug!(title = %payload.title, "Notification sent"),
            Err(e) => tracing::warn!(title = %payload.title, "Notification not delivered: {}", e),
        }
    }

    /// Sends `payload` according to the cached permission state.
    pub fn notify_if_permitted(&self, payload: &NotificationPayload) {
        self.notify(self.is_granted(), payload);
    }
}

impl std::fmt::Debug for NotificationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationGate")
            .field("permission", &self.permission())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MockNotificationHost
// ============================================================================

#[derive(Debug)]
pub struct MockNotificationHost {
    status: Mutex<PermissionState>,
    request_response: Mutex<PermissionState>,
    status_queries: AtomicUsize,
    permission_requests: AtomicUsize,
    delivery_attempts: AtomicUsize,
    delivered: Mutex<Vec<NotificationPayload>>,
    should_fail: AtomicBool,
}

impl Default for MockNotificationHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationHost {
    /// A host that already grants permission.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(PermissionState::Granted, PermissionState::Granted)
    }

    /// A host reporting `status` when queried and answering `request_response`
    /// when prompted.
    #[must_use]
    pub fn with_permission(status: PermissionState, request_response: PermissionState) -> Self {
        Self {
            status: Mutex::new(status),
            request_response: Mutex::new(request_response),
            status_queries: AtomicUsize::new(0),
            permission_requests: AtomicUsize::new(0),
            delivery_attempts: AtomicUsize::new(0),
            delivered: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn delivered(&self) -> Vec<NotificationPayload> {
        self.delivered.lock().unwrap().clone()
    }

    #[must_use]
    pub fn delivered_titles(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.title.clone())
            .collect()
    }

    /// Every call to `deliver`, successful or not.
    #[must_use]
    pub fn delivery_attempts(&self) -> usize {
        self.delivery_attempts.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn status_queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

impl NotificationHost for MockNotificationHost {
    fn permission_status(&self) -> PermissionState {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        *self.status.lock().unwrap()
    }

    fn request_permission(&self) -> PermissionState {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let response = *self.request_response.lock().unwrap();
        *self.status.lock().unwrap() = response;
        response
    }

    fn deliver(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        self.delivery_attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.delivered.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
