//! Core data types for Blinker.
//!
//! This module defines the data structures used for:
//! - Persisted preferences and their defaults
//! - Named timer keys and the derived cycle phase
//! - Notification permission state
//! - Cycle configuration with validation

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Preference
// ============================================================================

/// A persisted boolean user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preference {
    /// Launch the application on system startup
    LaunchOnStartup,
    /// Play sounds with notifications
    PlaySound,
}

impl Preference {
    /// Every registered preference, in the order they are persisted.
    pub const ALL: [Preference; 2] = [Preference::LaunchOnStartup, Preference::PlaySound];

    /// Returns the persisted name of the preference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::LaunchOnStartup => "launchOnStartup",
            Preference::PlaySound => "playSound",
        }
    }

    /// Returns the value applied when nothing has been persisted yet.
    pub fn default_value(&self) -> bool {
        match self {
            Preference::LaunchOnStartup => true,
            Preference::PlaySound => true,
        }
    }

    /// Looks up a preference by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerKey
// ============================================================================

/// Identifies one of the two named timers driving the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// The work interval timer
    Main,
    /// The break interval timer
    Break,
}

impl TimerKey {
    /// Returns the string representation of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKey::Main => "main",
            TimerKey::Break => "break",
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CyclePhase
// ============================================================================

/// Observable phase of the work/break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    /// No timer pending
    #[default]
    Idle,
    /// Main timer pending
    Working,
    /// Break timer pending
    OnBreak,
}

impl CyclePhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Working => "working",
            CyclePhase::OnBreak => "on_break",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PermissionState
// ============================================================================

/// Whether the process may emit user-visible notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Not resolved yet
    #[default]
    Unknown,
    /// Notifications are allowed
    Granted,
    /// Notifications were refused
    Denied,
}

impl PermissionState {
    /// Returns true if notifications may be sent.
    pub fn is_granted(&self) -> bool {
        *self == PermissionState::Granted
    }

    /// Returns true once the state is either granted or denied.
    pub fn is_resolved(&self) -> bool {
        *self != PermissionState::Unknown
    }

    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Unknown => "unknown",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CycleConfig
// ============================================================================

/// Work interval: 20 minutes of screen time.
pub const DEFAULT_WORK_INTERVAL: Duration = Duration::from_secs(20 * 60);

/// Break interval: 20 seconds looking away.
pub const DEFAULT_BREAK_INTERVAL: Duration = Duration::from_secs(20);

/// Durations of the work/break cycle, fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    /// Time spent working before a break is prompted
    pub work_interval: Duration,
    /// Time spent on a break before returning to work
    pub break_interval: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            work_interval: DEFAULT_WORK_INTERVAL,
            break_interval: DEFAULT_BREAK_INTERVAL,
        }
    }
}

impl CycleConfig {
    /// Creates a configuration with explicit durations.
    pub fn new(work_interval: Duration, break_interval: Duration) -> Self {
        Self {
            work_interval,
            break_interval,
        }
    }

    /// Returns the duration armed for the given timer key.
    pub fn interval_for(&self, key: TimerKey) -> Duration {
        match key {
            TimerKey::Main => self.work_interval,
            TimerKey::Break => self.break_interval,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_interval.is_zero() {
            return Err("work interval must be greater than zero".to_string());
        }
        if self.break_interval.is_zero() {
            return Err("break interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod preference_tests {
        use super::*;

        #[test]
        fn test_as_str() {
            assert_eq!(Preference::LaunchOnStartup.as_str(), "launchOnStartup");
            assert_eq!(Preference::PlaySound.as_str(), "playSound");
        }

        #[test]
        fn test_defaults_are_true() {
            for preference in Preference::ALL {
                assert!(preference.default_value());
            }
        }

        #[test]
        fn test_from_name() {
            assert_eq!(
                Preference::from_name("playSound"),
                Some(Preference::PlaySound)
            );
            assert_eq!(
                Preference::from_name("launchOnStartup"),
                Some(Preference::LaunchOnStartup)
            );
            assert_eq!(Preference::from_name("toggleTimer"), None);
            assert_eq!(Preference::from_name("PlaySound"), None);
        }

        #[test]
        fn test_serde_names_match_as_str() {
            for preference in Preference::ALL {
                let json = serde_json::to_string(&preference).unwrap();
                assert_eq!(json, format!("\"{}\"", preference.as_str()));
            }
        }
    }

    mod permission_state_tests {
        use super::*;

        #[test]
        fn test_default_is_unknown() {
            assert_eq!(PermissionState::default(), PermissionState::Unknown);
            assert!(!PermissionState::Unknown.is_resolved());
        }

        #[test]
        fn test_only_granted_allows_notifications() {
            assert!(PermissionState::Granted.is_granted());
            assert!(!PermissionState::Denied.is_granted());
            assert!(!PermissionState::Unknown.is_granted());
        }
    }

    mod cycle_config_tests {
        use super::*;

        #[test]
        fn test_default_durations() {
            let config = CycleConfig::default();
            assert_eq!(config.work_interval, Duration::from_secs(1200));
            assert_eq!(config.break_interval, Duration::from_secs(20));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_interval_for() {
            let config = CycleConfig::new(Duration::from_secs(10), Duration::from_secs(3));
            assert_eq!(config.interval_for(TimerKey::Main), Duration::from_secs(10));
            assert_eq!(config.interval_for(TimerKey::Break), Duration::from_secs(3));
        }

        #[test]
        fn test_validate_zero_work() {
            let config = CycleConfig::new(Duration::ZERO, Duration::from_secs(3));
            let err = config.validate().unwrap_err();
            assert!(err.contains("work interval"));
        }

        #[test]
        fn test_validate_zero_break() {
            let config = CycleConfig::new(Duration::from_secs(10), Duration::ZERO);
            let err = config.validate().unwrap_err();
            assert!(err.contains("break interval"));
        }
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CyclePhase::Idle.to_string(), "idle");
        assert_eq!(CyclePhase::Working.to_string(), "working");
        assert_eq!(CyclePhase::OnBreak.to_string(), "on_break");
        assert_eq!(CyclePhase::default(), CyclePhase::Idle);
    }

    #[test]
    fn test_timer_key_display() {
        assert_eq!(TimerKey::Main.to_string(), "main");
        assert_eq!(TimerKey::Break.to_string(), "break");
    }
}
