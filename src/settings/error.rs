//! Error types for the settings store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Settings store error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The backing file exists but could not be read or parsed,
    /// or the default file could not be created.
    #[error("Failed to load settings from {path:?}: {reason}")]
    Init {
        /// Path of the backing file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Persisting a new value failed. The previous value stays in effect.
    #[error("Failed to write settings to {path:?}: {source}")]
    Write {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The name is not a registered preference.
    #[error("Unknown preference: {0}")]
    UnknownPreference(String),

    /// `get`/`set` was called before a successful `initialize`.
    #[error("Settings store has not been initialized")]
    NotInitialized,
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_init() {
        let err = SettingsError::Init {
            path: PathBuf::from("/tmp/settings.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("settings.json"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_error_display_write() {
        let err = SettingsError::Write {
            path: PathBuf::from("/tmp/settings.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(err.to_string().contains("write"));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_error_display_unknown_preference() {
        let err = SettingsError::UnknownPreference("volume".to_string());
        assert_eq!(err.to_string(), "Unknown preference: volume");
    }
}
