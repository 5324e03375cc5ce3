//! Display utilities for the Blinker CLI.

use std::path::Path;

use crate::types::Preference;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the persisted preferences and where they live.
    pub fn show_settings(path: &Path, values: &[(Preference, bool)]) {
        print!("{}", Self::format_settings(path, values));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    fn format_settings(path: &Path, values: &[(Preference, bool)]) -> String {
        let mut out = format!("Settings: {}\n", path.display());
        for (preference, value) in values {
            out.push_str(&format!(
                "  {:<16} {}\n",
                preference.as_str(),
                Self::format_flag(*value)
            ));
        }
        out
    }

    fn format_flag(value: bool) -> &'static str {
        if value {
            "on"
        } else {
            "off"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
