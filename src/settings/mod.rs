//! Persisted user preferences.
//!
//! Preferences are stored as a flat JSON object of booleans:
//!
//! ```json
//! {
//!   "launchOnStartup": true,
//!   "playSound": true
//! }
//! ```
//!
//! The whole object is rewritten on every `set`, through a temporary sibling
//! file that is renamed into place.
//!
//! # Example
//!
//! ```no_run
//! use blinker::settings::SettingsStore;
//!
//! let mut store = SettingsStore::new("/tmp/blinker/settings.json");
//! store.initialize()?;
//!
//! let play_sound = store.get("playSound")?;
//! store.set("playSound", !play_sound)?;
//! # Ok::<(), blinker::settings::SettingsError>(())
//! ```

pub mod error;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use error::{Result, SettingsError};

use crate::types::Preference;

/// Directory created under the platform config dir.
pub const APP_DIR_NAME: &str = "blinker";

/// File name of the preferences document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Returns the default location of the preferences file
/// (e.g. `~/.config/blinker/settings.json` on Linux).
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

fn defaults() -> BTreeMap<String, bool> {
    Preference::ALL
        .into_iter()
        .map(|p| (p.as_str().to_string(), p.default_value()))
        .collect()
}

// ============================================================================
// SettingsStore
// ============================================================================

/// Durable key-value storage of boolean preferences with typed defaults.
#[derive(Debug)]
pub struct SettingsStore {
    /// Backing file
    path: PathBuf,
    /// Current values; `None` until `initialize` succeeds
    values: Option<BTreeMap<String, bool>>,
}

impl SettingsStore {
    /// Creates a store backed by the given file. Nothing is read until
    /// [`SettingsStore::initialize`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: None,
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.values.is_some()
    }

    /// Loads the preferences from the backing file, creating it with the
    /// defaults if it does not exist.
    ///
    /// Calling this again reloads from the file; an existing file is never
    /// reset to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Init`] if the file exists but cannot be read
    /// or parsed, or if the default file cannot be created.
    pub fn initialize(&mut self) -> Result<()> {
        let values = if self.path.exists() {
            self.load()?
        } else {
            let values = defaults();
            write_atomic(&self.path, &values).map_err(|e| self.init_error(e))?;
            tracing::info!(path = ?self.path, "Created settings file with defaults");
            values
        };

        self.values = Some(values);
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, bool>> {
        let data = fs::read_to_string(&self.path).map_err(|e| self.init_error(e))?;
        let stored: BTreeMap<String, bool> =
            serde_json::from_str(&data).map_err(|e| self.init_error(e))?;

        let mut values = defaults();
        for (name, value) in stored {
            match values.get_mut(&name) {
                Some(slot) => *slot = value,
                None => tracing::debug!(preference = %name, "Ignoring unregistered preference"),
            }
        }
        Ok(values)
    }

    fn init_error(&self, reason: impl fmt::Display) -> SettingsError {
        SettingsError::Init {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    /// Returns the current value of a preference.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownPreference`] if `name` is not a
    /// registered preference, or [`SettingsError::NotInitialized`].
    pub fn get(&self, name: &str) -> Result<bool> {
        ensure_registered(name)?;
        let values = self.values.as_ref().ok_or(SettingsError::NotInitialized)?;
        values
            .get(name)
            .copied()
            .ok_or_else(|| SettingsError::UnknownPreference(name.to_string()))
    }

    /// Persists a new value for a preference before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] if the file cannot be written; the
    /// in-memory value is left unchanged in that case.
    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        ensure_registered(name)?;
        let values = self.values.as_ref().ok_or(SettingsError::NotInitialized)?;

        let mut next = values.clone();
        next.insert(name.to_string(), value);

        write_atomic(&self.path, &next).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;

        self.values = Some(next);
        tracing::debug!(preference = %name, value, "Preference saved");
        Ok(())
    }

    /// Typed variant of [`SettingsStore::get`].
    pub fn get_preference(&self, preference: Preference) -> Result<bool> {
        self.get(preference.as_str())
    }

    /// Typed variant of [`SettingsStore::set`].
    pub fn set_preference(&mut self, preference: Preference, value: bool) -> Result<()> {
        self.set(preference.as_str(), value)
    }

    /// Returns every registered preference with its current value.
    pub fn snapshot(&self) -> Result<Vec<(Preference, bool)>> {
        Preference::ALL
            .into_iter()
            .map(|p| self.get_preference(p).map(|value| (p, value)))
            .collect()
    }
}

fn ensure_registered(name: &str) -> Result<()> {
    match Preference::from_name(name) {
        Some(_) => Ok(()),
        None => Err(SettingsError::UnknownPreference(name.to_string())),
    }
}

/// Writes the whole preference set to a temporary sibling and renames it
/// over the target.
fn write_atomic(path: &Path, values: &BTreeMap<String, bool>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(values).map_err(io::Error::other)?;

    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
