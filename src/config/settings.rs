//! Settings management with XDG Base Directory compliance.
//!
//! This module loads and saves the library state settings as JSON under the
//! user's config directory.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::{Path, PathBuf},
};

use {
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid settings value.
    #[error("Invalid settings value: {reason}")]
    InvalidValue { reason: String },
}

/// Serializable library state settings with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Capacity of the state change event channel.
    pub event_capacity: usize,
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Account whose collections the demo binary follows.
    pub demo_account_id: i64,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            event_capacity: 16,
            log_filter: "info".to_string(),
            demo_account_id: 0,
        }
    }
}

impl StateSettings {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` for a zero event capacity or an
    /// empty log filter.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.event_capacity == 0 {
            return Err(SettingsError::InvalidValue {
                reason: "event_capacity must be greater than zero".to_string(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                reason: "log_filter must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads settings from `path`, falling back to defaults if it does not exist.
///
/// # Errors
///
/// Returns `SettingsError` if the file cannot be read, parsed or validated.
pub fn load_settings(path: &Path) -> Result<StateSettings, SettingsError> {
    let settings = if path.exists() {
        debug!("Loading settings from existing file: {:?}", path);
        let contents = read_to_string(path)?;
        from_str(&contents)?
    } else {
        debug!("No settings file at {:?}, using defaults", path);
        StateSettings::default()
    };

    settings.validate()?;
    Ok(settings)
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns `SettingsError` if the settings cannot be written.
pub fn save_settings(path: &Path, settings: &StateSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    debug!("Saving settings to file: {:?}", path);
    write(path, to_string_pretty(settings)?)?;
    Ok(())
}

/// Ensures proper XDG directory usage for the settings file.
///
/// # Returns
///
/// The path to the configuration file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("moviedb-library");
    config_dir.push("settings.json");
    config_dir
}

/// Gets the XDG config home directory following XDG Base Directory specification.
///
/// Uses `XDG_CONFIG_HOME` environment variable if set, otherwise defaults to $HOME/.config
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use crate::config::settings::{
        SettingsError, StateSettings, get_config_path, load_settings, save_settings,
    };

    #[test]
    fn test_state_settings_default() {
        let settings = StateSettings::default();
        assert_eq!(settings.event_capacity, 16);
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.demo_account_id, 0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, StateSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = StateSettings {
            event_capacity: 64,
            log_filter: "moviedb_library=debug".to_string(),
            demo_account_id: 42,
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        write(&path, r#"{"demo_account_id": 7}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.demo_account_id, 7);
        assert_eq!(settings.event_capacity, 16);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        write(&path, r#"{"event_capacity": 0}"#).unwrap();

        let error = load_settings(&path).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid settings value: event_capacity must be greater than zero"
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        write(&path, "not json").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::SerializationError(_))
        ));
    }

    #[test]
    fn test_config_path_file_name() {
        let path = get_config_path();
        assert!(path.ends_with("moviedb-library/settings.json"));
    }
}
