//! Library state settings and their on-disk location.
//!
//! This module provides JSON-backed settings with XDG Base Directory
//! compliant paths.

pub mod settings;

pub use settings::{
    SettingsError, StateSettings, get_config_path, load_settings, save_settings,
};
