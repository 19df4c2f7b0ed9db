use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::emoji::DEFAULT_EMOJIS;
use crate::error::{ConfigError, ValidationError};
use crate::socket::ConnectParams;
use crate::validation::{validate_display_name, validate_room_name, validate_server_address};
use crate::widget::{WidgetOptions, DEFAULT_TIME_FORMAT};

// Default configuration
pub const DEFAULT_SERVER: &str = "127.0.0.1:3000";
pub const DEFAULT_ROOM: &str = "lobby";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// `host:port` of the chat server
    pub server: String,
    pub use_tls: bool,
    pub name: String,
    pub room: String,
    /// "dark" or "light"
    pub theme: String,
    /// Entries of the emoji picker, in display order
    pub emojis: Vec<String>,
    /// chrono format string for message timestamps
    pub time_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            use_tls: false,
            name: "guest".to_string(),
            room: DEFAULT_ROOM.to_string(),
            theme: "dark".to_string(),
            emojis: DEFAULT_EMOJIS.iter().map(|e| (*e).to_string()).collect(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Settings {
    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions {
            emojis: self.emojis.clone(),
            time_format: self.time_format.clone(),
            ..WidgetOptions::default()
        }
    }

    /// Validated connection parameters for the backend.
    pub fn connect_params(&self) -> Result<ConnectParams, ValidationError> {
        let (server, port) = validate_server_address(&self.server)?;
        Ok(ConnectParams {
            server,
            port,
            use_tls: self.use_tls,
            name: validate_display_name(&self.name)?,
            room: validate_room_name(&self.room)?,
        })
    }
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from("com", "fiaskchat", "fiaskchat-client").ok_or(ConfigError::NoConfigDir)?;
    Ok(proj.config_dir().join("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Settings from the default location, or defaults if there are none.
pub fn load_settings() -> Settings {
    let path = match settings_path() {
        Ok(path) => path,
        Err(e) => {
            log::warn!("{e}; using default settings");
            return Settings::default();
        }
    };

    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No settings at {}; using defaults", path.display());
            Settings::default()
        }
        Err(e) => {
            log::warn!("Ignoring settings at {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_string_pretty(settings)?;
    fs::write(path, data)?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    save_settings_to(&settings_path()?, settings)
}
