//! Configuration and settings persistence.
//!
//! Preferences live in a TOML file in the platform config directory,
//! organized into logical sections:
//! - Assist settings (completion webhook, API key reference)
//! - Export defaults (retention assumptions, package naming)
//! - UI preferences (theme, grid, last layer visibility)
//!
//! Load once at startup, overwrite the whole file on save, validate
//! before writing.

use secplan_core::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow system preference
    #[default]
    System,
    /// Force light theme
    Light,
    /// Force dark theme
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "System"),
            Self::Light => write!(f, "Light"),
            Self::Dark => write!(f, "Dark"),
        }
    }
}

/// Completion-service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistSettings {
    /// Completion webhook URL; empty disables AI features
    pub webhook_url: String,
    /// Bearer token for the webhook, if it requires one
    pub api_key: Option<String>,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            api_key: None,
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Assumed per-camera bitrate for the storage calculator, in Mbps
    pub camera_bitrate_mbps: f64,
    /// Assumed recording retention for the storage calculator, in days
    pub retention_days: u32,
    /// Include equipment photos in deliverables packages
    pub include_photos: bool,
    /// Auto-backup quiet period in seconds
    pub backup_debounce_secs: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            camera_bitrate_mbps: 4.0,
            retention_days: 30,
            include_photos: true,
            backup_debounce_secs: 30,
        }
    }
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Theme selection
    pub theme: Theme,
    /// Show the alignment grid by default
    pub show_grid: bool,
    /// Show FOV cones by default
    pub show_fov: bool,
    /// Default zoom step multiplier
    pub zoom_step: f64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            show_grid: false,
            show_fov: true,
            zoom_step: 1.2,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion-service settings
    #[serde(default)]
    pub assist: AssistSettings,
    /// Export defaults
    #[serde(default)]
    pub export: ExportSettings,
    /// UI preferences
    #[serde(default)]
    pub ui: UiSettings,
}

impl Config {
    /// The platform config directory for SecPlan.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("secplan"))
    }

    /// Default config file path.
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::default_path() else {
            warn!("no platform config directory, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file yet, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Load config from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| SettingsError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location, creating the directory if
    /// needed.
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::default_path() else {
            return Err(SettingsError::Io {
                path: "(none)".to_string(),
                reason: "no platform config directory".to_string(),
            }
            .into());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| SettingsError::Io {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        self.save_to_file(&path)
    }

    /// Save config to a specific TOML file, overwriting wholesale.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self).map_err(|e| SettingsError::Parse {
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Validate configuration before use or save.
    pub fn validate(&self) -> Result<()> {
        if !self.assist.webhook_url.is_empty()
            && !self.assist.webhook_url.starts_with("http://")
            && !self.assist.webhook_url.starts_with("https://")
        {
            return Err(SettingsError::Invalid {
                setting: "assist.webhook_url".to_string(),
                reason: "must be an http(s) URL".to_string(),
            }
            .into());
        }
        if self.export.camera_bitrate_mbps <= 0.0 {
            return Err(SettingsError::Invalid {
                setting: "export.camera_bitrate_mbps".to_string(),
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        if self.export.retention_days == 0 {
            return Err(SettingsError::Invalid {
                setting: "export.retention_days".to_string(),
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        if self.ui.zoom_step <= 1.0 {
            return Err(SettingsError::Invalid {
                setting: "ui.zoom_step".to_string(),
                reason: "must be > 1.0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
