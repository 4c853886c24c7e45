//! Persisted user preferences — currently just the theme flag.
//!
//! A tiny JSON key-value file. Loads are tolerant (missing or corrupt file
//! falls back to defaults); saves go through a write-then-rename so a crash
//! mid-write can never leave a torn file behind.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The on-disk shape. Unknown keys are ignored on load so older builds can
/// read newer files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Config {
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme
            .as_deref()
            .and_then(ThemeMode::from_str)
            .unwrap_or_default()
    }
}

/// Handle to the config file location.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$DUALITY_CONFIG`, or `~/.config/duality/config.json`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os("DUALITY_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        home.join(".config").join("duality").join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config; any failure degrades to defaults. A broken
    /// preferences file should never keep the app from starting.
    pub fn load(&self) -> Config {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Persist the config atomically (write to a sibling temp file, then
    /// rename over the target).
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
