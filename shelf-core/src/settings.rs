//! Optional settings file for migration tunables.
//!
//! Lives at `~/.config/shelf-migrate/settings.toml` (platform config dir).
//! Every key is optional; command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::migrate::MigrationOptions;
use crate::types::{DEFAULT_CATEGORY_PREFIX, DEFAULT_MATCH_THRESHOLD, MIGRATED_CATEGORY_FLAG};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Contents of `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationSettings {
    pub matching: MatchingSettings,
    pub categories: CategorySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingSettings {
    pub threshold: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategorySettings {
    pub prefix: String,
    pub flags: i64,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CATEGORY_PREFIX.to_string(),
            flags: MIGRATED_CATEGORY_FLAG,
        }
    }
}

impl From<MigrationSettings> for MigrationOptions {
    fn from(settings: MigrationSettings) -> Self {
        Self {
            match_threshold: settings.matching.threshold,
            category_prefix: settings.categories.prefix,
            category_flags: settings.categories.flags,
        }
    }
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("shelf-migrate").join("settings.toml")
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<MigrationSettings, SettingsError> {
    if !path.exists() {
        log::debug!("No settings file at {}, using defaults", path.display());
        return Ok(MigrationSettings::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&contents).map_err(|e| SettingsError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}
