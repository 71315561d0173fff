use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    archive::{OPEN_METEO_ARCHIVE_URL, OpenMeteoArchive},
    table::{DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS},
    validate,
};

/// User preferences stored on disk. Fetched data is never written here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive endpoint, e.g. "https://archive-api.open-meteo.com/v1/archive".
    pub archive_url: String,

    /// Coordinate pre-filled into new sessions, kept as typed text.
    pub default_latitude: String,
    pub default_longitude: String,

    /// One of 10, 20 or 50.
    pub rows_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_url: OPEN_METEO_ARCHIVE_URL.to_string(),
            default_latitude: "40.7128".to_string(),
            default_longitude: "-74.0060".to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.check()?;
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-history", "weather-history")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Reject values a session could not start from.
    pub fn check(&self) -> Result<()> {
        if self.archive_url.trim().is_empty() {
            return Err(anyhow!("archive_url must not be empty"));
        }
        if !validate::validate_latitude(&self.default_latitude) {
            return Err(anyhow!(
                "default_latitude '{}' is not a number between -90 and 90",
                self.default_latitude
            ));
        }
        if !validate::validate_longitude(&self.default_longitude) {
            return Err(anyhow!(
                "default_longitude '{}' is not a number between -180 and 180",
                self.default_longitude
            ));
        }
        if !ROWS_PER_PAGE_OPTIONS.contains(&self.rows_per_page) {
            return Err(anyhow!(
                "rows_per_page must be one of {:?}, got {}",
                ROWS_PER_PAGE_OPTIONS,
                self.rows_per_page
            ));
        }
        Ok(())
    }

    pub fn archive(&self) -> OpenMeteoArchive {
        OpenMeteoArchive::new(self.archive_url.clone())
    }
}
