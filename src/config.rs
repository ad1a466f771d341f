//! Configuration file support for the TAF decoder.
//!
//! Loads settings from `~/.config/taf-decoder/config.toml` on Linux
//! (or platform-appropriate location on other OSes).

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{AVIATION_WEATHER_URL, DEFAULT_TIMEOUT, WeatherClientConfig};
use crate::radar::DEFAULT_REGION;

/// Application configuration loaded from TOML file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the aviation weather data API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Airport to fetch when none is given on the command line.
    pub default_airport: String,

    /// Radar region shown by default.
    pub radar_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: AVIATION_WEATHER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            default_airport: "KJFK".to_string(),
            radar_region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taf-decoder/config.toml"))
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if !is_icao_code(&self.default_airport) {
            bail!(
                "default_airport must be a 4-character ICAO code, got {:?}",
                self.default_airport
            );
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn client_config(&self) -> WeatherClientConfig {
        WeatherClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Whether `code` looks like an ICAO station identifier.
pub fn is_icao_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric())
}
