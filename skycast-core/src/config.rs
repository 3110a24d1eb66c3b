use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    coordinate::{self, Coordinate},
    metrics::RealFeelInputs,
    provider::open_meteo::DEFAULT_BASE_URL,
    session::FetchTimeouts,
};

/// A saved place to fetch forecasts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request timeouts in seconds, per forecast mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub current_secs: u64,
    pub daily_secs: u64,
    pub hourly_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        let d = FetchTimeouts::default();
        Self {
            current_secs: d.current.as_secs(),
            daily_secs: d.daily.as_secs(),
            hourly_secs: d.hourly.as_secs(),
        }
    }
}

impl From<TimeoutConfig> for FetchTimeouts {
    fn from(cfg: TimeoutConfig) -> Self {
        FetchTimeouts {
            current: Duration::from_secs(cfg.current_secs),
            daily: Duration::from_secs(cfg.daily_secs),
            hourly: Duration::from_secs(cfg.hourly_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeouts: TimeoutConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// real_feel = "rounded"
///
/// [location]
/// latitude = 49.2827
/// longitude = -123.1207
/// name = "Vancouver"
///
/// [api.timeouts]
/// daily_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub real_feel: RealFeelInputs,
    pub location: Option<LocationConfig>,
    pub api: ApiConfig,
}

impl Config {
    /// The stored default location, validated.
    pub fn default_location(&self) -> Result<Coordinate> {
        let loc = self.location.as_ref().ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: run `skycast configure` or pass --lat and --lon."
            )
        })?;

        coordinate::validate(loc.latitude, loc.longitude).with_context(|| {
            format!(
                "Configured location is invalid ({}, {})",
                loc.latitude, loc.longitude
            )
        })
    }

    /// Store a default location after validating it.
    pub fn set_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        name: Option<String>,
    ) -> Result<()> {
        coordinate::validate(latitude, longitude)?;
        self.location = Some(LocationConfig {
            latitude,
            longitude,
            name,
        });
        Ok(())
    }

    pub fn timeouts(&self) -> FetchTimeouts {
        self.api.timeouts.into()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_location().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default location configured"));
        assert!(msg.contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn set_location_validates() {
        let mut cfg = Config::default();

        assert!(cfg.set_location(95.0, 0.0, None).is_err());
        assert!(cfg.location.is_none());

        cfg.set_location(49.2827, -123.1207, Some("Vancouver".into()))
            .expect("valid location");
        let c = cfg.default_location().expect("location must exist");
        assert_eq!(c.latitude(), 49.2827);
        assert_eq!(c.longitude(), -123.1207);
    }

    #[test]
    fn hand_edited_bad_location_is_reported() {
        let cfg: Config = toml::from_str("[location]\nlatitude = 120.0\nlongitude = 0.0\n").unwrap();
        let err = cfg.default_location().unwrap_err();
        assert!(err.to_string().contains("Configured location is invalid"));
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg: Config = toml::from_str("[api.timeouts]\ndaily_secs = 3\n").unwrap();

        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.real_feel, RealFeelInputs::Rounded);

        let t = cfg.timeouts();
        assert_eq!(t.daily, Duration::from_secs(3));
        assert_eq!(t.current, Duration::from_secs(30));
        assert_eq!(t.hourly, Duration::from_secs(30));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_location(-33.8688, 151.2093, Some("Sydney".into())).unwrap();
        cfg.real_feel = RealFeelInputs::FullPrecision;
        cfg.api.timeouts.hourly_secs = 7;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn unparsable_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "location = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
