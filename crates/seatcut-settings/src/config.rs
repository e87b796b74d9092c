//! Configuration file handling for SeatCut
//!
//! Configuration is organized into sections:
//! - Planner parameters (units, retract height, depths, tolerances)
//! - Discovery (helper URL, demo mode)
//! - Connection timeouts
//! - Job naming
//!
//! Files are JSON or TOML, chosen by extension, and live in the platform
//! config directory by default.

use crate::error::{SettingsError, SettingsResult};
pub use seatcut_camtools::PlannerConfig;
use seatcut_communication::discovery::DEFAULT_HELPER_URL;
use seatcut_communication::{DiscoveryOptions, TransportOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "seatcut";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Discovery helper settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Base URL of the tool-minder helper
    pub helper_url: String,
    /// Use the public demo tool instead of querying the helper
    pub demo_mode: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            helper_url: DEFAULT_HELPER_URL.to_string(),
            demo_mode: false,
        }
    }
}

impl DiscoverySettings {
    pub fn to_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            helper_url: self.helper_url.clone(),
            demo_mode: self.demo_mode,
        }
    }
}

/// Connection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        let options = TransportOptions::default();
        Self {
            connect_timeout_ms: options.connect_timeout_ms,
            request_timeout_ms: options.request_timeout_ms,
        }
    }
}

impl ConnectionSettings {
    pub fn to_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout_ms: self.connect_timeout_ms,
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Job naming settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Filename the program is uploaded as
    pub filename: String,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            filename: "stool.nc".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path planner parameters
    pub planner: PlannerConfig,
    /// Tool discovery
    pub discovery: DiscoverySettings,
    /// HTTP timeouts
    pub connection: ConnectionSettings,
    /// Job naming
    pub job: JobSettings,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/seatcut/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("Using default configuration: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.planner.validate()?;

        if self.discovery.helper_url.trim().is_empty() {
            return Err(SettingsError::invalid(
                "discovery.helper_url",
                "must not be empty",
            ));
        }

        if self.connection.connect_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "connection.connect_timeout_ms",
                "must be > 0",
            ));
        }

        if self.connection.request_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "connection.request_timeout_ms",
                "must be > 0",
            ));
        }

        if self.job.filename.trim().is_empty() {
            return Err(SettingsError::invalid("job.filename", "must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.planner.retract_height, 0.5);
        assert_eq!(config.planner.depths, vec![-0.09, -0.1]);
        assert_eq!(config.discovery.helper_url, "http://localhost:8080");
        assert!(!config.discovery.demo_mode);
        assert_eq!(config.connection.connect_timeout_ms, 5_000);
        assert_eq!(config.connection.request_timeout_ms, 30_000);
        assert_eq!(config.job.filename, "stool.nc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_depth_above_retract() {
        let mut config = Config::new();
        config.planner.depths = vec![0.6];
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Planner(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::new();
        config.connection.request_timeout_ms = 0;
        match config.validate() {
            Err(SettingsError::InvalidSetting { key, .. }) => {
                assert_eq!(key, "connection.request_timeout_ms")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_filename() {
        let mut config = Config::new();
        config.job.filename = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_option_conversion() {
        let mut config = Config::new();
        config.discovery.demo_mode = true;
        config.connection.connect_timeout_ms = 1_500;

        let discovery = config.discovery.to_options();
        assert!(discovery.demo_mode);
        assert_eq!(discovery.helper_url, "http://localhost:8080");
        assert_eq!(config.connection.to_options().connect_timeout_ms, 1_500);
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("seatcut/config.toml"));
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::new()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}
