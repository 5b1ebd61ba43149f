//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppshotError, AppshotResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial preview settings.
    #[serde(default)]
    pub preview: PreviewDefaults,

    /// Export naming and destination.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Optional JSON device table that replaces the built-in profiles.
    #[serde(default)]
    pub devices_file: Option<PathBuf>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Preview state used before the user picks anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewDefaults {
    /// Device profile id selected at startup.
    pub device_id: String,

    /// Whether the dark frame theme is active at startup.
    pub dark_mode: bool,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Leading component of exported file names (`<prefix>_<device>_<millis>.png`).
    pub file_prefix: String,

    /// Directory exported files are written into.
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "appshot_render_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for PreviewDefaults {
    fn default() -> Self {
        Self {
            device_id: "iphone-14".to_string(),
            dark_mode: false,
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            file_prefix: "AppShot".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// A missing file is normal; an unreadable or malformed one is logged
    /// and ignored.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::read(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Ignoring config file");
                Self::default()
            }
        }
    }

    /// Read and parse a config file.
    pub fn read(path: &Path) -> AppshotResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppshotError::config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
            .map_err(|e| AppshotError::config(format!("Invalid config {}: {e}", path.display())))
    }

    /// Parse a config document. Missing sections take their defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Save config to the standard location and return that path.
    pub fn save(&self) -> AppshotResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Write config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> AppshotResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location: `$XDG_CONFIG_HOME/appshot/config.json`.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("appshot").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_app() {
        let config = AppConfig::default();
        assert_eq!(config.preview.device_id, "iphone-14");
        assert!(!config.preview.dark_mode);
        assert_eq!(config.export.file_prefix, "AppShot");
        assert!(config.devices_file.is_none());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config =
            AppConfig::from_json(r#"{ "preview": { "device_id": "pixel-7", "dark_mode": true } }"#)
                .unwrap();
        assert_eq!(config.preview.device_id, "pixel-7");
        assert!(config.preview.dark_mode);
        assert_eq!(config.export.file_prefix, "AppShot");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config = AppConfig::from_json(r#"{ "export": { "output_dir": "shots" } }"#).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("shots"));
        assert_eq!(config.export.file_prefix, "AppShot");
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = AppConfig::default();
        config.export.file_prefix = "Mockup".to_string();
        config.devices_file = Some(PathBuf::from("/etc/appshot/devices.json"));

        let json = serde_json::to_string(&config).unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed.export.file_prefix, "Mockup");
        assert_eq!(
            parsed.devices_file,
            Some(PathBuf::from("/etc/appshot/devices.json"))
        );
    }

    #[test]
    fn test_save_then_read_round_trips() {
        let dir = std::env::temp_dir().join("appshot_test_config_save");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("appshot").join("config.json");

        let mut config = AppConfig::default();
        config.preview.dark_mode = true;
        config.logging.file = Some(PathBuf::from("appshot.log"));
        config.save_to(&path).unwrap();

        let read = AppConfig::read(&path).unwrap();
        assert!(read.preview.dark_mode);
        assert_eq!(read.logging.file, Some(PathBuf::from("appshot.log")));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = std::env::temp_dir().join("appshot_test_config_malformed");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ \"preview\": 3 }").unwrap();

        let err = AppConfig::read(&path).unwrap_err();
        assert!(matches!(err, AppshotError::Config { .. }));
        assert!(err.to_string().contains("config.json"));

        let missing = AppConfig::read(&dir.join("absent.json")).unwrap_err();
        assert!(matches!(missing, AppshotError::Config { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
