use crate::application::LayoutSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "NAVDECK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "navdeck.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavdeckConfig {
    pub breakpoint_cols: u16,
    pub side_panel_width: u16,
    pub sheet_height_percent: u16,
    pub drag_close_threshold: u16,
    pub transition_ticks: u8,
    pub loader_delay_ms: u64,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl Default for NavdeckConfig {
    fn default() -> Self {
        let layout = LayoutSettings::default();
        Self {
            breakpoint_cols: layout.breakpoint_cols,
            side_panel_width: layout.side_panel_width,
            sheet_height_percent: layout.sheet_height_percent,
            drag_close_threshold: 3,
            transition_ticks: layout.transition_ticks,
            loader_delay_ms: 400,
            log_file: PathBuf::from("navdeck.log"),
            log_filter: "info".to_string(),
        }
    }
}

impl NavdeckConfig {
    pub fn layout(&self) -> LayoutSettings {
        LayoutSettings {
            breakpoint_cols: self.breakpoint_cols,
            side_panel_width: self.side_panel_width,
            sheet_height_percent: self.sheet_height_percent,
            transition_ticks: self.transition_ticks,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoint_cols == 0 {
            return Err(ConfigError::Invalid("breakpoint_cols must be positive".to_string()));
        }
        if self.side_panel_width == 0 {
            return Err(ConfigError::Invalid("side_panel_width must be positive".to_string()));
        }
        if !(1..=100).contains(&self.sheet_height_percent) {
            return Err(ConfigError::Invalid(format!(
                "sheet_height_percent must be within 1..=100, got {}",
                self.sheet_height_percent
            )));
        }
        if self.drag_close_threshold == 0 {
            return Err(ConfigError::Invalid(
                "drag_close_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigRepository;

impl ConfigRepository {
    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<NavdeckConfig, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(NavdeckConfig::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: NavdeckConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Path named by `NAVDECK_CONFIG`, or `navdeck.json` in the working
    /// directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn save(config: &NavdeckConfig, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = ConfigRepository::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, NavdeckConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navdeck.json");
        fs::write(&path, r#"{ "breakpoint_cols": 72, "log_filter": "navdeck=debug" }"#).unwrap();

        let config = ConfigRepository::load(&path).unwrap();
        assert_eq!(config.breakpoint_cols, 72);
        assert_eq!(config.log_filter, "navdeck=debug");
        assert_eq!(config.side_panel_width, NavdeckConfig::default().side_panel_width);
        assert_eq!(config.layout().breakpoint_cols, 72);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navdeck.json");
        fs::write(&path, r#"{ "breakpoint": 72 }"#).unwrap();

        let err = ConfigRepository::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("navdeck.json"));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navdeck.json");
        fs::write(&path, r#"{ "sheet_height_percent": 140 }"#).unwrap();

        let err = ConfigRepository::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("navdeck.json");
        let config = NavdeckConfig {
            breakpoint_cols: 90,
            drag_close_threshold: 5,
            ..NavdeckConfig::default()
        };

        ConfigRepository::save(&config, &path).unwrap();
        assert_eq!(ConfigRepository::load(&path).unwrap(), config);
    }
}
