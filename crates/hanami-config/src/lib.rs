//! Configuration file handling for hanami.
//!
//! The config lives at `<config_dir>/hanami/config.toml`. A missing file is
//! not an error: every field has a default, and the file is written back on
//! exit so theme and speed survive restarts.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hanami_core::{AnimationSpeed, VisualTheme};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default particles-per-area divisor (one particle per 20 000 px²).
pub const DEFAULT_DENSITY_DIVISOR: f32 = 20_000.0;

/// Highest frame rate accepted from the config file.
pub const MAX_FRAME_RATE: u32 = 240;

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Visual theme selecting particle shape and palette.
    pub theme: VisualTheme,
    /// Animation speed.
    pub speed: AnimationSpeed,
    /// Backing-store pixel area per particle.
    pub density_divisor: f32,
    /// Backing-store pixels per logical pixel.
    pub device_pixel_ratio: f32,
    /// Target frames per second.
    pub frame_rate: u32,
    /// Show the cursor follower.
    pub cursor: bool,
    /// Fixed RNG seed for a reproducible field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: VisualTheme::default(),
            speed: AnimationSpeed::default(),
            density_divisor: DEFAULT_DENSITY_DIVISOR,
            device_pixel_ratio: 1.0,
            frame_rate: 60,
            cursor: true,
            seed: None,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "hanami")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.density_divisor.is_finite() || self.density_divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "density_divisor",
                reason: format!("must be a positive number, got {}", self.density_divisor),
            });
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "device_pixel_ratio",
                reason: format!("must be a positive number, got {}", self.device_pixel_ratio),
            });
        }
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: format!("must be between 1 and {MAX_FRAME_RATE}, got {}", self.frame_rate),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "theme = \"dark\"\nseed = 7\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme, VisualTheme::Dark);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.density_divisor, DEFAULT_DENSITY_DIVISOR);
        assert_eq!(config.frame_rate, 60);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            theme: VisualTheme::Alternate,
            speed: AnimationSpeed::Fast,
            cursor: false,
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_density_divisor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "density_divisor = 0.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "density_divisor",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_out_of_range_frame_rate() {
        let config = Config {
            frame_rate: 1000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "theme = \"sepia\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
