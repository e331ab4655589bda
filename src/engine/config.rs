use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::engine::utils::geometry::grid_index_count;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GL_HARNESS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "harness.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "gl-harness".to_owned(),
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub grid_width: u32,
    pub grid_height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { grid_width: 100, grid_height: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub mouse_sensitivity: f32,
    pub key_sensitivity: f32,
    /// Degrees of rotation per pixel of cursor travel, before mouse sensitivity.
    pub cursor_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.5,
            key_sensitivity: 5.0,
            cursor_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub window: WindowConfig,
    pub surface: SurfaceConfig,
    pub camera: CameraConfig,
    /// `env_logger` filter string; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl HarnessConfig {
    /// Loads from `GL_HARNESS_CONFIG`, then `harness.json`, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            Self::from_file(fallback)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                format!("window size {}x{} must be non-zero", self.window.width, self.window.height)
            ));
        }
        if self.surface.grid_width < 2 || self.surface.grid_height < 2 {
            return Err(ConfigError::Invalid(
                format!(
                    "surface grid {}x{} needs at least 2 samples per side",
                    self.surface.grid_width,
                    self.surface.grid_height
                )
            ));
        }
        if grid_index_count(self.surface.grid_width, self.surface.grid_height).is_none() {
            return Err(ConfigError::Invalid(
                format!(
                    "surface grid {}x{} has too many indices for one draw call",
                    self.surface.grid_width,
                    self.surface.grid_height
                )
            ));
        }
        Ok(())
    }
}
