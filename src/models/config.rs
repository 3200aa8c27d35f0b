use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::search::OutputFormat;
use crate::error::ConfigError;

pub const APP_DIR: &str = "ckfind";
pub const DEFAULT_PROGRAM: &str = "find";
pub const CONFIG_ENV: &str = "CKFIND_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Root under which the tool keeps its files (`<config_dir>/ckfind`).
    pub fn app_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::app_dir().map(|p| p.join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Directory holding saved specifications.
    pub fn specs_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref dir) = self.storage.specs_dir {
            return Ok(dir.clone());
        }
        Self::app_dir()
            .map(|p| p.join("specs"))
            .ok_or_else(|| ConfigError::PathError("could not determine config directory".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// External search utility placed at argv[0].
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default)]
    pub capture_matches: bool,

    #[serde(default = "default_filter_content")]
    pub filter_content: bool,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_filter_content() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            capture_matches: false,
            filter_content: default_filter_content(),
            default_format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Overrides `<config_dir>/ckfind/specs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs_dir: Option<PathBuf>,
}
