//! User configuration for the rcs command
//!
//! Stored at `~/.config/rcs/config.toml` (Linux/macOS) or `%APPDATA%\rcs\config.toml`
//! (Windows). A missing file means defaults; `--config` points at another file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub store: StoreConfig,
    pub log: LogConfig,
}

/// Where versioned files live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one record file per versioned file (default: ./data)
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing filter used when RUST_LOG is unset (default: warn)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join(".config/rcs"))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir().map(|c| c.join("rcs"))
    }
}

/// Get the default config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from `path`, or from the default location
///
/// Returns defaults if the file doesn't exist.
pub fn load(path: Option<&Path>) -> Result<SystemConfig> {
    let config_path = match path.map(Path::to_path_buf).or_else(config_file_path) {
        Some(p) => p,
        None => return Ok(SystemConfig::default()),
    };

    if !config_path.exists() {
        return Ok(SystemConfig::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config at {}", config_path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", config_path.display()))
}

/// Render a config as commented TOML
pub fn render(config: &SystemConfig) -> Result<String> {
    let mut content = String::from("# rcs configuration\n");
    content.push_str("# RUST_LOG overrides [log] level\n\n");
    content.push_str(&toml::to_string_pretty(config).context("Failed to serialize config")?);
    Ok(content)
}
