//! Configuration management for inscribe.
//!
//! Handles:
//! - Where the ExifTool executable lives
//! - Display preferences for the CLI

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InscribeError, Result};
use crate::tool::{ExecutableLocator, ExifTool};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Metadata tool location.
    #[serde(default)]
    pub exiftool: ExifToolConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if there is
    /// no configuration file.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InscribeError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| InscribeError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| InscribeError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }
}

/// Where to find ExifTool.
///
/// An explicit `path` wins. Otherwise `bundled = true` selects the layout
/// shipped with the application (see [`ExecutableLocator`]), and the
/// fallback is `exiftool` from `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExifToolConfig {
    /// Explicit executable path.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Use the bundled executable.
    #[serde(default)]
    pub bundled: bool,
    /// Bundled layout of a packaged install rather than a development checkout.
    #[serde(default)]
    pub packaged: bool,
    /// Resources directory of a packaged install (default: `resources/`
    /// next to the running executable).
    #[serde(default)]
    pub resources_dir: Option<PathBuf>,
    /// Root of a development checkout (default: current directory).
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    /// Arguments placed before every call, e.g. the script when `path` is `perl`.
    #[serde(default)]
    pub leading_args: Vec<String>,
}

impl ExifToolConfig {
    /// Locator for the bundled executable.
    pub fn locator(&self) -> ExecutableLocator {
        let resources_dir = self.resources_dir.clone().unwrap_or_else(default_resources_dir);
        let project_root = self
            .project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        ExecutableLocator::new(self.packaged, resources_dir, project_root)
    }

    /// The tool this configuration selects.
    pub fn tool(&self) -> ExifTool {
        let tool = match &self.path {
            Some(path) => ExifTool::new(path),
            None if self.bundled => ExifTool::bundled(&self.locator()),
            None => ExifTool::system(),
        };
        tool.with_leading_args(self.leading_args.iter().cloned())
    }
}

fn default_resources_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
        .unwrap_or_else(|| PathBuf::from("resources"))
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Truncate comments in list views at this many characters (0 = never).
    #[serde(default = "default_truncate")]
    pub truncate_at: usize,
    /// Show dotfiles when listing directories.
    #[serde(default)]
    pub show_hidden: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            truncate_at: default_truncate(),
            show_hidden: false,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_truncate() -> usize {
    80
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| InscribeError::ConfigError {
            message: "Could not determine the user configuration directory".to_string(),
        })?;

    Ok(config_dir.join("inscribe").join("config.toml"))
}
