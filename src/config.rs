use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ICON_NAME: &str = "sboui";
pub const DEFAULT_TOOLTIP: &str = "SBo updates are available";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Icon theme name of the tray icon.
    pub icon_name: String,
    pub tooltip: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icon_name: DEFAULT_ICON_NAME.to_string(),
            tooltip: DEFAULT_TOOLTIP.to_string(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given (it must exist), otherwise the per-user file
    /// if present, otherwise the defaults. Nothing is written.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::config_path() {
            Ok(path) if path.exists() => Self::from_file(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("no config directory ({e:#}), using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        tracing::debug!(?path, "loaded config");
        Ok(config)
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, icon_name: Option<String>, tooltip: Option<String>) -> Self {
        if let Some(icon_name) = icon_name {
            self.icon_name = icon_name;
        }
        if let Some(tooltip) = tooltip {
            self.tooltip = tooltip;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.icon_name.trim().is_empty() {
            anyhow::bail!("icon_name must not be empty");
        }
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "sboui", "sboui-systray")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
