//! Configuration management for lazytree.
//!
//! Loads configuration from ${LAZYTREE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pending::ReentrantPolicy;
use crate::store::HierarchyStore;
use crate::tree::TreeOptions;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulated load latency per toggle, in milliseconds.
    pub load_latency_ms: u64,

    /// Handling of a toggle on a node that is still loading.
    pub reentrant: ReentrantPolicy,

    /// Columns of indentation per tree level.
    pub indent_width: u16,

    /// Optional hierarchy file replacing the built-in sample.
    pub hierarchy_file: Option<String>,

    /// Optional tracing filter directive.
    pub log_filter: Option<String>,
}

impl Config {
    const DEFAULT_LOAD_LATENCY_MS: u64 = 1000;
    const DEFAULT_INDENT_WIDTH: u16 = 2;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            latency: self.load_latency(),
            reentrant: self.reentrant,
        }
    }

    /// Path of the configured hierarchy file, with `~` expanded.
    pub fn hierarchy_path(&self) -> Option<PathBuf> {
        let raw = self.hierarchy_file.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(rest) = raw.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(rest));
        }
        Some(PathBuf::from(raw))
    }

    /// Builds the hierarchy to display: the configured file, or the sample.
    pub fn load_store(&self) -> Result<HierarchyStore> {
        match self.hierarchy_path() {
            Some(path) => HierarchyStore::load(&path),
            None => Ok(HierarchyStore::sample()),
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_latency_ms: Self::DEFAULT_LOAD_LATENCY_MS,
            reentrant: ReentrantPolicy::default(),
            indent_width: Self::DEFAULT_INDENT_WIDTH,
            hierarchy_file: None,
            log_filter: None,
        }
    }
}

/// The commented template written by `Config::init`.
pub fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for lazytree configuration and data directories.
    //!
    //! LAZYTREE_HOME resolution order:
    //! 1. LAZYTREE_HOME environment variable (if set)
    //! 2. ~/.config/lazytree (default)

    use std::env;
    use std::path::PathBuf;

    /// Returns the lazytree home directory.
    pub fn lazytree_home() -> PathBuf {
        if let Ok(home) = env::var("LAZYTREE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("lazytree"))
            .unwrap_or_else(|| PathBuf::from(".lazytree"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        lazytree_home().join("config.toml")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        lazytree_home().join("logs")
    }
}
