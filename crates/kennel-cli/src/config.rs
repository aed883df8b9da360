//! Shell settings read from `config.toml`.
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! Command-line flags are applied on top in `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kennel_index::{IndexConfig, SplitPolicy};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Snapshot file the store is loaded from and saved to.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Save the snapshot after every submission that stores a row.
    #[serde(default = "default_autosave")]
    pub autosave: bool,

    /// Output format: `table`, `json` or `csv`.
    #[serde(default = "default_format")]
    pub output_format: String,

    /// Show elapsed time after each submission.
    #[serde(default)]
    pub timing: bool,

    /// History file path.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Maximum history size.
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Pause between search trace steps, in milliseconds.
    #[serde(default)]
    pub trace_delay_ms: u64,

    /// Breed index settings.
    #[serde(default)]
    pub index: IndexConfig,
}

fn default_autosave() -> bool {
    true
}

fn default_format() -> String {
    "table".to_string()
}

fn default_history_size() -> usize {
    1000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            autosave: default_autosave(),
            output_format: default_format(),
            timing: false,
            history_file: None,
            history_size: default_history_size(),
            trace_delay_ms: 0,
            index: IndexConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads the first settings file found in:
    /// 1. ~/.config/kenneldb/config.toml
    /// 2. ~/.kenneldb/config.toml
    ///
    /// Falls back to defaults when neither exists.
    pub fn load_default() -> Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("kenneldb").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".kenneldb").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Returns the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kenneldb").join("config.toml"))
    }

    /// Returns the configured history file, or the default one.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("kenneldb").join("history")))
    }

    /// Returns a builder starting from these settings.
    pub fn into_builder(self) -> CliConfigBuilder {
        CliConfigBuilder { config: self }
    }
}

/// Builder for CLI configuration.
pub struct CliConfigBuilder {
    config: CliConfig,
}

impl CliConfigBuilder {
    /// Sets the snapshot file.
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = Some(path.into());
        self
    }

    /// Sets the index order.
    pub fn index_order(mut self, order: usize) -> Self {
        self.config.index.order = order;
        self
    }

    /// Sets the index split policy.
    pub fn split_policy(mut self, policy: SplitPolicy) -> Self {
        self.config.index.split_policy = policy;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CliConfig {
        self.config
    }
}
