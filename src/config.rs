//! Runtime configuration for group-index.
//!
//! Configuration is loaded from a JSON file or constructed programmatically.
//! Index capacity, recency policy and the backing source live here.

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "group-index", about = "Approximate group-indexed lookup server")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides `server.listen`).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Index capacity and recency policy.
    pub index: IndexConfig,

    /// Backing entry source.
    pub source: SourceConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// When a cached group counts as "used" for eviction purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyPolicy {
    /// Age since load: cache hits leave the recency list untouched.
    #[default]
    OnLoad,
    /// Age since last access: every hit promotes the group to most recent.
    OnAccess,
}

/// Index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum number of groups held in memory (0 = never evict).
    pub max_groups: usize,

    /// Recency bookkeeping policy.
    pub recency: RecencyPolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_groups: 16,
            recency: RecencyPolicy::OnLoad,
        }
    }
}

/// Entry source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON-lines file holding `{"key": .., "value": ..}` records.
    pub path: PathBuf,

    /// Width of each key-space group (e.g. 3600 for hourly groups of
    /// epoch-second keys).
    pub group_width: i64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("entries.jsonl"),
            group_width: 3600,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Reject settings the index cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source.group_width <= 0 {
            anyhow::bail!(
                "source.group_width must be positive, got {}",
                self.source.group_width
            );
        }
        Ok(())
    }
}
