//! Sync configuration
//!
//! The project keeps its settings in `config/config.json`:
//!
//! ```json
//! {
//!   "repo_name": "Someone's Magisk Repo",
//!   "repo_url": "https://example.com/repo/",
//!   "repo_branch": "main",
//!   "sync_mode": "git",
//!   "max_num_module": 3,
//!   "show_log": true,
//!   "log_dir": "log"
//! }
//! ```
//!
//! The file is read into a loosely-typed [`RawConfig`] and then validated into
//! an immutable [`Settings`] before any discovery starts.

mod settings;

pub use settings::{Settings, SyncMode, DEFAULT_MAX_NUM_MODULE, DEFAULT_REPO_NAME};

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Location of the config file relative to the project root
pub const CONFIG_FILE: [&str; 2] = ["config", "config.json"];

/// A flag that may be written as a JSON bool or as a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

/// A count that may be written as a JSON number or as a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Number(i64),
    Text(String),
}

/// config.json as written by the user; nothing is validated yet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub repo_name: Option<String>,

    #[serde(default)]
    pub repo_url: Option<String>,

    #[serde(default)]
    pub repo_branch: Option<String>,

    #[serde(default)]
    pub sync_mode: Option<String>,

    #[serde(default)]
    pub max_num_module: Option<CountValue>,

    #[serde(default)]
    pub show_log: Option<FlagValue>,

    #[serde(default)]
    pub log_dir: Option<String>,
}

impl RawConfig {
    /// Parse config from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| SyncError::Config(format!("config.json is not valid: {e}")))
    }
}

/// Path of config.json under `root`
pub fn config_path(root: &Path) -> PathBuf {
    CONFIG_FILE.iter().fold(root.to_path_buf(), |p, part| p.join(part))
}
