//! Validated, immutable sync settings

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{config_path, CountValue, FlagValue, RawConfig};
use crate::error::{Result, SyncError};

/// Display name used when config.json does not set one
pub const DEFAULT_REPO_NAME: &str = "Someone's Magisk Repo";

/// Module cap used when config.json does not set one
pub const DEFAULT_MAX_NUM_MODULE: u32 = 3;

/// How the published repository is synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Git,
    Json,
}

impl SyncMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "git" => Some(SyncMode::Git),
            "json" => Some(SyncMode::Json),
            _ => None,
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Git => f.write_str("git"),
            SyncMode::Json => f.write_str("json"),
        }
    }
}

/// Resolved settings for a synchronization run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub repo_name: String,
    pub repo_url: String,
    pub repo_branch: Option<String>,
    pub sync_mode: SyncMode,
    pub max_num_module: u32,
    pub show_log: bool,
    pub log_dir: Option<PathBuf>,
}

/// Treat empty and whitespace-only strings as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Load and validate `root/config/config.json`
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Err(SyncError::MissingFile {
                name: "config.json",
                path,
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            SyncError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::resolve(RawConfig::from_json(&content)?, root)
    }

    /// Validate a raw config and apply defaults
    ///
    /// Relative `log_dir` values are joined onto `root`, which is itself made
    /// absolute against the working directory first.
    pub fn resolve(raw: RawConfig, root: &Path) -> Result<Self> {
        let repo_url = non_empty(raw.repo_url)
            .ok_or_else(|| SyncError::Config("the repo_url field is undefined".to_string()))?;
        if !repo_url.ends_with('/') {
            return Err(SyncError::Config(
                "the repo_url need to end with '/'".to_string(),
            ));
        }

        let mode = non_empty(raw.sync_mode)
            .ok_or_else(|| SyncError::Config("the sync_mode field is undefined".to_string()))?;
        let sync_mode = SyncMode::parse(mode.trim()).ok_or_else(|| {
            SyncError::Config(format!(
                "unsupported sync_mode '{mode}', expected 'git' or 'json'"
            ))
        })?;

        let repo_branch = non_empty(raw.repo_branch);
        if sync_mode == SyncMode::Git && repo_branch.is_none() {
            return Err(SyncError::Config(
                "sync_mode is 'git', but the repo_branch field is undefined".to_string(),
            ));
        }

        let repo_name = non_empty(raw.repo_name).unwrap_or_else(|| DEFAULT_REPO_NAME.to_string());
        let max_num_module = resolve_count(raw.max_num_module)?;
        let show_log = resolve_flag(raw.show_log);

        let log_dir = non_empty(raw.log_dir)
            .map(|dir| absolute_log_dir(PathBuf::from(dir), root))
            .transpose()?;

        Ok(Self {
            repo_name,
            repo_url,
            repo_branch,
            sync_mode,
            max_num_module,
            show_log,
            log_dir,
        })
    }

    /// Log every resolved setting
    pub fn log_summary(&self) {
        info!("repo_name: {}", self.repo_name);
        info!("repo_url: {}", self.repo_url);
        info!(
            "repo_branch: {}",
            self.repo_branch.as_deref().unwrap_or("None")
        );
        info!("sync_mode: {}", self.sync_mode);
        info!("max_num_module: {}", self.max_num_module);
        info!("show_log: {}", self.show_log);
        match &self.log_dir {
            Some(dir) => info!("log_dir: {}", dir.display()),
            None => info!("log_dir: None"),
        }
    }
}

fn absolute_log_dir(dir: PathBuf, root: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    std::path::absolute(root.join(&dir)).map_err(|e| {
        SyncError::Config(format!(
            "failed to resolve log_dir {} under {}: {e}",
            dir.display(),
            root.display()
        ))
    })
}

/// Unset, zero and negative values fall back to the default cap
fn resolve_count(value: Option<CountValue>) -> Result<u32> {
    let number = match value {
        None => return Ok(DEFAULT_MAX_NUM_MODULE),
        Some(CountValue::Number(n)) => n,
        Some(CountValue::Text(text)) if text.trim().is_empty() => {
            return Ok(DEFAULT_MAX_NUM_MODULE)
        }
        Some(CountValue::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
            SyncError::Config(format!("max_num_module '{text}' is not an integer"))
        })?,
    };

    match u32::try_from(number) {
        Ok(n) if n > 0 => Ok(n),
        _ => Ok(DEFAULT_MAX_NUM_MODULE),
    }
}

fn resolve_flag(value: Option<FlagValue>) -> bool {
    match value {
        None => true,
        Some(FlagValue::Bool(b)) => b,
        Some(FlagValue::Text(text)) if text.trim().is_empty() => true,
        Some(FlagValue::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
    }
}
