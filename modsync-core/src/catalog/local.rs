//! Local catalog replay from `json/hosts.json`

use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::Catalog;
use crate::error::{Result, SyncError};

/// Location of the pre-built catalog relative to the project root
pub const HOSTS_FILE: [&str; 2] = ["json", "hosts.json"];

/// Path of hosts.json under `root`
pub fn hosts_path(root: &Path) -> PathBuf {
    HOSTS_FILE.iter().fold(root.to_path_buf(), |p, part| p.join(part))
}

/// Load the catalog stored under `root`
///
/// There is no per-entry recovery here: a missing or malformed file fails the
/// whole load.
pub fn load_local_catalog(root: &Path) -> Result<Catalog> {
    let path = hosts_path(root);
    if !path.exists() {
        error!("no such file: {}", path.display());
        return Err(SyncError::MissingFile {
            name: "hosts.json",
            path,
        });
    }

    info!("load hosts: {}", path.display());

    let content = std::fs::read_to_string(&path).map_err(|e| SyncError::CatalogLoad {
        path: path.clone(),
        source: e.into(),
    })?;
    let catalog = Catalog::from_json(&content)
        .map_err(|source| SyncError::CatalogLoad { path, source })?;

    info!("number of modules: {}", catalog.size());
    Ok(catalog)
}
