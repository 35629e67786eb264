//! Module catalog - discovery, classification and metadata resolution
//!
//! # Overview
//!
//! A catalog is the ordered list of modules published by the repository. It
//! is built fresh on every run, either from the hosting provider or from a
//! pre-built `json/hosts.json`.
//!
//! # Architecture
//!
//! ```text
//! GitHub user
//!     │
//!     ├── repo-a  ── module.prop? ── update.json? / license / changelog.md
//!     ├── repo-b  ── ...
//!     └── repo-c
//!            │
//!            ▼
//!     CatalogBuilder  (one failing repo never aborts the batch)
//!            │
//!            ▼
//!     Catalog  ──► json/hosts.json
//! ```

mod builder;
mod classifier;
mod local;
mod resolver;

pub use builder::{BuildOptions, CatalogBuilder, Credentials};
pub use classifier::{is_package, MODULE_PROP};
pub use local::{hosts_path, load_local_catalog, HOSTS_FILE};
pub use resolver::{MetadataResolver, CHANGELOG_MD, NOASSERTION, UNKNOWN_LICENSE, UPDATE_JSON};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One module entry of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Repository name
    pub id: String,

    /// Where the latest module can be fetched: the download URL of the
    /// module's `update.json`, or the repository clone URL
    pub update_to: String,

    /// SPDX id, `UNKNOWN`, or empty when no license was found
    #[serde(default)]
    pub license: String,

    /// Only present for modules without `update.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
}

impl PackageDescriptor {
    /// Whether the module ships its own `update.json`
    ///
    /// Such modules carry their changelog in the manifest, so the descriptor
    /// never has one.
    pub fn has_update_json(&self) -> bool {
        self.changelog.is_none()
    }
}

/// Ordered list of module descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    modules: Vec<PackageDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor; duplicate ids are kept
    pub fn push(&mut self, descriptor: PackageDescriptor) {
        self.modules.push(descriptor);
    }

    pub fn modules(&self) -> &[PackageDescriptor] {
        &self.modules
    }

    pub fn size(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageDescriptor> {
        self.modules.iter()
    }

    /// Look up the first descriptor with this id
    pub fn get(&self, id: &str) -> Option<&PackageDescriptor> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Parse a catalog from a JSON array
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse catalog JSON")
    }

    /// Serialize as a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize catalog")
    }

    /// Write the catalog to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write catalog: {}", path.display()))
    }
}

impl From<Vec<PackageDescriptor>> for Catalog {
    fn from(modules: Vec<PackageDescriptor>) -> Self {
        Self { modules }
    }
}

impl IntoIterator for Catalog {
    type Item = PackageDescriptor;
    type IntoIter = std::vec::IntoIter<PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PackageDescriptor;
    type IntoIter = std::slice::Iter<'a, PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
