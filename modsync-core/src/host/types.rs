//! Host response types (subset of the GitHub REST v3 shapes)

use serde::{Deserialize, Serialize};

/// A repository owned by the configured user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name, used as the package id
    pub name: String,

    /// `owner/name`
    pub full_name: String,

    /// HTTPS clone URL
    pub clone_url: String,
}

/// A file in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFile {
    pub name: String,

    pub path: String,

    /// Raw download URL; GitHub leaves it null for directories and submodules
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Response of the repository license endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLicense {
    #[serde(default)]
    pub license: Option<LicenseInfo>,
}

/// License detected by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// SPDX identifier, `NOASSERTION` when the host could not classify it
    #[serde(default)]
    pub spdx_id: Option<String>,
}

impl RepositoryLicense {
    /// SPDX id reported by the host, if any
    pub fn spdx_id(&self) -> Option<&str> {
        self.license.as_ref().and_then(|l| l.spdx_id.as_deref())
    }
}

impl Repository {
    /// Convenience constructor for a `github.com` repository
    pub fn on_github(owner: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            full_name: format!("{owner}/{name}"),
            clone_url: format!("https://github.com/{owner}/{name}.git"),
        }
    }
}
