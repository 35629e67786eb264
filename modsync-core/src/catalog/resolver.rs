//! Metadata resolution for classified modules
//!
//! Each descriptor field has its own fallback chain:
//!
//! | field       | first try              | on "not found"          |
//! |-------------|------------------------|-------------------------|
//! | `update_to` | `update.json` download | repository clone URL    |
//! | `license`   | host license API       | `""` (with a warning)   |
//! | `changelog` | `changelog.md` download| `""`                    |
//!
//! `changelog` is only looked up for modules without `update.json`. Any other
//! host failure aborts resolution of that repository. An `update.json` that
//! has no download URL is an error; a `changelog.md` without one only warns.

use tracing::{info, warn};

use super::PackageDescriptor;
use crate::error::PackageError;
use crate::host::{HostingApi, Repository};

pub const UPDATE_JSON: &str = "update.json";
pub const CHANGELOG_MD: &str = "changelog.md";

/// SPDX id GitHub reports for licenses it cannot classify
pub const NOASSERTION: &str = "NOASSERTION";

/// License id written to the catalog in place of `NOASSERTION`
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

/// Where a module's updates come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum UpdateSource {
    /// Download URL of the module's own update.json
    UpdateJson(String),
    /// Clone URL of the repository
    Repository(String),
}

/// Resolves descriptor fields for a module repository
pub struct MetadataResolver<'a> {
    host: &'a dyn HostingApi,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(host: &'a dyn HostingApi) -> Self {
        Self { host }
    }

    /// Resolve every field, or fail as a whole
    ///
    /// Fields are resolved in a fixed order (source, license, changelog) so
    /// logs are reproducible.
    pub async fn resolve(&self, repo: &Repository) -> Result<PackageDescriptor, PackageError> {
        let source = self.resolve_source(repo).await?;
        let license = self.resolve_license(repo).await?;

        let (update_to, changelog) = match source {
            UpdateSource::UpdateJson(url) => (url, None),
            UpdateSource::Repository(url) => (url, Some(self.resolve_changelog(repo).await?)),
        };

        Ok(PackageDescriptor {
            id: repo.name.clone(),
            update_to,
            license,
            changelog,
        })
    }

    async fn resolve_source(&self, repo: &Repository) -> Result<UpdateSource, PackageError> {
        let file = self
            .host
            .get_contents(repo, UPDATE_JSON)
            .await
            .into_result()
            .map_err(|source| PackageError::Resolution {
                field: "update_to",
                source,
            })?;

        match file {
            Some(file) => {
                let url = file
                    .download_url
                    .ok_or(PackageError::MissingDownloadUrl { path: UPDATE_JSON })?;
                info!("{}: include a update.json", repo.name);
                Ok(UpdateSource::UpdateJson(url))
            }
            None => Ok(UpdateSource::Repository(repo.clone_url.clone())),
        }
    }

    /// SPDX id of the repository license
    pub async fn resolve_license(&self, repo: &Repository) -> Result<String, PackageError> {
        let license = self
            .host
            .get_license(repo)
            .await
            .into_result()
            .map_err(|source| PackageError::Resolution {
                field: "license",
                source,
            })?;

        match license {
            Some(license) => Ok(normalize_spdx(license.spdx_id())),
            None => {
                warn!("{}: does not include a license", repo.name);
                Ok(String::new())
            }
        }
    }

    /// Download URL of `changelog.md`, or empty
    pub async fn resolve_changelog(&self, repo: &Repository) -> Result<String, PackageError> {
        let file = self
            .host
            .get_contents(repo, CHANGELOG_MD)
            .await
            .into_result()
            .map_err(|source| PackageError::Resolution {
                field: "changelog",
                source,
            })?;

        // The changelog is optional: a file without a download URL is logged
        // and treated like a missing one, unlike update.json.
        match file.map(|f| f.download_url) {
            Some(Some(url)) => {
                info!("{}: include a changelog.md", repo.name);
                Ok(url)
            }
            Some(None) => {
                warn!("{}: {} has no download url, skipped", repo.name, CHANGELOG_MD);
                Ok(String::new())
            }
            None => Ok(String::new()),
        }
    }
}

/// `NOASSERTION` and a missing id both become `UNKNOWN`
fn normalize_spdx(spdx_id: Option<&str>) -> String {
    match spdx_id {
        Some(id) if id != NOASSERTION && !id.is_empty() => id.to_string(),
        _ => UNKNOWN_LICENSE.to_string(),
    }
}
