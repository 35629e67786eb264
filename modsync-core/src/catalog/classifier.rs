//! Package classification

use crate::host::{HostError, HostingApi, Repository};

/// Marker file that makes a repository a module
pub const MODULE_PROP: &str = "module.prop";

/// A repository is a module iff `module.prop` exists at its root
///
/// A "not found" answer means `false`; any other host failure is returned.
pub async fn is_package(host: &dyn HostingApi, repo: &Repository) -> Result<bool, HostError> {
    Ok(host
        .get_contents(repo, MODULE_PROP)
        .await
        .into_result()?
        .is_some())
}
