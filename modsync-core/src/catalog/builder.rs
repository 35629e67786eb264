//! Catalog builder - orchestrates a synchronization run
//!
//! ```text
//! Start ──► RemoteDiscovery ──► Accumulate ──► Done     (credentials given)
//!   └─────► LocalLoad ─────────────────────► Done       (no credentials)
//! ```
//!
//! During remote discovery every repository is classified and, if it is a
//! module, resolved. A [`PackageError`] for one repository is logged and the
//! repository is left out; nothing else is caught.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{is_package, load_local_catalog, Catalog, MetadataResolver, PackageDescriptor};
use crate::config::Settings;
use crate::error::{PackageError, Result, SyncError};
use crate::host::{GitHubClient, HostError, HostingApi, Repository};

/// Identity used to query the hosting provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: Option<String>) -> Self {
        Self {
            user: user.into(),
            token,
        }
    }
}

/// Tuning for remote discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Repositories processed at once; output order is always host order
    pub concurrency: usize,

    /// Upper bound on the whole remote run
    pub deadline: Option<Duration>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
        }
    }
}

/// Builds the catalog for one run
pub struct CatalogBuilder {
    root: PathBuf,
    options: BuildOptions,
    host: Option<Arc<dyn HostingApi>>,
}

impl CatalogBuilder {
    /// Builder rooted at the project directory (where `json/hosts.json` lives)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: BuildOptions::default(),
            host: None,
        }
    }

    /// Use this host for remote discovery instead of api.github.com
    pub fn with_host(mut self, host: Arc<dyn HostingApi>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the catalog: remote when credentials are given, local otherwise
    pub async fn build(
        &self,
        settings: &Settings,
        credentials: Option<&Credentials>,
    ) -> Result<Catalog> {
        // The module cap is carried in settings but applied by the publisher.
        debug!(
            "Building catalog for '{}' (max_num_module: {})",
            settings.repo_name, settings.max_num_module
        );

        let Some(credentials) = credentials else {
            return load_local_catalog(&self.root);
        };

        let host = match &self.host {
            Some(host) => Arc::clone(host),
            None => Arc::new(GitHubClient::new(credentials.token.clone()).map_err(|e| {
                SyncError::Discovery {
                    user: credentials.user.clone(),
                    source: HostError::Transport(e.to_string()),
                }
            })?),
        };

        match self.options.deadline {
            Some(deadline) => tokio::time::timeout(
                deadline,
                self.build_remote(host.as_ref(), &credentials.user),
            )
            .await
            .map_err(|_| SyncError::Deadline(deadline))?,
            None => self.build_remote(host.as_ref(), &credentials.user).await,
        }
    }

    /// Discover and resolve every module owned by `user`
    pub async fn build_remote(&self, host: &dyn HostingApi, user: &str) -> Result<Catalog> {
        info!("load hosts: {}", user);

        let repos = host
            .list_repositories(user)
            .await
            .map_err(|source| SyncError::Discovery {
                user: user.to_string(),
                source,
            })?;
        debug!("{} returned {} repositories", host.name(), repos.len());

        let mut results = stream::iter(repos)
            .map(|repo| async move {
                let result = process_repository(host, &repo).await;
                (repo, result)
            })
            .buffered(self.options.concurrency.max(1));

        let mut catalog = Catalog::new();
        while let Some((repo, result)) = results.next().await {
            match result {
                Ok(Some(descriptor)) => catalog.push(descriptor),
                Ok(None) => {}
                Err(err) => {
                    error!(
                        repo = %repo.name,
                        kind = err.kind(),
                        "get host failed: {}: {}({})",
                        repo.name,
                        err.kind(),
                        err
                    );
                }
            }
        }

        info!("number of modules: {}", catalog.size());
        Ok(catalog)
    }
}

/// Classify one repository and resolve it if it is a module
async fn process_repository(
    host: &dyn HostingApi,
    repo: &Repository,
) -> std::result::Result<Option<PackageDescriptor>, PackageError> {
    let is_module = is_package(host, repo)
        .await
        .map_err(|source| PackageError::Classification { source })?;
    if !is_module {
        return Ok(None);
    }

    info!("get host: {}", repo.name);
    MetadataResolver::new(host).resolve(repo).await.map(Some)
}
