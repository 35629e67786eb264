//! Hosting provider abstraction
//!
//! The catalog engine only needs three things from a host: list a user's
//! repositories, look up a file at a repository's root, and look up the
//! repository's license. [`HostingApi`] captures exactly that so the engine
//! can run against GitHub or against an in-memory fake in tests.
//!
//! File and license lookups return a [`Lookup`], which keeps "not found"
//! separate from every other failure. The resolver applies a different policy
//! to each and must never mix them up.

pub mod github;
mod types;

pub use github::GitHubClient;
pub use types::{ContentFile, LicenseInfo, Repository, RepositoryLicense};

use async_trait::async_trait;
use thiserror::Error;

/// Host failures other than "not found"
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host answered with an unexpected HTTP status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never got a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The request exceeded the per-call timeout
    #[error("request timed out")]
    Timeout,
}

/// Outcome of a lookup against the host
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(HostError),
}

impl<T> Lookup<T> {
    /// `NotFound` becomes `Ok(None)`; `Failed` becomes `Err`
    pub fn into_result(self) -> Result<Option<T>, HostError> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::NotFound => Ok(None),
            Lookup::Failed(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(err) => Lookup::Failed(err),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Trait for repository hosting backends
///
/// Implementations handle authentication, paging and per-call timeouts.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// List every repository owned by `user`, in the order the host returns them
    async fn list_repositories(&self, user: &str) -> Result<Vec<Repository>, HostError>;

    /// Look up a file at `path` relative to the repository root
    async fn get_contents(&self, repo: &Repository, path: &str) -> Lookup<ContentFile>;

    /// Look up the license the host detected for the repository
    async fn get_license(&self, repo: &Repository) -> Lookup<RepositoryLicense>;

    /// Backend identifier for logging
    fn name(&self) -> &'static str;
}
