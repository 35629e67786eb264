//! Error types for catalog synchronization
//!
//! `SyncError` covers everything that ends a run. `PackageError` is the only
//! recoverable category: the catalog builder catches it per repository, logs
//! it and moves on.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::host::HostError;

/// Where to point users when a required file is missing
pub const TEMPLATE_HINT: &str = "You can find template in [util/template]";

/// Fatal errors that abort a synchronization run
#[derive(Error, Debug)]
pub enum SyncError {
    /// The configuration is missing a required field or has an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required file (config.json, hosts.json) does not exist
    #[error("{name}: no such file {path}\n\n{hint}", hint = TEMPLATE_HINT)]
    MissingFile { name: &'static str, path: PathBuf },

    /// The local catalog exists but could not be read or parsed
    #[error("Failed to load catalog from {path}")]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Listing the user's repositories failed
    #[error("Failed to list repositories for '{user}'")]
    Discovery {
        user: String,
        #[source]
        source: HostError,
    },

    /// The remote run did not finish before the overall deadline
    #[error("Catalog synchronization did not finish within {0:?}")]
    Deadline(Duration),
}

/// Per-repository failures, recovered at the catalog builder boundary
#[derive(Error, Debug)]
pub enum PackageError {
    /// Probing for the package marker failed with something other than "not found"
    #[error("classification failed: {source}")]
    Classification {
        #[source]
        source: HostError,
    },

    /// Resolving one of the descriptor fields failed
    #[error("resolving {field} failed: {source}")]
    Resolution {
        field: &'static str,
        #[source]
        source: HostError,
    },

    /// `update.json` exists but the host gave no download URL for it
    #[error("{path} has no download URL")]
    MissingDownloadUrl { path: &'static str },
}

impl PackageError {
    /// Short name of the failure, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            PackageError::Classification { .. } => "ClassificationError",
            PackageError::Resolution { .. } | PackageError::MissingDownloadUrl { .. } => {
                "ResolutionError"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_has_template_hint() {
        let err = SyncError::MissingFile {
            name: "config.json",
            path: PathBuf::from("/tmp/project/config/config.json"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("config.json: no such file"));
        assert!(msg.contains("util/template"));
    }

    #[test]
    fn test_package_error_kind() {
        let err = PackageError::Classification {
            source: HostError::Timeout,
        };
        assert_eq!(err.kind(), "ClassificationError");

        let err = PackageError::Resolution {
            field: "license",
            source: HostError::Timeout,
        };
        assert_eq!(err.kind(), "ResolutionError");
        assert!(err.to_string().contains("license"));
    }
}
