//! modsync core - builds the module catalog for a Magisk-style module repository
//!
//! Settings come from `config/config.json`. The catalog is discovered from a
//! GitHub user's repositories, or replayed from `json/hosts.json` when no user
//! is given.

pub mod catalog;
pub mod config;
pub mod error;
pub mod host;

pub use catalog::{Catalog, CatalogBuilder, Credentials, PackageDescriptor};
pub use config::{Settings, SyncMode};
pub use error::{PackageError, Result, SyncError};
pub use host::{HostError, HostingApi, Lookup, Repository};
