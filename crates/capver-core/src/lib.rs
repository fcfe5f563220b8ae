//! capver: Tailscale version ↔ capability version registry
//!
//! Maps client versions (`v1.80.0`) to the capability version integer that
//! encodes which protocol features the client understands, and answers
//! "latest N" queries over the table for compatibility windows.
//!
//! # Example
//!
//! ```
//! use capver_core::{CapabilityVersion, VersionRegistry};
//!
//! let registry = VersionRegistry::from_entries([
//!     ("v1.78.0", CapabilityVersion(109)),
//!     ("v1.78.1", CapabilityVersion(109)),
//!     ("v1.80.0", CapabilityVersion(113)),
//! ]);
//!
//! assert_eq!(registry.capability_version_for("1.80.0"), CapabilityVersion(113));
//! assert_eq!(registry.version_for(CapabilityVersion(109)), "v1.78.1");
//! assert!(registry.capability_version_for("v0.1.0").is_unknown());
//!
//! assert_eq!(registry.latest_versions(2), vec!["v1.78.1", "v1.80.0"]);
//! assert_eq!(registry.latest_major_minor(1, true), vec!["1.80"]);
//! assert_eq!(registry.latest_capability_versions(5).len(), 2);
//! ```
//!
//! Registries can also come from a table file through [`RegistryConfig`], or
//! from the embedded table via [`builtin::registry`].

pub mod builtin;
pub mod capability;
pub mod compat;
pub mod config;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod table;

pub use capability::CapabilityVersion;
pub use compat::{SupportWindow, DEFAULT_SUPPORTED_MAJOR_MINOR};
pub use config::RegistryConfig;
pub use error::{CapverError, Result};
pub use ordering::{normalize_version, VersionOrdering};
pub use registry::{version_family, VersionRegistry};
pub use table::VersionTable;

use serde::{Deserialize, Serialize};

/// One row of a version table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub capability_version: CapabilityVersion,
}

impl VersionEntry {
    pub fn new(version: impl AsRef<str>, capability_version: impl Into<CapabilityVersion>) -> Self {
        Self {
            version: normalize_version(version.as_ref()).into_owned(),
            capability_version: capability_version.into(),
        }
    }
}

impl FromIterator<VersionEntry> for VersionRegistry {
    fn from_iter<I: IntoIterator<Item = VersionEntry>>(iter: I) -> Self {
        VersionRegistry::from_entries(
            iter.into_iter()
                .map(|entry| (entry.version, entry.capability_version)),
        )
    }
}

/// Crate version
pub const CAPVER_VERSION: &str = env!("CARGO_PKG_VERSION");
