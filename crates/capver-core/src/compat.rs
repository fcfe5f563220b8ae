//! Support Window: which clients are still accepted
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityVersion;
use crate::registry::{version_family, VersionRegistry};

/// Number of `major.minor` families kept in the window by default
pub const DEFAULT_SUPPORTED_MAJOR_MINOR: usize = 10;

/// Deprecation window over the latest `N` version families.
///
/// A client is supported when its capability version is at least the lowest
/// capability version found among the versions of those families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportWindow {
    families: Vec<String>,
    min_supported: CapabilityVersion,
}

impl SupportWindow {
    pub fn new(registry: &VersionRegistry, families: usize) -> Self {
        let n = isize::try_from(families).unwrap_or(isize::MAX);
        let families = registry.latest_major_minor(n, false);

        let min_supported = registry
            .versions()
            .filter(|(version, _)| {
                version_family(version, false).is_some_and(|family| families.contains(&family))
            })
            .map(|(_, cap)| cap)
            .min()
            .unwrap_or(CapabilityVersion::UNKNOWN);

        Self {
            families,
            min_supported,
        }
    }

    /// Lowest supported capability version, `UNKNOWN` for an empty window.
    pub fn min_supported(&self) -> CapabilityVersion {
        self.min_supported
    }

    /// Families in the window, oldest first, with the `v` prefix.
    pub fn supported_families(&self) -> &[String] {
        &self.families
    }

    pub fn is_supported(&self, cap: CapabilityVersion) -> bool {
        !cap.is_unknown() && !self.min_supported.is_unknown() && cap >= self.min_supported
    }
}
