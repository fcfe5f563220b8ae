//! Version Registry: bidirectional Tailscale version ↔ capability version map
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::capability::CapabilityVersion;
use crate::ordering::{self, normalize_version, VersionOrdering};

/// Immutable registry answering version ↔ capability version queries.
///
/// Holds two maps that are inverses of one relation: every version maps to a
/// capability version, and every capability version keeps exactly one
/// representative version. Lookups are fail-open: an unknown version yields
/// [`CapabilityVersion::UNKNOWN`] and an unknown capability version yields
/// `""`. Use [`lookup_capability`](Self::lookup_capability) or
/// [`lookup_version`](Self::lookup_version) to get `None` instead.
///
/// The "latest" queries take a signed `n`: `n <= 0` returns an empty list and
/// an `n` larger than the table returns everything, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRegistry {
    versions: BTreeMap<String, CapabilityVersion>,
    capabilities: BTreeMap<CapabilityVersion, String>,
    ordering: VersionOrdering,
}

impl VersionRegistry {
    /// Build from `(version, capability)` pairs.
    ///
    /// Versions are prefix-normalized. A version listed twice keeps its last
    /// capability version; a capability version shared by several versions
    /// keeps the last-inserted one as its representative. Entries with
    /// capability version 0 are skipped: that value is reserved for
    /// [`CapabilityVersion::UNKNOWN`].
    pub fn from_entries<I, V, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (V, C)>,
        V: AsRef<str>,
        C: Into<CapabilityVersion>,
    {
        let entries: Vec<(String, CapabilityVersion)> = entries
            .into_iter()
            .map(|(v, c)| (normalize_version(v.as_ref()).into_owned(), c.into()))
            .filter(|(version, cap): &(String, CapabilityVersion)| {
                if cap.is_unknown() {
                    warn!(version = %version, "skipping entry with reserved capability version 0");
                }
                !cap.is_unknown()
            })
            .collect();

        let mut versions = BTreeMap::new();
        for (version, cap) in &entries {
            versions.insert(version.clone(), *cap);
        }

        let mut capabilities = BTreeMap::new();
        for (version, cap) in entries {
            if versions.get(&version) == Some(&cap) {
                capabilities.insert(cap, version);
            }
        }

        Self::from_parts(versions, capabilities)
    }

    /// Assemble from maps already known to be consistent.
    pub(crate) fn from_parts(
        versions: BTreeMap<String, CapabilityVersion>,
        capabilities: BTreeMap<CapabilityVersion, String>,
    ) -> Self {
        Self {
            versions,
            capabilities,
            ordering: VersionOrdering::default(),
        }
    }

    /// Select the ordering used by [`latest_versions`](Self::latest_versions)
    /// and [`latest_major_minor`](Self::latest_major_minor).
    pub fn with_ordering(mut self, ordering: VersionOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> VersionOrdering {
        self.ordering
    }

    /// Number of distinct versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// All `(version, capability)` pairs, in string order of the version.
    pub fn versions(&self) -> impl Iterator<Item = (&str, CapabilityVersion)> + '_ {
        self.versions.iter().map(|(v, c)| (v.as_str(), *c))
    }

    /// All `(capability, representative version)` pairs, ascending.
    pub fn capabilities(&self) -> impl Iterator<Item = (CapabilityVersion, &str)> + '_ {
        self.capabilities.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// Capability version for a Tailscale version, with or without the `v`
    /// prefix. Returns [`CapabilityVersion::UNKNOWN`] when absent.
    pub fn capability_version_for(&self, version: &str) -> CapabilityVersion {
        self.lookup_capability(version)
            .unwrap_or(CapabilityVersion::UNKNOWN)
    }

    pub fn lookup_capability(&self, version: &str) -> Option<CapabilityVersion> {
        let normalized = normalize_version(version);
        let found = self.versions.get(normalized.as_ref()).copied();
        if found.is_none() {
            debug!(version = %normalized, "unknown tailscale version");
        }
        found
    }

    /// Representative version for a capability version, `""` when absent.
    pub fn version_for(&self, cap: CapabilityVersion) -> &str {
        self.lookup_version(cap).unwrap_or("")
    }

    pub fn lookup_version(&self, cap: CapabilityVersion) -> Option<&str> {
        let found = self.capabilities.get(&cap).map(String::as_str);
        if found.is_none() {
            debug!(capability_version = %cap, "unknown capability version");
        }
        found
    }

    /// The `n` most recent versions, oldest first.
    pub fn latest_versions(&self, n: isize) -> Vec<&str> {
        let Some(n) = window_len(n) else {
            return Vec::new();
        };

        let mut sorted: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        self.ordering.sort(&mut sorted);
        take_latest(sorted, n)
    }

    /// The `n` most recent `major.minor` families (e.g. `v1.80`), oldest
    /// first. With `strip_prefix` the families are returned without `v`.
    pub fn latest_major_minor(&self, n: isize, strip_prefix: bool) -> Vec<String> {
        let Some(n) = window_len(n) else {
            return Vec::new();
        };

        let mut families: Vec<String> = self
            .versions
            .keys()
            .filter_map(|version| {
                let family = version_family(version, strip_prefix);
                if family.is_none() {
                    warn!(version = %version, "version has no minor component, skipping");
                }
                family
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.ordering.sort(&mut families);
        take_latest(families, n)
    }

    /// The `n` highest capability versions, ascending.
    pub fn latest_capability_versions(&self, n: isize) -> Vec<CapabilityVersion> {
        let Some(n) = window_len(n) else {
            return Vec::new();
        };

        let sorted: Vec<CapabilityVersion> = self.capabilities.keys().copied().collect();
        take_latest(sorted, n)
    }
}

/// `major.minor` family of a version string, `None` if it has no `.`.
pub fn version_family(version: &str, strip_prefix: bool) -> Option<String> {
    let version = if strip_prefix {
        ordering::strip_prefix(version)
    } else {
        version
    };

    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => Some(format!("{major}.{minor}")),
        _ => None,
    }
}

fn window_len(n: isize) -> Option<usize> {
    usize::try_from(n).ok().filter(|n| *n > 0)
}

fn take_latest<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    if n < items.len() {
        items.drain(..items.len() - n);
    }
    items
}
