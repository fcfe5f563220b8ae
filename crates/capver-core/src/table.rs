//! Version table files (YAML or JSON)
//!
//! A table carries the two maps the registry is built from:
//!
//! ```yaml
//! versions:
//!   v1.78.0: 109
//!   v1.80.0: 113
//! capabilities:
//!   109: v1.78.0
//!   113: v1.80.0
//! ```
//!
//! `capabilities` is optional. When it is missing, each capability version
//! gets the last normalized version (in key order) that maps to it as
//! representative.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::capability::CapabilityVersion;
use crate::error::{CapverError, Result};
use crate::ordering::normalize_version;
use crate::registry::VersionRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTable {
    pub versions: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<BTreeMap<u32, String>>,
}

impl VersionTable {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| CapverError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = match format {
            TableFormat::Yaml => Self::from_yaml(&content)?,
            TableFormat::Json => Self::from_json(&content)?,
        };
        info!(
            path = %path.display(),
            versions = table.versions.len(),
            "loaded capability version table"
        );
        Ok(table)
    }

    /// Validate and convert into a registry.
    ///
    /// Capability version 0 is reserved for [`CapabilityVersion::UNKNOWN`]
    /// and rejected in either map, as are a bare key and its `v`-prefixed
    /// twin mapping to different capability versions.
    pub fn into_registry(self) -> Result<VersionRegistry> {
        let mut versions = BTreeMap::new();
        for (version, cap) in self.versions {
            let cap = CapabilityVersion(cap);
            let normalized = normalize_version(&version).into_owned();
            if cap.is_unknown() {
                return Err(CapverError::Inconsistent(format!(
                    "version {normalized} maps to reserved capability version {cap}"
                )));
            }
            if let Some(previous) = versions.insert(normalized.clone(), cap) {
                if previous != cap {
                    return Err(CapverError::Inconsistent(format!(
                        "version {normalized} listed with capability versions {previous} and {cap}"
                    )));
                }
            }
        }

        let Some(capabilities) = self.capabilities else {
            let mut reverse = BTreeMap::new();
            for (version, cap) in &versions {
                reverse.insert(*cap, version.clone());
            }
            return Ok(VersionRegistry::from_parts(versions, reverse));
        };

        let mut reverse = BTreeMap::new();
        for (cap, version) in capabilities {
            let cap = CapabilityVersion(cap);
            let version = normalize_version(&version).into_owned();
            if cap.is_unknown() {
                return Err(CapverError::Inconsistent(format!(
                    "reserved capability version {cap} cannot have a representative"
                )));
            }
            match versions.get(&version) {
                Some(mapped) if *mapped == cap => {
                    reverse.insert(cap, version);
                }
                Some(mapped) => {
                    return Err(CapverError::Inconsistent(format!(
                        "capability version {cap} points at {version}, which maps to {mapped}"
                    )));
                }
                None => {
                    return Err(CapverError::Inconsistent(format!(
                        "capability version {cap} points at unknown version {version}"
                    )));
                }
            }
        }

        if let Some((version, cap)) = versions.iter().find(|(_, cap)| !reverse.contains_key(*cap)) {
            return Err(CapverError::Inconsistent(format!(
                "capability version {cap} of {version} has no representative version"
            )));
        }

        Ok(VersionRegistry::from_parts(versions, reverse))
    }
}

impl From<&VersionRegistry> for VersionTable {
    fn from(registry: &VersionRegistry) -> Self {
        Self {
            versions: registry
                .versions()
                .map(|(v, c)| (v.to_string(), c.get()))
                .collect(),
            capabilities: Some(
                registry
                    .capabilities()
                    .map(|(c, v)| (c.get(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<VersionTable> for VersionRegistry {
    type Error = CapverError;

    fn try_from(table: VersionTable) -> Result<Self> {
        table.into_registry()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Yaml,
    Json,
}

impl TableFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(CapverError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
