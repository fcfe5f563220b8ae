//! Registry configuration
//!
//! Loaded from YAML, then optionally overridden from the environment:
//! - `CAPVER_TABLE`: path to a YAML or JSON version table
//! - `CAPVER_ORDERING`: `lexicographic` or `numeric`
//! - `CAPVER_SUPPORTED_MAJOR_MINOR`: size of the support window
//!
//! An empty or whitespace-only value counts as unset for every variable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::builtin;
use crate::compat::{SupportWindow, DEFAULT_SUPPORTED_MAJOR_MINOR};
use crate::error::{CapverError, Result};
use crate::ordering::VersionOrdering;
use crate::registry::VersionRegistry;
use crate::table::VersionTable;

pub const ENV_TABLE: &str = "CAPVER_TABLE";
pub const ENV_ORDERING: &str = "CAPVER_ORDERING";
pub const ENV_SUPPORTED_MAJOR_MINOR: &str = "CAPVER_SUPPORTED_MAJOR_MINOR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Version table file; the builtin table is used when unset
    #[serde(default)]
    pub table_path: Option<PathBuf>,

    #[serde(default)]
    pub ordering: VersionOrdering,

    /// Families kept in the support window
    #[serde(default = "default_supported_major_minor")]
    pub supported_major_minor: usize,
}

fn default_supported_major_minor() -> usize {
    DEFAULT_SUPPORTED_MAJOR_MINOR
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            ordering: VersionOrdering::default(),
            supported_major_minor: DEFAULT_SUPPORTED_MAJOR_MINOR,
        }
    }
}

impl RegistryConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CapverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Apply `CAPVER_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(env_value)
    }

    /// Apply overrides from any key lookup, e.g. a map in tests.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).and_then(non_blank);

        if let Some(path) = lookup(ENV_TABLE) {
            self.table_path = Some(PathBuf::from(path));
        }
        if let Some(ordering) = lookup(ENV_ORDERING) {
            self.ordering = ordering.parse()?;
        }
        if let Some(window) = lookup(ENV_SUPPORTED_MAJOR_MINOR) {
            self.supported_major_minor = window.trim().parse().map_err(|_| {
                CapverError::Config(format!(
                    "{ENV_SUPPORTED_MAJOR_MINOR} must be a non-negative integer, got '{window}'"
                ))
            })?;
        }
        Ok(self)
    }

    pub fn build_registry(&self) -> Result<VersionRegistry> {
        let registry = match &self.table_path {
            Some(path) => VersionTable::load(path)?.into_registry()?,
            None => builtin::registry().clone(),
        };
        Ok(registry.with_ordering(self.ordering))
    }

    pub fn support_window(&self, registry: &VersionRegistry) -> SupportWindow {
        SupportWindow::new(registry, self.supported_major_minor)
    }
}

/// Read an environment variable, treating an empty or blank value as unset.
pub fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(non_blank)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.supported_major_minor, 10);
        assert_eq!(config.ordering, VersionOrdering::Lexicographic);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "table_path: /etc/capver/table.yaml\nordering: numeric\nsupported_major_minor: 4\n";
        let config = RegistryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.table_path, Some(PathBuf::from("/etc/capver/table.yaml")));
        assert_eq!(config.ordering, VersionOrdering::Numeric);
        assert_eq!(config.supported_major_minor, 4);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(RegistryConfig::from_yaml("tabel_path: x.yaml").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = RegistryConfig::default()
            .apply_overrides(overrides(&[
                (ENV_TABLE, "custom.json"),
                (ENV_ORDERING, "numeric"),
                (ENV_SUPPORTED_MAJOR_MINOR, "3"),
            ]))
            .unwrap();
        assert_eq!(config.table_path, Some(PathBuf::from("custom.json")));
        assert_eq!(config.ordering, VersionOrdering::Numeric);
        assert_eq!(config.supported_major_minor, 3);
    }

    #[test]
    fn test_invalid_override() {
        let err = RegistryConfig::default()
            .apply_overrides(overrides(&[(ENV_SUPPORTED_MAJOR_MINOR, "-1")]))
            .unwrap_err();
        assert!(matches!(err, CapverError::Config(_)));

        let err = RegistryConfig::default()
            .apply_overrides(overrides(&[(ENV_ORDERING, "random")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("CONFIG/"));
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let base = RegistryConfig {
            table_path: Some(PathBuf::from("table.yaml")),
            ordering: VersionOrdering::Numeric,
            supported_major_minor: 4,
        };
        let config = base
            .clone()
            .apply_overrides(overrides(&[
                (ENV_TABLE, ""),
                (ENV_ORDERING, ""),
                (ENV_SUPPORTED_MAJOR_MINOR, "  "),
            ]))
            .unwrap();
        assert_eq!(config, base);
    }

    #[test]
    fn test_override_values_are_trimmed() {
        let config = RegistryConfig::default()
            .apply_overrides(overrides(&[
                (ENV_TABLE, " custom.yaml "),
                (ENV_ORDERING, " numeric\n"),
                (ENV_SUPPORTED_MAJOR_MINOR, " 6 "),
            ]))
            .unwrap();
        assert_eq!(config.table_path, Some(PathBuf::from("custom.yaml")));
        assert_eq!(config.ordering, VersionOrdering::Numeric);
        assert_eq!(config.supported_major_minor, 6);
    }

    #[test]
    fn test_builtin_registry_with_configured_ordering() {
        let config = RegistryConfig {
            ordering: VersionOrdering::Numeric,
            ..RegistryConfig::default()
        };
        let registry = config.build_registry().unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.ordering(), VersionOrdering::Numeric);
    }
}
