//! Integration tests for loading registries from table and config files.

use std::io::Write;

use capver_core::{
    CapabilityVersion, CapverError, RegistryConfig, VersionOrdering, VersionRegistry, VersionTable,
};
use tempfile::{Builder, NamedTempFile};

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const TABLE_YAML: &str = r#"
versions:
  v1.9.0: 9
  v1.10.0: 10
  v1.100.0: 100
  v1.100.1: 100
capabilities:
  9: v1.9.0
  10: v1.10.0
  100: v1.100.0
"#;

#[test]
fn test_load_yaml_table() {
    let file = write_temp(".yaml", TABLE_YAML);
    let registry = VersionTable::load(file.path()).unwrap().into_registry().unwrap();

    assert_eq!(registry.len(), 4);
    assert_eq!(registry.capability_version_for("1.100.1"), CapabilityVersion(100));
    assert_eq!(registry.version_for(CapabilityVersion(100)), "v1.100.0");
}

#[test]
fn test_load_json_table() {
    let json = r#"{
        "versions": {"v1.78.0": 109, "v1.80.0": 113},
        "capabilities": {"109": "v1.78.0", "113": "v1.80.0"}
    }"#;
    let file = write_temp(".json", json);
    let registry: VersionRegistry = VersionTable::load(file.path()).unwrap().try_into().unwrap();

    assert_eq!(registry.latest_capability_versions(1), vec![CapabilityVersion(113)]);
}

#[test]
fn test_missing_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = VersionTable::load(dir.path().join("absent.yaml")).unwrap_err();

    assert!(matches!(err, CapverError::Io { .. }));
    assert!(err.to_string().starts_with("IO/"));
}

#[test]
fn test_malformed_json_table() {
    let file = write_temp(".json", "{\"versions\": ");
    let err = VersionTable::load(file.path()).unwrap_err();
    assert!(matches!(err, CapverError::Json(_)));
}

#[test]
fn test_config_file_selects_table_and_ordering() {
    let table = write_temp(".yml", TABLE_YAML);
    let config_yaml = format!(
        "table_path: {}\nordering: numeric\nsupported_major_minor: 1\n",
        table.path().display()
    );
    let config_file = write_temp(".yaml", &config_yaml);

    let config = RegistryConfig::load(config_file.path()).unwrap();
    let registry = config.build_registry().unwrap();
    assert_eq!(registry.ordering(), VersionOrdering::Numeric);
    assert_eq!(registry.latest_versions(2), vec!["v1.100.0", "v1.100.1"]);
    assert_eq!(registry.latest_major_minor(2, true), vec!["1.10", "1.100"]);

    let window = config.support_window(&registry);
    assert_eq!(window.supported_families(), ["v1.100"]);
    assert!(window.is_supported(CapabilityVersion(100)));
    assert!(!window.is_supported(CapabilityVersion(10)));
}

#[test]
fn test_lexicographic_ordering_is_the_default() {
    let table = write_temp(".yaml", TABLE_YAML);
    let config = RegistryConfig {
        table_path: Some(table.path().to_path_buf()),
        ..RegistryConfig::default()
    };
    let registry = config.build_registry().unwrap();

    // "v1.9.0" sorts after "v1.100.x" as plain strings
    assert_eq!(registry.latest_versions(1), vec!["v1.9.0"]);
    assert_eq!(registry.latest_major_minor(1, true), vec!["1.9"]);
}

#[test]
fn test_inconsistent_table_file() {
    let file = write_temp(
        ".yaml",
        "versions:\n  v1.80.0: 113\ncapabilities:\n  113: v1.82.0\n",
    );
    let config = RegistryConfig {
        table_path: Some(file.path().to_path_buf()),
        ..RegistryConfig::default()
    };
    let err = config.build_registry().unwrap_err();
    assert!(matches!(err, CapverError::Inconsistent(_)));
}
