//! Builtin version table shipped with the crate
use once_cell::sync::Lazy;

use crate::registry::VersionRegistry;
use crate::table::VersionTable;

/// Raw YAML of the embedded table
pub const BUILTIN_TABLE: &str = include_str!("../data/capver.yaml");

static BUILTIN: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionTable::from_yaml(BUILTIN_TABLE)
        .and_then(VersionTable::into_registry)
        .expect("embedded capability version table is valid")
});

/// Registry over the embedded table, parsed on first use.
pub fn registry() -> &'static VersionRegistry {
    &BUILTIN
}
