//! Version string normalization and ordering
//!
//! Stored versions always carry a leading `v`. Two orderings are available
//! for the "latest" queries:
//! - `Lexicographic`: plain string comparison. Matches semantic ordering only
//!   while numeric components have equal digit width, e.g. `v1.100.0` sorts
//!   before `v1.9.0`.
//! - `Numeric`: component-wise, comparing digit-only components as integers.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CapverError;

/// Prefix carried by every stored version string
pub const VERSION_PREFIX: &str = "v";

/// Add the `v` prefix when missing.
pub fn normalize_version(version: &str) -> Cow<'_, str> {
    if version.starts_with(VERSION_PREFIX) {
        Cow::Borrowed(version)
    } else {
        Cow::Owned(format!("{VERSION_PREFIX}{version}"))
    }
}

/// Strip one leading `v`, if present.
pub fn strip_prefix(version: &str) -> &str {
    version.strip_prefix(VERSION_PREFIX).unwrap_or(version)
}

/// Ordering applied to version strings and version families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    #[default]
    Lexicographic,
    Numeric,
}

impl VersionOrdering {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::Numeric => compare_numeric(a, b),
        }
    }

    /// Sort in place, ascending.
    pub fn sort<S: AsRef<str>>(self, items: &mut [S]) {
        items.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let mut left = strip_prefix(a).split('.');
    let mut right = strip_prefix(b).split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

impl fmt::Display for VersionOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => write!(f, "lexicographic"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for VersionOrdering {
    type Err = CapverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(Self::Lexicographic),
            "numeric" => Ok(Self::Numeric),
            other => Err(CapverError::Config(format!(
                "unknown version ordering '{other}' (expected lexicographic or numeric)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_prefix_once() {
        assert_eq!(normalize_version("1.80.0"), "v1.80.0");
        assert_eq!(normalize_version("v1.80.0"), "v1.80.0");
        assert!(matches!(normalize_version("v1.80.0"), Cow::Borrowed(_)));
        assert_eq!(normalize_version(""), "v");
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("v1.80.0"), "1.80.0");
        assert_eq!(strip_prefix("1.80.0"), "1.80.0");
    }

    #[test]
    fn test_lexicographic_keeps_string_order() {
        let mut versions = vec!["v1.9.0", "v1.100.0", "v1.80.0"];
        VersionOrdering::Lexicographic.sort(&mut versions);
        assert_eq!(versions, vec!["v1.100.0", "v1.80.0", "v1.9.0"]);
    }

    #[test]
    fn test_numeric_orders_by_component_value() {
        let mut versions = vec!["v1.9.0", "v1.100.0", "v1.80.0", "v1.80"];
        VersionOrdering::Numeric.sort(&mut versions);
        assert_eq!(versions, vec!["v1.9.0", "v1.80", "v1.80.0", "v1.100.0"]);
    }

    #[test]
    fn test_numeric_falls_back_to_string_for_non_digits() {
        let ord = VersionOrdering::Numeric;
        assert_eq!(ord.compare("v1.80.0-pre", "v1.80.1"), Ordering::Less);
        assert_eq!(ord.compare("1.80", "v1.80"), "1.80".cmp("v1.80"));
    }

    #[test]
    fn test_parse_ordering() {
        assert_eq!("numeric".parse::<VersionOrdering>().unwrap(), VersionOrdering::Numeric);
        assert_eq!(
            " Lexicographic ".parse::<VersionOrdering>().unwrap(),
            VersionOrdering::Lexicographic
        );
        assert!(matches!(
            "semver".parse::<VersionOrdering>(),
            Err(CapverError::Config(_))
        ));
    }
}
