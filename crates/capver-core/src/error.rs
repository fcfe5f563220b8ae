//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a registry or loading its configuration.
///
/// Queries never fail: missing keys are answered with sentinel values.
#[derive(Error, Debug)]
pub enum CapverError {
    #[error("IO/{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PARSE/yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("PARSE/json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FORMAT/unsupported table format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("TABLE/{0}")]
    Inconsistent(String),

    #[error("CONFIG/{0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CapverError>;
