//! Error types for load and dump operations.
//!
//! Navigation through [`crate::Wrapper`] never fails, so nothing here is
//! produced by `get`, `at_one`, `at_many` or iteration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or dumping a tree value.
#[derive(Error, Debug)]
pub enum WrapError {
    /// The input was neither valid JSON nor valid YAML.
    /// Carries the diagnostic from each parser.
    #[error("Parsing errors:\nJSON: {json}\nYAML: {yaml}")]
    Parse { json: String, yaml: String },

    /// The file to load does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The directory to save into does not exist.
    #[error("Path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Any other I/O failure while reading or writing `path`.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested serialization format is not `json` or `yaml`.
    #[error("Unsupported format: '{0}'")]
    UnsupportedFormat(String),

    /// The JSON emitter failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML emitter failed.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias used throughout jsonwrap.
pub type Result<T> = std::result::Result<T, WrapError>;
