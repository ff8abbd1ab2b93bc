//! Error types for Assay
//!
//! Uses `thiserror` for library errors; the binary surfaces them via `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ModelDefault;

/// Result type alias for Assay operations
pub type AssayResult<T> = Result<T, AssayError>;

/// Main error type for Assay operations
#[derive(Error, Debug)]
pub enum AssayError {
    /// A cloud was given without a region when building a scope
    #[error("the cloud '{cloud}' must be followed by a region")]
    CloudWithoutRegion { cloud: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The orchestrator CLI exited non-zero
    #[error("command '{command}' exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// A read returned an empty mapping where exactly one key was expected
    #[error("model-defaults returned no entries, expected exactly one")]
    EmptyDefaults,

    /// A read returned several keys where exactly one was expected
    #[error("model-defaults returned {count} entries, expected exactly one")]
    AmbiguousDefaults { count: usize },

    /// A response mapping key was not a string
    #[error("model-defaults entry has a non-string key")]
    KeyNotString,

    /// The response body was not a mapping at all
    #[error("model-defaults output is not a mapping")]
    NotAMapping,

    /// A region scenario was requested for a scope without a region
    #[error("scope '{scope}' has no region to assess")]
    MissingRegion { scope: String },

    /// A scenario assertion failed; carries both compared values
    #[error("{message}\n  expected: {expected}\n    actual: {actual}")]
    Mismatch {
        message: String,
        expected: ModelDefault,
        actual: ModelDefault,
    },

    /// Malformed harness configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },
}
