//! Error types for schema file and configuration handling.

use thiserror::Error;

/// Errors that can occur while reading or writing schema descriptors and
/// configuration files.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
