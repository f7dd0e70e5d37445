//! Error types for catalog loading and configuration.

use thiserror::Error;

/// Errors that can occur while loading schemas or configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A loaded schema or package failed validation.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// File extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// No configured source could be loaded.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
