//! Crate-level error type.

use crate::{document::record::FieldError, parse::ParseError};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed JSON configuration.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Cabrillo field spec not of the form `name:width`.
    #[error("invalid field spec {0:?}, expected name:width")]
    FieldSpec(String),
    /// Cabrillo header line not of the form `KEY=VALUE`.
    #[error("invalid header {0:?}, expected KEY=VALUE")]
    HeaderSpec(String),
}

/// Any error produced while converting a log.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A field could not be resolved.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Snapshot serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
