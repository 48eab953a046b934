// lib/src/errors.rs

use std::io;
use std::path::PathBuf;

use models::ValidationError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Fatal errors. Everything after a bundle has been decoded is infallible;
/// malformed records, unparseable values and dangling references are handled
/// where they occur and never surface here.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] SerdeJsonError),

    #[error("Invalid bundle: {0}")]
    InvalidBundle(String),

    #[error("No bundles found in {0}")]
    NoBundles(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<toml::de::Error> for GraphError {
    fn from(err: toml::de::Error) -> Self {
        GraphError::ConfigurationError(format!("TOML parse error: {}", err))
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
