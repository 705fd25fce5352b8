//! Error types for credential resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while resolving or encoding registry credentials
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("unable to load config file {}: {source}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("credential helper {helper} failed: {message}")]
    StoreLookup { helper: String, message: String },

    #[error("failed to encode auth config: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("failed to decode auth config: {0}")]
    Decoding(String),
}

/// A repository reference that does not follow the distribution grammar
///
/// The raw reference is kept so callers can fall back to it as a server name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("repository reference is empty")]
    Empty,

    #[error("repository name must not be more than 255 characters: {reference}")]
    NameTooLong { reference: String },

    #[error("invalid reference format: {reference}")]
    InvalidFormat { reference: String },

    #[error("invalid reference format, repository name must be lowercase: {reference}")]
    NameNotLowercase { reference: String },
}

impl ReferenceError {
    /// The raw reference that failed to parse
    pub fn reference(&self) -> &str {
        match self {
            ReferenceError::Empty => "",
            ReferenceError::NameTooLong { reference }
            | ReferenceError::InvalidFormat { reference }
            | ReferenceError::NameNotLowercase { reference } => reference,
        }
    }
}

/// Why a config file could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid auth entry for {server}: {reason}")]
    InvalidAuth { server: String, reason: String },
}
