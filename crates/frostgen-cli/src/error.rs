//! Error types for the frostgen binary

use std::path::PathBuf;

use frostgen_dkg::DkgError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur while generating and writing a group
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The group file could not be written; the generated keys are lost
    #[error("Failed to write frost group to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Key generation error
    #[error("Key generation error: {0}")]
    Dkg(#[from] DkgError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
