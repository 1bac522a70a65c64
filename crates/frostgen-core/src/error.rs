//! Error types for curve backends and parameters

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the curve backends and parameter validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Threshold parameters out of range
    #[error("Invalid parameters: threshold {threshold} of {participants} participants (need 1 <= t <= n)")]
    InvalidParameters { threshold: u16, participants: u16 },

    /// A point or scalar could not be decoded
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}
