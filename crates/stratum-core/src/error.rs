//! Error types for Stratum protocols

use thiserror::Error;

/// Stratum errors, one variant per failure category
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StratumError {
    /// Missing or wrong-shaped primitive dependency at construction time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input, out-of-range value or bad key encoding
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tag, signature or challenge mismatch.
    /// Carries no detail so a wrong tag and a wrong structure look alike.
    #[error("Authentication failed")]
    Authentication,

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// The underlying primitive call failed
    #[error("System error: {0}")]
    System(String),
}

impl StratumError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        StratumError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        StratumError::Validation(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        StratumError::System(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, StratumError::Configuration(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StratumError::Validation(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, StratumError::Authentication)
    }

    pub fn is_unsupported_mode(&self) -> bool {
        matches!(self, StratumError::UnsupportedMode(_))
    }

    pub fn is_system(&self) -> bool {
        matches!(self, StratumError::System(_))
    }
}

/// Result type for Stratum operations
pub type StratumResult<T> = Result<T, StratumError>;
