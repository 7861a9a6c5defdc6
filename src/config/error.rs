//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("At least one barcode format must be enabled")]
    NoFormats,

    #[error("Accepted lengths must be non-empty and positive")]
    InvalidAcceptedLengths,

    #[error("Ideal resolution must be non-zero")]
    InvalidResolution,

    #[error("Ideal frame rate must be between 1 and 240")]
    InvalidFrameRate,

    #[error("Frame buffer must hold at least one frame")]
    InvalidFrameBuffer,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid scanner setting: {0}")]
    InvalidSetting(#[from] crate::domain::foundation::ValidationError),
}
