//! Error types shared across the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    EmptyField,
    OutOfRange,
    InvalidFormat,
    InvalidCandidate,
    EmptyManualEntry,

    // Acquisition errors
    PermissionDenied,
    DeviceNotFound,
    DeviceUnsupported,
    ConstraintNotSatisfied,
    AcquisitionFailed,

    // Stream and decode errors
    DecodeFailed,
    StreamEnded,

    // State errors
    ScannerInactive,
    RemediationRequired,
    ControllerClosed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidCandidate => "INVALID_CANDIDATE",
            ErrorCode::EmptyManualEntry => "EMPTY_MANUAL_ENTRY",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::DeviceNotFound => "DEVICE_NOT_FOUND",
            ErrorCode::DeviceUnsupported => "DEVICE_UNSUPPORTED",
            ErrorCode::ConstraintNotSatisfied => "CONSTRAINT_NOT_SATISFIED",
            ErrorCode::AcquisitionFailed => "ACQUISITION_FAILED",
            ErrorCode::DecodeFailed => "DECODE_FAILED",
            ErrorCode::StreamEnded => "STREAM_ENDED",
            ErrorCode::ScannerInactive => "SCANNER_INACTIVE",
            ErrorCode::RemediationRequired => "REMEDIATION_REQUIRED",
            ErrorCode::ControllerClosed => "CONTROLLER_CLOSED",
        };
        write!(f, "{}", s)
    }
}
