//! Capture-specific error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::barcode::DecodeError;
use crate::domain::foundation::ErrorCode;

/// Why the capture device could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AcquisitionError {
    /// The user or platform refused camera access.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No capture device is attached.
    #[error("no capture device found")]
    DeviceNotFound,

    /// A device exists but cannot produce a usable stream.
    #[error("capture device unsupported: {0}")]
    DeviceUnsupported(String),

    /// The device cannot satisfy a hard constraint of the requested profile.
    #[error("constraint not satisfied: {0}")]
    ConstraintNotSatisfied(String),

    /// Anything the platform did not classify.
    #[error("acquisition failed: {0}")]
    Unknown(String),
}

impl AcquisitionError {
    /// Errors that end the session without trying another profile.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AcquisitionError::PermissionDenied
                | AcquisitionError::DeviceNotFound
                | AcquisitionError::DeviceUnsupported(_)
        )
    }

    /// Errors that move acquisition on to the next, more permissive profile.
    pub fn triggers_fallback(&self) -> bool {
        !self.is_terminal()
    }

    /// Errors that a retry cannot fix without outside help
    /// (a permission prompt, plugging in a camera, or manual entry).
    pub fn requires_remediation(&self) -> bool {
        matches!(
            self,
            AcquisitionError::PermissionDenied | AcquisitionError::DeviceNotFound
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AcquisitionError::PermissionDenied => ErrorCode::PermissionDenied,
            AcquisitionError::DeviceNotFound => ErrorCode::DeviceNotFound,
            AcquisitionError::DeviceUnsupported(_) => ErrorCode::DeviceUnsupported,
            AcquisitionError::ConstraintNotSatisfied(_) => ErrorCode::ConstraintNotSatisfied,
            AcquisitionError::Unknown(_) => ErrorCode::AcquisitionFailed,
        }
    }
}

/// Error delivered to the host through `ScanListener::on_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScanError {
    /// The fallback chain was exhausted. Fatal for the session.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// A transient per-frame failure. Only surfaced when configured.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The device stopped producing frames while the session was live. Fatal for the session.
    #[error("capture stream ended unexpectedly")]
    StreamEnded,
}

impl ScanError {
    /// Returns true if this error ended the session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScanError::Decode(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::Acquisition(err) => err.code(),
            ScanError::Decode(err) => err.code(),
            ScanError::StreamEnded => ErrorCode::StreamEnded,
        }
    }
}
