//! Errors returned to the host by scanner control operations.

use thiserror::Error;

use super::ManualEntryError;
use crate::domain::capture::AcquisitionError;
use crate::domain::foundation::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// Retry was requested while the host has the scanner deactivated.
    #[error("scanner is not active")]
    Inactive,

    /// The last session failed in a way retrying cannot fix.
    #[error("retry needs user remediation first: {0}")]
    RemediationRequired(AcquisitionError),

    #[error(transparent)]
    ManualEntry(#[from] ManualEntryError),

    /// The scanner service has stopped.
    #[error("scanner controller has shut down")]
    ControllerClosed,
}

impl ControlError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ControlError::Inactive => ErrorCode::ScannerInactive,
            ControlError::RemediationRequired(_) => ErrorCode::RemediationRequired,
            ControlError::ManualEntry(err) => err.code(),
            ControlError::ControllerClosed => ErrorCode::ControllerClosed,
        }
    }
}
