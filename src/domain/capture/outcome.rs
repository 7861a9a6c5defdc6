//! The terminal artifact of a capture session.

use serde::{Deserialize, Serialize};

use super::ScanError;
use crate::domain::barcode::Barcode;

/// Where a reported barcode came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    Camera,
    Manual,
}

/// What a session produced: a barcode or an error classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Scanned { barcode: Barcode, source: ScanSource },
    Failed { error: ScanError },
}

impl ScanOutcome {
    pub fn barcode(&self) -> Option<&Barcode> {
        match self {
            ScanOutcome::Scanned { barcode, .. } => Some(barcode),
            ScanOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match self {
            ScanOutcome::Failed { error } => Some(error),
            ScanOutcome::Scanned { .. } => None,
        }
    }
}
