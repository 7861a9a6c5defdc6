//! Decode results and decode failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BarcodeFormat;
use crate::domain::foundation::ErrorCode;

/// A barcode payload read from one frame, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    pub text: String,
    pub format: BarcodeFormat,
}

impl DecodeResult {
    pub fn new(text: impl Into<String>, format: BarcodeFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

/// A per-frame decode failure other than "not found".
///
/// Always transient: the decode loop logs it and keeps consuming frames.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("malformed frame #{sequence}: {reason}")]
    MalformedFrame { sequence: u64, reason: String },

    #[error("decode engine failure: {0}")]
    Engine(String),
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::DecodeFailed
    }
}
