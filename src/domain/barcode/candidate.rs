//! Candidate validation and the validated `Barcode` value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::DecodeResult;
use crate::domain::foundation::{ErrorCode, ValidationError};

/// Widths of the supported product codes: EAN-8, UPC-A and EAN-13.
pub const PRODUCT_CODE_LENGTHS: [usize; 3] = [8, 12, 13];

/// Barcode text that has passed validation and may be reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    /// Wraps text that a validator in this crate has already accepted.
    pub(crate) fn from_validated(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A decoded candidate whose width is not an accepted product-code width.
///
/// Never escalated: frames often contain incidental non-product text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("candidate '{text}' has unsupported length {length}")]
pub struct InvalidCandidate {
    pub text: String,
    pub length: usize,
}

impl InvalidCandidate {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidCandidate
    }
}

/// Length filter applied to every decode result before it is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateValidator {
    accepted_lengths: Vec<usize>,
}

impl CandidateValidator {
    /// Validator accepting only the given character counts.
    pub fn new(accepted_lengths: impl IntoIterator<Item = usize>) -> Result<Self, ValidationError> {
        let mut lengths: Vec<usize> = accepted_lengths.into_iter().collect();
        lengths.sort_unstable();
        lengths.dedup();

        if lengths.is_empty() {
            return Err(ValidationError::empty_field("accepted_lengths"));
        }
        if lengths[0] == 0 {
            return Err(ValidationError::out_of_range(
                "accepted_lengths",
                1,
                i64::from(u16::MAX),
                0,
            ));
        }
        Ok(Self {
            accepted_lengths: lengths,
        })
    }

    /// Validator for the three retail product-code widths.
    pub fn product_codes() -> Self {
        Self {
            accepted_lengths: PRODUCT_CODE_LENGTHS.to_vec(),
        }
    }

    pub fn accepted_lengths(&self) -> &[usize] {
        &self.accepted_lengths
    }

    /// Returns true if `text` has an accepted width (counted in characters).
    pub fn accepts(&self, text: &str) -> bool {
        self.accepted_lengths.contains(&text.chars().count())
    }

    /// Turns a decode result into a reportable barcode, or rejects it.
    pub fn validate(&self, result: &DecodeResult) -> Result<Barcode, InvalidCandidate> {
        if self.accepts(&result.text) {
            Ok(Barcode::from_validated(result.text.clone()))
        } else {
            Err(InvalidCandidate {
                text: result.text.clone(),
                length: result.text.chars().count(),
            })
        }
    }
}

impl Default for CandidateValidator {
    fn default() -> Self {
        Self::product_codes()
    }
}
