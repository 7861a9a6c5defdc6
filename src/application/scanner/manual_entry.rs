//! Manual entry - Typed barcodes that bypass the camera path.

use thiserror::Error;

use crate::domain::barcode::Barcode;
use crate::domain::foundation::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManualEntryError {
    #[error("manual entry is empty")]
    Empty,
}

impl ManualEntryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ManualEntryError::Empty => ErrorCode::EmptyManualEntry,
        }
    }
}

/// Trims `input` and accepts any non-empty remainder.
///
/// No length check applies here: the host's user is trusted to type what is
/// printed under the bars, whatever the symbology.
pub fn accept_manual_entry(input: &str) -> Result<Barcode, ManualEntryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ManualEntryError::Empty);
    }
    Ok(Barcode::from_validated(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let barcode = accept_manual_entry(" 5012345678900 ").unwrap();
        assert_eq!(barcode.as_str(), "5012345678900");
    }

    #[test]
    fn whitespace_only_is_rejected() {
        assert_eq!(accept_manual_entry("  "), Err(ManualEntryError::Empty));
        assert_eq!(accept_manual_entry(""), Err(ManualEntryError::Empty));
    }

    #[test]
    fn any_length_is_accepted() {
        assert_eq!(accept_manual_entry("42").unwrap().as_str(), "42");
    }

    #[test]
    fn empty_error_has_code() {
        assert_eq!(ManualEntryError::Empty.code(), ErrorCode::EmptyManualEntry);
        assert_eq!(ManualEntryError::Empty.code().to_string(), "EMPTY_MANUAL_ENTRY");
    }
}
