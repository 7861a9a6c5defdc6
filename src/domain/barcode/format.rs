//! Barcode symbologies recognized by the decode engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// A barcode symbology the decode engine can be asked to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code128,
    Code39,
    Itf,
}

impl BarcodeFormat {
    /// Every supported symbology, product codes first.
    pub const ALL: [BarcodeFormat; 7] = [
        BarcodeFormat::Ean13,
        BarcodeFormat::Ean8,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::Code128,
        BarcodeFormat::Code39,
        BarcodeFormat::Itf,
    ];

    /// Returns true for the retail product-code families (EAN/UPC).
    pub fn is_product_code(&self) -> bool {
        matches!(
            self,
            BarcodeFormat::Ean13 | BarcodeFormat::Ean8 | BarcodeFormat::UpcA | BarcodeFormat::UpcE
        )
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarcodeFormat::Ean13 => "EAN-13",
            BarcodeFormat::Ean8 => "EAN-8",
            BarcodeFormat::UpcA => "UPC-A",
            BarcodeFormat::UpcE => "UPC-E",
            BarcodeFormat::Code128 => "Code128",
            BarcodeFormat::Code39 => "Code39",
            BarcodeFormat::Itf => "ITF",
        };
        write!(f, "{}", s)
    }
}

/// Non-empty, duplicate-free set of formats handed to the decode engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatAllowList(Vec<BarcodeFormat>);

impl FormatAllowList {
    /// Builds an allow-list, preserving first-seen order.
    pub fn new(formats: impl IntoIterator<Item = BarcodeFormat>) -> Result<Self, ValidationError> {
        let mut unique = Vec::new();
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::empty_field("formats"));
        }
        Ok(Self(unique))
    }

    /// Allow-list containing every supported symbology.
    pub fn all() -> Self {
        Self(BarcodeFormat::ALL.to_vec())
    }

    pub fn contains(&self, format: BarcodeFormat) -> bool {
        self.0.contains(&format)
    }

    pub fn as_slice(&self) -> &[BarcodeFormat] {
        &self.0
    }
}

impl Default for FormatAllowList {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_conventional_names() {
        assert_eq!(BarcodeFormat::Ean13.to_string(), "EAN-13");
        assert_eq!(BarcodeFormat::UpcE.to_string(), "UPC-E");
        assert_eq!(BarcodeFormat::Itf.to_string(), "ITF");
    }

    #[test]
    fn deserializes_from_snake_case() {
        let format: BarcodeFormat = serde_json::from_str("\"upc_a\"").unwrap();
        assert_eq!(format, BarcodeFormat::UpcA);
        let format: BarcodeFormat = serde_json::from_str("\"code128\"").unwrap();
        assert_eq!(format, BarcodeFormat::Code128);
    }

    #[test]
    fn product_code_families() {
        assert!(BarcodeFormat::Ean8.is_product_code());
        assert!(!BarcodeFormat::Code39.is_product_code());
    }

    #[test]
    fn allow_list_rejects_empty() {
        assert!(FormatAllowList::new(Vec::new()).is_err());
    }

    #[test]
    fn allow_list_removes_duplicates() {
        let list = FormatAllowList::new([
            BarcodeFormat::Ean13,
            BarcodeFormat::Ean8,
            BarcodeFormat::Ean13,
        ])
        .unwrap();
        assert_eq!(list.as_slice(), &[BarcodeFormat::Ean13, BarcodeFormat::Ean8]);
    }

    #[test]
    fn default_allow_list_covers_all_formats() {
        let list = FormatAllowList::default();
        for format in BarcodeFormat::ALL {
            assert!(list.contains(format));
        }
    }
}
