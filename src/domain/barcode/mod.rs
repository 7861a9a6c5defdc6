//! Barcode domain module.
//!
//! Symbologies, raw decode results, and the length validation that turns a
//! decode result into a reportable `Barcode`.

mod candidate;
mod decode;
mod format;

pub use candidate::{Barcode, CandidateValidator, InvalidCandidate, PRODUCT_CODE_LENGTHS};
pub use decode::{DecodeError, DecodeResult};
pub use format::{BarcodeFormat, FormatAllowList};
