//! DecodeEngine port - Interface for the external barcode decoding capability.
//!
//! Symbology decoding is not implemented in this crate; an engine (ZXing,
//! zbar, a platform detector) sits behind this trait.

use thiserror::Error;

use super::Frame;
use crate::domain::barcode::{DecodeResult, FormatAllowList};

/// Raw failure reported by an engine for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No barcode in the frame. The normal steady-state outcome.
    #[error("no barcode found in frame")]
    NotFound,

    /// The frame could not be interpreted (truncated, wrong pixel format).
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Any other engine failure.
    #[error("engine failure: {0}")]
    Failure(String),
}

/// Port for decoding a single frame.
///
/// Called once per frame on the controller's task, so implementations should
/// return quickly and must not block on I/O.
pub trait DecodeEngine: Send + Sync {
    /// Looks for a barcode of one of `formats` in `frame`.
    fn decode(&self, frame: &Frame, formats: &FormatAllowList) -> Result<DecodeResult, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn DecodeEngine) {}

    #[test]
    fn not_found_display() {
        assert_eq!(EngineError::NotFound.to_string(), "no barcode found in frame");
    }
}
