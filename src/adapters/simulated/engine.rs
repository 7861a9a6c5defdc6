//! Text payload decode engine.
//!
//! Treats each frame's bytes as the UTF-8 text of the barcode in view. Pairs
//! with `SimulatedCaptureDevice` so tests and the demo can "show" a barcode by
//! pushing its digits as a frame.

use crate::domain::barcode::{BarcodeFormat, DecodeResult, FormatAllowList};
use crate::ports::{DecodeEngine, EngineError, Frame};

/// Reads frame bytes as text.
///
/// - Empty frame: nothing in view (`NotFound`)
/// - Invalid UTF-8: `MalformedFrame`
/// - Otherwise the text, with a format inferred from its shape
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPayloadEngine;

impl TextPayloadEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DecodeEngine for TextPayloadEngine {
    fn decode(&self, frame: &Frame, formats: &FormatAllowList) -> Result<DecodeResult, EngineError> {
        let text = std::str::from_utf8(&frame.data)
            .map_err(|e| EngineError::MalformedFrame(e.to_string()))?;
        if text.is_empty() {
            return Err(EngineError::NotFound);
        }

        let format = infer_format(text);
        if !formats.contains(format) {
            return Err(EngineError::NotFound);
        }
        Ok(DecodeResult::new(text, format))
    }
}

/// Picks the symbology a real engine would most likely report for `text`.
fn infer_format(text: &str) -> BarcodeFormat {
    let numeric = text.bytes().all(|b| b.is_ascii_digit());
    match (numeric, text.len()) {
        (true, 13) => BarcodeFormat::Ean13,
        (true, 12) => BarcodeFormat::UpcA,
        (true, 8) => BarcodeFormat::Ean8,
        (true, 6) => BarcodeFormat::UpcE,
        (true, n) if n % 2 == 0 => BarcodeFormat::Itf,
        _ if text.bytes().all(is_code39_byte) => BarcodeFormat::Code39,
        _ => BarcodeFormat::Code128,
    }
}

fn is_code39_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b" -.$/+%".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: &[u8]) -> Frame {
        Frame::new(0, 640, 480, data.to_vec())
    }

    #[test]
    fn empty_frame_is_not_found() {
        let engine = TextPayloadEngine::new();
        assert_eq!(
            engine.decode(&frame(b""), &FormatAllowList::all()),
            Err(EngineError::NotFound)
        );
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let engine = TextPayloadEngine::new();
        assert!(matches!(
            engine.decode(&frame(&[0xff, 0xfe]), &FormatAllowList::all()),
            Err(EngineError::MalformedFrame(_))
        ));
    }

    #[test]
    fn infers_product_code_formats() {
        assert_eq!(infer_format("5012345678900"), BarcodeFormat::Ean13);
        assert_eq!(infer_format("012345678905"), BarcodeFormat::UpcA);
        assert_eq!(infer_format("96385074"), BarcodeFormat::Ean8);
        assert_eq!(infer_format("123456"), BarcodeFormat::UpcE);
        assert_eq!(infer_format("1234"), BarcodeFormat::Itf);
    }

    #[test]
    fn infers_alphanumeric_formats() {
        assert_eq!(infer_format("ABC-123"), BarcodeFormat::Code39);
        assert_eq!(infer_format("123"), BarcodeFormat::Code39);
        assert_eq!(infer_format("hello"), BarcodeFormat::Code128);
    }

    #[test]
    fn disallowed_format_is_not_found() {
        let engine = TextPayloadEngine::new();
        let formats = FormatAllowList::new([BarcodeFormat::Ean13]).unwrap();
        assert_eq!(
            engine.decode(&frame(b"96385074"), &formats),
            Err(EngineError::NotFound)
        );
        assert!(engine.decode(&frame(b"5012345678900"), &formats).is_ok());
    }
}
