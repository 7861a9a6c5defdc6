//! DecodeEngineAdapter - Narrow wrapper around the external decode engine.
//!
//! Translates the engine's three-way answer into what the decode loop needs:
//! `Ok(Some(result))`, `Ok(None)` for "not found", or a typed `DecodeError`.

use std::sync::Arc;

use tracing::debug;

use crate::domain::barcode::{DecodeError, DecodeResult, FormatAllowList};
use crate::ports::{DecodeEngine, EngineError, Frame};

/// Stateless per call; holds only the format allow-list for the current session.
pub struct DecodeEngineAdapter {
    engine: Arc<dyn DecodeEngine>,
    formats: FormatAllowList,
}

impl DecodeEngineAdapter {
    pub fn new(engine: Arc<dyn DecodeEngine>, formats: FormatAllowList) -> Self {
        Self { engine, formats }
    }

    /// Replaces the allow-list. Called once at session start.
    pub fn configure(&mut self, formats: FormatAllowList) {
        self.formats = formats;
    }

    pub fn formats(&self) -> &FormatAllowList {
        &self.formats
    }

    /// Decodes one frame.
    ///
    /// "Not found" is `Ok(None)`, never an error. A result in a format outside
    /// the allow-list is treated the same way.
    pub fn decode(&self, frame: &Frame) -> Result<Option<DecodeResult>, DecodeError> {
        match self.engine.decode(frame, &self.formats) {
            Ok(result) if self.formats.contains(result.format) => Ok(Some(result)),
            Ok(result) => {
                debug!(
                    sequence = frame.sequence,
                    format = %result.format,
                    "Ignoring result outside the format allow-list"
                );
                Ok(None)
            }
            Err(EngineError::NotFound) => Ok(None),
            Err(EngineError::MalformedFrame(reason)) => Err(DecodeError::MalformedFrame {
                sequence: frame.sequence,
                reason,
            }),
            Err(EngineError::Failure(message)) => Err(DecodeError::Engine(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::barcode::BarcodeFormat;
    use std::sync::Mutex;

    /// Engine that replays a fixed answer and records the formats it was given.
    struct FixedEngine {
        answer: Result<DecodeResult, EngineError>,
        seen_formats: Mutex<Vec<Vec<BarcodeFormat>>>,
    }

    impl FixedEngine {
        fn new(answer: Result<DecodeResult, EngineError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                seen_formats: Mutex::new(Vec::new()),
            })
        }
    }

    impl DecodeEngine for FixedEngine {
        fn decode(&self, _frame: &Frame, formats: &FormatAllowList) -> Result<DecodeResult, EngineError> {
            self.seen_formats
                .lock()
                .unwrap()
                .push(formats.as_slice().to_vec());
            self.answer.clone()
        }
    }

    fn frame() -> Frame {
        Frame::new(9, 640, 480, vec![1, 2, 3])
    }

    #[test]
    fn passes_through_allowed_result() {
        let engine = FixedEngine::new(Ok(DecodeResult::new("5012345678900", BarcodeFormat::Ean13)));
        let adapter = DecodeEngineAdapter::new(engine, FormatAllowList::all());

        let result = adapter.decode(&frame()).unwrap();

        assert_eq!(result.unwrap().text, "5012345678900");
    }

    #[test]
    fn not_found_is_not_an_error() {
        let adapter = DecodeEngineAdapter::new(
            FixedEngine::new(Err(EngineError::NotFound)),
            FormatAllowList::all(),
        );
        assert_eq!(adapter.decode(&frame()), Ok(None));
    }

    #[test]
    fn result_outside_allow_list_is_treated_as_not_found() {
        let engine = FixedEngine::new(Ok(DecodeResult::new("ABC-123", BarcodeFormat::Code39)));
        let formats = FormatAllowList::new([BarcodeFormat::Ean13]).unwrap();
        let adapter = DecodeEngineAdapter::new(engine, formats);

        assert_eq!(adapter.decode(&frame()), Ok(None));
    }

    #[test]
    fn malformed_frame_carries_sequence() {
        let adapter = DecodeEngineAdapter::new(
            FixedEngine::new(Err(EngineError::MalformedFrame("odd stride".into()))),
            FormatAllowList::all(),
        );

        let err = adapter.decode(&frame()).unwrap_err();

        assert_eq!(
            err,
            DecodeError::MalformedFrame {
                sequence: 9,
                reason: "odd stride".into()
            }
        );
    }

    #[test]
    fn engine_failure_maps_to_engine_error() {
        let adapter = DecodeEngineAdapter::new(
            FixedEngine::new(Err(EngineError::Failure("gpu lost".into()))),
            FormatAllowList::all(),
        );
        assert_eq!(
            adapter.decode(&frame()),
            Err(DecodeError::Engine("gpu lost".into()))
        );
    }

    #[test]
    fn configure_changes_formats_sent_to_engine() {
        let engine = FixedEngine::new(Err(EngineError::NotFound));
        let mut adapter = DecodeEngineAdapter::new(engine.clone(), FormatAllowList::all());

        adapter.configure(FormatAllowList::new([BarcodeFormat::Ean8]).unwrap());
        adapter.decode(&frame()).unwrap();

        let seen = engine.seen_formats.lock().unwrap();
        assert_eq!(seen.last().unwrap(), &vec![BarcodeFormat::Ean8]);
    }
}
