//! ContinuousDecodeLoop - Per-frame detection while a stream is open.
//!
//! The loop is driven by the frames the device pushes; it never polls. Each
//! frame goes through the decode adapter and, if something was read, through
//! the candidate validator. The first valid candidate stops the loop.

use tracing::{debug, trace, warn};

use super::DecodeEngineAdapter;
use crate::domain::barcode::{Barcode, CandidateValidator, DecodeError, FormatAllowList, InvalidCandidate};
use crate::ports::Frame;

/// What one frame produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameVerdict {
    /// The loop is not running; the frame was dropped without decoding.
    Ignored,
    /// Nothing found. The normal steady-state outcome.
    NotFound,
    /// Something was read but failed length validation.
    Rejected(InvalidCandidate),
    /// The engine failed on this frame. The loop keeps running.
    Anomaly(DecodeError),
    /// A valid barcode. The loop has stopped itself.
    Detected(Barcode),
}

pub struct ContinuousDecodeLoop {
    adapter: DecodeEngineAdapter,
    validator: CandidateValidator,
    running: bool,
    attempts: u64,
}

impl ContinuousDecodeLoop {
    pub fn new(adapter: DecodeEngineAdapter, validator: CandidateValidator) -> Self {
        Self {
            adapter,
            validator,
            running: false,
            attempts: 0,
        }
    }

    /// Sets the format allow-list for the next session.
    pub fn configure(&mut self, formats: FormatAllowList) {
        self.adapter.configure(formats);
    }

    /// Starts the loop if a stream is open and no loop is already running.
    ///
    /// Returns whether the loop was started. Resets the attempt counter.
    pub fn start(&mut self, stream_open: bool) -> bool {
        if !stream_open || self.running {
            return false;
        }
        self.running = true;
        self.attempts = 0;
        true
    }

    /// Stops scheduling further decode attempts. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            debug!(attempts = self.attempts, "Decode loop stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Decode attempts made since the last `start`.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Runs one decode attempt on `frame`.
    pub fn on_frame(&mut self, frame: &Frame) -> FrameVerdict {
        if !self.running {
            return FrameVerdict::Ignored;
        }
        self.attempts += 1;

        match self.adapter.decode(frame) {
            Ok(None) => {
                trace!(sequence = frame.sequence, "No barcode in frame");
                FrameVerdict::NotFound
            }
            Ok(Some(result)) => match self.validator.validate(&result) {
                Ok(barcode) => {
                    self.stop();
                    FrameVerdict::Detected(barcode)
                }
                Err(rejected) => {
                    debug!(
                        sequence = frame.sequence,
                        length = rejected.length,
                        "Discarding candidate with unaccepted length"
                    );
                    FrameVerdict::Rejected(rejected)
                }
            },
            Err(err) => {
                warn!(sequence = frame.sequence, error = %err, "Decode attempt failed");
                FrameVerdict::Anomaly(err)
            }
        }
    }
}
