//! CaptureDevice port - Interface for camera-like frame sources.
//!
//! The platform (browser media API, V4L2, PipeWire, a simulator) opens a
//! stream under a `ConstraintProfile` and then *pushes* frames into a bounded
//! channel. The consumer never polls the device.
//!
//! # Ownership
//!
//! A `CaptureStream` is an exclusive handle. Whoever holds it must eventually
//! call `StreamHandle::stop`, which ends every track of the stream.

use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

use crate::domain::capture::{AcquisitionError, ConstraintProfile};

/// One video frame delivered by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position of the frame in its stream, starting at 0.
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Raw pixel (or encoded) bytes, interpreted by the decode engine.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(sequence: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            sequence,
            width,
            height,
            data,
        }
    }
}

/// Receiving end of the frames pushed by an open stream.
pub type FrameReceiver = mpsc::Receiver<Frame>;

/// Control side of an open stream.
pub trait StreamHandle: Send {
    /// Stops all underlying tracks. Must be safe to call more than once.
    fn stop(&mut self);
}

/// An opened device stream: frames plus the handle that ends them.
pub struct CaptureStream {
    frames: FrameReceiver,
    handle: Box<dyn StreamHandle>,
}

impl CaptureStream {
    pub fn new(frames: FrameReceiver, handle: Box<dyn StreamHandle>) -> Self {
        Self { frames, handle }
    }

    /// Splits the stream so frames and control can be owned separately.
    pub fn into_parts(self) -> (FrameReceiver, Box<dyn StreamHandle>) {
        (self.frames, self.handle)
    }

    /// Stops the stream without consuming any frame.
    pub fn stop(self) {
        let (mut frames, mut handle) = self.into_parts();
        frames.close();
        handle.stop();
    }
}

impl fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureStream").finish_non_exhaustive()
    }
}

/// Port for acquiring exclusive access to a capture device.
///
/// # Errors
///
/// - `PermissionDenied` when access is refused
/// - `DeviceNotFound` when nothing is attached
/// - `DeviceUnsupported` when the device cannot stream
/// - `ConstraintNotSatisfied` when a hard constraint of `profile` cannot be met
/// - `Unknown` for anything else
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Opens a stream matching `profile`.
    async fn request(&self, profile: &ConstraintProfile) -> Result<CaptureStream, AcquisitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn CaptureDevice) {}

    struct CountingHandle(Arc<AtomicUsize>);

    impl StreamHandle for CountingHandle {
        fn stop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn stop_closes_frames_and_stops_tracks() {
        let stops = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel(1);
        let stream = CaptureStream::new(rx, Box::new(CountingHandle(stops.clone())));

        stream.stop();

        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert!(tx.send(Frame::new(0, 1, 1, Vec::new())).await.is_err());
    }
}
