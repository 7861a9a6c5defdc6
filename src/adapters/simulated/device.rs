//! Simulated capture device.
//!
//! Stands in for a camera in tests and in the demo binary. Outcomes for each
//! request can be queued up front, requests can be held open until the test
//! releases them, and frames are injected by hand through a `FrameFeed`.
//!
//! # Example
//!
//! ```ignore
//! let device = SimulatedCaptureDevice::new()
//!     .with_failure(AcquisitionError::Unknown("overconstrained".into()));
//!
//! // first request fails, the relaxed profile is granted
//! let feed = device.latest_feed().unwrap();
//! feed.push_text("5012345678900").await;
//! ```
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This device is not a
//! production camera backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};

use crate::domain::capture::{AcquisitionError, ConstraintProfile, ResolutionHint};
use crate::ports::{CaptureDevice, CaptureStream, Frame, StreamHandle};

/// Frame size used when the profile carries no resolution hint.
const FALLBACK_RESOLUTION: ResolutionHint = ResolutionHint {
    width: 640,
    height: 480,
};

/// Default capacity of each stream's frame channel.
pub const DEFAULT_FRAME_BUFFER: usize = 8;

#[derive(Debug, Default)]
struct TrackCounters {
    live: AtomicUsize,
    stopped: AtomicUsize,
}

/// Camera stand-in with scripted acquisition outcomes.
#[derive(Debug, Clone)]
pub struct SimulatedCaptureDevice {
    /// Outcomes consumed one per request; requests are granted once empty.
    outcomes: Arc<Mutex<VecDeque<Result<(), AcquisitionError>>>>,
    /// Profiles received, in order.
    requests: Arc<Mutex<Vec<ConstraintProfile>>>,
    /// One slot per granted stream, in grant order. Emptied when the
    /// stream is stopped or ended.
    feeds: Arc<Mutex<Vec<Option<FrameFeed>>>>,
    /// When set, each request waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
    buffer: usize,
    tracks: Arc<TrackCounters>,
}

impl SimulatedCaptureDevice {
    /// A device that grants every request.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            feeds: Arc::new(Mutex::new(Vec::new())),
            gate: None,
            buffer: DEFAULT_FRAME_BUFFER,
            tracks: Arc::new(TrackCounters::default()),
        }
    }

    /// Capacity of the frame channel of each granted stream.
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Queues a failure for the next unanswered request.
    pub fn with_failure(self, error: AcquisitionError) -> Self {
        self.lock_outcomes().push_back(Err(error));
        self
    }

    /// Queues an explicit grant, useful between failures.
    pub fn with_grant(self) -> Self {
        self.lock_outcomes().push_back(Ok(()));
        self
    }

    /// Holds every request until `open_gate` hands out a permit.
    pub fn held(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `requests` held requests proceed. No-op on an ungated device.
    pub fn open_gate(&self, requests: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(requests);
        }
    }

    // === Inspection ===

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("SimulatedCaptureDevice: requests lock poisoned").len()
    }

    /// Names of the profiles requested so far.
    pub fn requested_profiles(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("SimulatedCaptureDevice: requests lock poisoned")
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Streams granted and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.tracks.live.load(Ordering::SeqCst)
    }

    /// Streams stopped so far.
    pub fn stop_count(&self) -> usize {
        self.tracks.stopped.load(Ordering::SeqCst)
    }

    /// Feed of the `index`th granted stream, unless it was ended.
    pub fn feed(&self, index: usize) -> Option<FrameFeed> {
        self.lock_feeds().get(index).cloned().flatten()
    }

    /// Feed of the most recently granted stream, unless it was ended.
    pub fn latest_feed(&self) -> Option<FrameFeed> {
        self.lock_feeds().last().cloned().flatten()
    }

    /// Drops the device's side of the `index`th stream.
    ///
    /// The consumer sees the stream end once every other `FrameFeed` clone
    /// for it has been dropped as well.
    pub fn end_stream(&self, index: usize) {
        if let Some(slot) = self.lock_feeds().get_mut(index) {
            slot.take();
        }
    }

    /// Ends the most recently granted stream.
    pub fn end_latest_stream(&self) {
        let mut feeds = self.lock_feeds();
        if let Some(slot) = feeds.last_mut() {
            slot.take();
        }
    }

    fn lock_outcomes(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<(), AcquisitionError>>> {
        self.outcomes
            .lock()
            .expect("SimulatedCaptureDevice: outcomes lock poisoned")
    }

    fn lock_feeds(&self) -> std::sync::MutexGuard<'_, Vec<Option<FrameFeed>>> {
        self.feeds
            .lock()
            .expect("SimulatedCaptureDevice: feeds lock poisoned")
    }
}

impl Default for SimulatedCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCaptureDevice {
    async fn request(&self, profile: &ConstraintProfile) -> Result<CaptureStream, AcquisitionError> {
        self.requests
            .lock()
            .expect("SimulatedCaptureDevice: requests lock poisoned")
            .push(profile.clone());

        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return Err(AcquisitionError::Unknown("device gate closed".to_string())),
            }
        }

        let outcome = self.lock_outcomes().pop_front().unwrap_or(Ok(()));
        outcome?;

        let resolution = profile.resolution().unwrap_or(FALLBACK_RESOLUTION);
        let (sender, frames) = mpsc::channel(self.buffer);
        let slot = {
            let mut feeds = self.lock_feeds();
            feeds.push(Some(FrameFeed {
                sender,
                sequence: Arc::new(AtomicU64::new(0)),
                resolution,
            }));
            feeds.len() - 1
        };
        self.tracks.live.fetch_add(1, Ordering::SeqCst);

        let handle = SimulatedTrack {
            tracks: Arc::clone(&self.tracks),
            feeds: Arc::clone(&self.feeds),
            slot,
            stopped: false,
        };
        Ok(CaptureStream::new(frames, Box::new(handle)))
    }
}

/// Stop side of a simulated stream.
struct SimulatedTrack {
    tracks: Arc<TrackCounters>,
    feeds: Arc<Mutex<Vec<Option<FrameFeed>>>>,
    slot: usize,
    stopped: bool,
}

impl StreamHandle for SimulatedTrack {
    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(feed) = self
            .feeds
            .lock()
            .expect("SimulatedCaptureDevice: feeds lock poisoned")
            .get_mut(self.slot)
        {
            feed.take();
        }
        self.tracks.live.fetch_sub(1, Ordering::SeqCst);
        self.tracks.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Injects frames into one granted stream.
#[derive(Debug, Clone)]
pub struct FrameFeed {
    sender: mpsc::Sender<Frame>,
    sequence: Arc<AtomicU64>,
    resolution: ResolutionHint,
}

impl FrameFeed {
    /// Pushes raw frame bytes, waiting for channel capacity.
    ///
    /// Returns false once the consumer has released the stream.
    pub async fn push(&self, data: impl Into<Vec<u8>>) -> bool {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let frame = Frame::new(
            sequence,
            self.resolution.width,
            self.resolution.height,
            data.into(),
        );
        self.sender.send(frame).await.is_ok()
    }

    /// Pushes a frame whose payload is `text`, as read by `TextPayloadEngine`.
    pub async fn push_text(&self, text: &str) -> bool {
        self.push(text.as_bytes().to_vec()).await
    }

    /// True once the consumer has released the stream.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
