//! DeviceAcquisitionManager - Opens the capture device and owns the stream.
//!
//! Acquisition runs on its own task and walks the profile chain: when a
//! profile is rejected for a reason that a looser profile might avoid, the
//! next profile is tried. The outcome comes back to the controller as an
//! `AcquisitionReport` tagged with the session generation that asked for it.
//!
//! # Cancellation
//!
//! A request cannot be aborted once the device has it. Instead, `release()`
//! forgets the pending generation, and a report that arrives for a forgotten
//! generation has its stream stopped on arrival. If the controller is gone
//! entirely, the acquisition task stops the stream itself.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::capture::{AcquisitionError, ConstraintProfile, ProfileChain};
use crate::ports::{CaptureDevice, CaptureStream, Frame, FrameReceiver, StreamHandle};

/// A stream opened under a particular profile.
#[derive(Debug)]
pub struct AcquiredStream {
    pub profile: ConstraintProfile,
    pub stream: CaptureStream,
}

/// Result of one acquisition attempt, tagged with the requesting generation.
#[derive(Debug)]
pub struct AcquisitionReport {
    pub generation: u64,
    pub result: Result<AcquiredStream, AcquisitionError>,
}

/// What the controller should do with a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The stream is now held; frames will follow.
    Opened { profile: String },
    /// Acquisition failed for the current generation.
    Failed(AcquisitionError),
    /// The report was stale. Any stream it carried has been stopped.
    Discarded,
}

/// Requests `device` with each profile of `profiles` in order.
///
/// Falls back to the next profile only when the error says a looser profile
/// might succeed (`Unknown`, `ConstraintNotSatisfied`). Permission, presence,
/// and capability failures end the chain immediately.
pub async fn acquire_with_fallback(
    device: &dyn CaptureDevice,
    profiles: &ProfileChain,
) -> Result<AcquiredStream, AcquisitionError> {
    let mut chain = profiles.iter().peekable();

    while let Some(profile) = chain.next() {
        match device.request(profile).await {
            Ok(stream) => {
                info!(profile = profile.name(), "Capture device acquired");
                return Ok(AcquiredStream {
                    profile: profile.clone(),
                    stream,
                });
            }
            Err(err) if err.triggers_fallback() && chain.peek().is_some() => {
                warn!(
                    profile = profile.name(),
                    error = %err,
                    "Acquisition failed, falling back to next profile"
                );
            }
            Err(err) => return Err(err),
        }
    }

    // ProfileChain is never empty, so the loop always returns.
    Err(AcquisitionError::Unknown("no constraint profiles configured".to_string()))
}

/// Sole owner of the device stream while a session is live.
pub struct DeviceAcquisitionManager {
    device: Arc<dyn CaptureDevice>,
    profiles: ProfileChain,
    pending: Option<u64>,
    frames: Option<FrameReceiver>,
    handle: Option<Box<dyn StreamHandle>>,
}

impl DeviceAcquisitionManager {
    pub fn new(device: Arc<dyn CaptureDevice>, profiles: ProfileChain) -> Self {
        Self {
            device,
            profiles,
            pending: None,
            frames: None,
            handle: None,
        }
    }

    pub fn profiles(&self) -> &ProfileChain {
        &self.profiles
    }

    /// Starts an acquisition for `generation` on a new task.
    ///
    /// The outcome is delivered on `reports`. Only one request is pending at a
    /// time; beginning again supersedes the earlier generation.
    pub fn begin(&mut self, generation: u64, reports: mpsc::UnboundedSender<AcquisitionReport>) {
        self.pending = Some(generation);
        let device = Arc::clone(&self.device);
        let profiles = self.profiles.clone();

        tokio::spawn(async move {
            let result = acquire_with_fallback(device.as_ref(), &profiles).await;
            if let Err(mpsc::error::SendError(report)) =
                reports.send(AcquisitionReport { generation, result })
            {
                if let Ok(acquired) = report.result {
                    debug!(generation, "Controller gone, stopping late stream");
                    acquired.stream.stop();
                }
            }
        });
    }

    /// True while a request for `generation` has not been settled.
    pub fn is_pending(&self, generation: u64) -> bool {
        self.pending == Some(generation)
    }

    /// Applies a report. Stale reports never reach the held stream.
    pub fn settle(&mut self, report: AcquisitionReport) -> Settlement {
        if !self.is_pending(report.generation) {
            if let Ok(acquired) = report.result {
                debug!(
                    generation = report.generation,
                    profile = acquired.profile.name(),
                    "Stopping stream acquired for a cancelled request"
                );
                acquired.stream.stop();
            }
            return Settlement::Discarded;
        }

        self.pending = None;
        match report.result {
            Ok(acquired) => {
                let profile = acquired.profile.name().to_string();
                self.adopt(acquired.stream);
                Settlement::Opened { profile }
            }
            Err(err) => Settlement::Failed(err),
        }
    }

    /// Takes ownership of `stream`, releasing any stream already held.
    pub fn adopt(&mut self, stream: CaptureStream) {
        self.release_stream();
        let (frames, handle) = stream.into_parts();
        self.frames = Some(frames);
        self.handle = Some(handle);
    }

    pub fn is_holding(&self) -> bool {
        self.handle.is_some()
    }

    /// Waits for the next frame of the held stream.
    ///
    /// `None` means the device ended the stream. Without a held stream this
    /// never resolves, so it can sit in a `select!` unconditionally.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        match self.frames.as_mut() {
            Some(frames) => frames.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Stops every track and forgets any pending request.
    ///
    /// Idempotent. Returns whether a stream was actually stopped.
    pub fn release(&mut self) -> bool {
        if let Some(generation) = self.pending.take() {
            debug!(generation, "Pending acquisition cancelled");
        }
        self.release_stream()
    }

    fn release_stream(&mut self) -> bool {
        if let Some(mut frames) = self.frames.take() {
            frames.close();
        }
        match self.handle.take() {
            Some(mut handle) => {
                handle.stop();
                debug!("Capture device released");
                true
            }
            None => false,
        }
    }
}

impl Drop for DeviceAcquisitionManager {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::simulated::SimulatedCaptureDevice;
    use crate::domain::capture::{FacingMode, ResolutionHint};

    fn chain() -> ProfileChain {
        ProfileChain::standard(FacingMode::Environment, ResolutionHint::new(1280, 720), 30)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // acquire_with_fallback
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_profile_wins_when_granted() {
        let device = SimulatedCaptureDevice::new();

        let acquired = acquire_with_fallback(&device, &chain()).await.unwrap();

        assert_eq!(acquired.profile.name(), "strict");
        assert_eq!(device.requested_profiles(), vec!["strict"]);
    }

    #[tokio::test]
    async fn unknown_error_falls_back_to_relaxed_profile() {
        let device = SimulatedCaptureDevice::new()
            .with_failure(AcquisitionError::Unknown("overconstrained".into()));

        let acquired = acquire_with_fallback(&device, &chain()).await.unwrap();

        assert_eq!(acquired.profile.name(), "relaxed");
        assert_eq!(device.requested_profiles(), vec!["strict", "relaxed"]);
    }

    #[tokio::test]
    async fn constraint_not_satisfied_falls_back() {
        let device = SimulatedCaptureDevice::new()
            .with_failure(AcquisitionError::ConstraintNotSatisfied("frameRate".into()));

        let acquired = acquire_with_fallback(&device, &chain()).await.unwrap();

        assert_eq!(acquired.profile.name(), "relaxed");
    }

    #[tokio::test]
    async fn permission_denied_does_not_fall_back() {
        let device = SimulatedCaptureDevice::new().with_failure(AcquisitionError::PermissionDenied);

        let err = acquire_with_fallback(&device, &chain()).await.unwrap_err();

        assert_eq!(err, AcquisitionError::PermissionDenied);
        assert_eq!(device.request_count(), 1);
    }

    #[tokio::test]
    async fn last_profile_error_is_returned() {
        let device = SimulatedCaptureDevice::new()
            .with_failure(AcquisitionError::Unknown("first".into()))
            .with_failure(AcquisitionError::Unknown("second".into()));

        let err = acquire_with_fallback(&device, &chain()).await.unwrap_err();

        assert_eq!(err, AcquisitionError::Unknown("second".into()));
        assert_eq!(device.request_count(), 2);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // DeviceAcquisitionManager
    // ════════════════════════════════════════════════════════════════════════════

    async fn begin_and_receive(
        manager: &mut DeviceAcquisitionManager,
        generation: u64,
    ) -> AcquisitionReport {
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.begin(generation, tx);
        rx.recv().await.unwrap()
    }

    #[tokio::test]
    async fn settle_opens_stream_for_pending_generation() {
        let device = SimulatedCaptureDevice::new();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());

        let report = begin_and_receive(&mut manager, 1).await;
        let settlement = manager.settle(report);

        assert_eq!(
            settlement,
            Settlement::Opened {
                profile: "strict".into()
            }
        );
        assert!(manager.is_holding());
        assert_eq!(device.live_streams(), 1);
    }

    #[tokio::test]
    async fn settle_discards_report_after_release() {
        let device = SimulatedCaptureDevice::new();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());

        let report = begin_and_receive(&mut manager, 1).await;
        assert!(!manager.release());
        let settlement = manager.settle(report);

        assert_eq!(settlement, Settlement::Discarded);
        assert!(!manager.is_holding());
        assert_eq!(device.live_streams(), 0);
        assert_eq!(device.stop_count(), 1);
    }

    #[tokio::test]
    async fn settle_reports_failure() {
        let device = SimulatedCaptureDevice::new().with_failure(AcquisitionError::DeviceNotFound);
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device), chain());

        let report = begin_and_receive(&mut manager, 4).await;

        assert_eq!(
            manager.settle(report),
            Settlement::Failed(AcquisitionError::DeviceNotFound)
        );
        assert!(!manager.is_pending(4));
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let device = SimulatedCaptureDevice::new();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());
        let report = begin_and_receive(&mut manager, 1).await;
        manager.settle(report);

        assert!(manager.release());
        assert!(!manager.release());
        assert_eq!(device.stop_count(), 1);
        assert_eq!(device.live_streams(), 0);
    }

    #[tokio::test]
    async fn next_frame_yields_pushed_frames() {
        let device = SimulatedCaptureDevice::new();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());
        let report = begin_and_receive(&mut manager, 1).await;
        manager.settle(report);

        assert!(device.latest_feed().unwrap().push_text("hello").await);
        let frame = manager.next_frame().await.unwrap();

        assert_eq!(frame.sequence, 0);
        assert_eq!(frame.data, b"hello".to_vec());
    }

    #[tokio::test]
    async fn dropping_manager_releases_stream() {
        let device = SimulatedCaptureDevice::new();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());
        let report = begin_and_receive(&mut manager, 1).await;
        manager.settle(report);
        let feed = device.latest_feed().unwrap();

        drop(manager);

        assert_eq!(device.live_streams(), 0);
        assert!(device.latest_feed().is_none());
        assert!(!feed.push_text("late").await);
    }

    #[tokio::test]
    async fn acquisition_task_stops_stream_when_controller_is_gone() {
        let device = SimulatedCaptureDevice::new().held();
        let mut manager = DeviceAcquisitionManager::new(Arc::new(device.clone()), chain());
        let (tx, rx) = mpsc::unbounded_channel();

        manager.begin(1, tx);
        drop(rx);
        device.open_gate(1);

        for _ in 0..50 {
            if device.stop_count() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(device.stop_count(), 1);
        assert_eq!(device.live_streams(), 0);
    }
}
