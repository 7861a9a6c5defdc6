//! LifecycleController - Owns the session state machine and ties the parts together.
//!
//! The controller is synchronous: every method runs to completion on the
//! service task. Async work (device acquisition) is handed to the
//! acquisition manager and comes back later as an `AcquisitionReport`.
//!
//! # Teardown order
//!
//! Whenever a session ends, the decode loop is stopped before the device
//! stream is released, so no decode attempt ever touches a stopped stream.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::{
    AcquisitionReport, ContinuousDecodeLoop, ControlError, DecodeEngineAdapter,
    DeviceAcquisitionManager, FrameVerdict, ScannerSettings, ScannerSnapshot, Settlement,
};
use crate::domain::barcode::{Barcode, FormatAllowList};
use crate::domain::capture::{
    AcquisitionError, CaptureSession, CaptureState, ScanError, ScanOutcome, ScanSource,
};
use crate::domain::foundation::StateMachine;
use crate::ports::{CaptureDevice, DecodeEngine, Frame, ScanListener};

pub struct LifecycleController {
    acquisition: DeviceAcquisitionManager,
    decode_loop: ContinuousDecodeLoop,
    listener: Arc<dyn ScanListener>,
    reports: mpsc::UnboundedSender<AcquisitionReport>,
    snapshots: watch::Sender<ScannerSnapshot>,
    formats: FormatAllowList,
    surface_decode_errors: bool,
    active: bool,
    session: Option<CaptureSession>,
    generation: u64,
    sessions_started: u64,
    last_failure: Option<AcquisitionError>,
    last_outcome: Option<ScanOutcome>,
}

impl LifecycleController {
    /// Creates an inactive controller.
    ///
    /// Acquisition outcomes are sent on `reports`; whoever drives the
    /// controller must feed them back through `on_acquisition`.
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        engine: Arc<dyn DecodeEngine>,
        listener: Arc<dyn ScanListener>,
        settings: ScannerSettings,
        reports: mpsc::UnboundedSender<AcquisitionReport>,
    ) -> Self {
        let ScannerSettings {
            profiles,
            formats,
            validator,
            surface_decode_errors,
        } = settings;
        let adapter = DecodeEngineAdapter::new(engine, formats.clone());
        let (snapshots, _) = watch::channel(ScannerSnapshot::default());

        Self {
            acquisition: DeviceAcquisitionManager::new(device, profiles),
            decode_loop: ContinuousDecodeLoop::new(adapter, validator),
            listener,
            reports,
            snapshots,
            formats,
            surface_decode_errors,
            active: false,
            session: None,
            generation: 0,
            sessions_started: 0,
            last_failure: None,
            last_outcome: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ScannerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        let session = self.session.as_ref();
        ScannerSnapshot {
            active: self.active,
            state: session.map(CaptureSession::state).unwrap_or_default(),
            session_id: session.map(|s| *s.id()),
            active_profile: session.and_then(|s| s.active_profile().map(str::to_string)),
            detection_attempts: session.map(CaptureSession::detection_attempts).unwrap_or(0),
            holding_device: self.acquisition.is_holding(),
            decoding: self.decode_loop.is_running(),
            sessions_started: self.sessions_started,
            last_failure: self.last_failure.clone(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while the device stream is held and frames may arrive.
    pub fn is_streaming(&self) -> bool {
        self.acquisition.is_holding()
    }

    /// Host activation flag. Setting the current value again is a no-op.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        info!(active, "Scanner activation changed");

        if active {
            self.begin_session();
        } else {
            self.teardown(CaptureState::Stopped);
        }
        self.publish();
    }

    /// Starts a fresh session after a recoverable failure or a finished scan.
    ///
    /// # Errors
    ///
    /// - `Inactive` if the host has deactivated the scanner
    /// - `RemediationRequired` if the last failure was `PermissionDenied`
    ///   or `DeviceNotFound`
    pub fn retry(&mut self) -> Result<(), ControlError> {
        if !self.active {
            return Err(ControlError::Inactive);
        }
        if let Some(failure) = self.last_failure.as_ref().filter(|f| f.requires_remediation()) {
            return Err(ControlError::RemediationRequired(failure.clone()));
        }

        self.begin_session();
        self.publish();
        Ok(())
    }

    /// Ends the current session, if any. The activation flag is unchanged.
    pub fn stop(&mut self) {
        self.teardown(CaptureState::Stopped);
        self.publish();
    }

    /// Reports a barcode typed by the user.
    ///
    /// A live session ends as `Found` so `on_scan` fires at most once for it.
    pub fn submit_manual(&mut self, barcode: Barcode) {
        self.deliver(barcode, ScanSource::Manual);
        self.publish();
    }

    /// Final teardown before the service exits.
    pub fn shutdown(&mut self) {
        self.active = false;
        self.teardown(CaptureState::Stopped);
        self.publish();
    }

    /// Applies the outcome of an acquisition started by this controller.
    pub fn on_acquisition(&mut self, report: AcquisitionReport) {
        let generation = report.generation;
        match self.acquisition.settle(report) {
            Settlement::Discarded => {
                debug!(generation, "Ignoring stale acquisition report");
                return;
            }
            Settlement::Opened { profile } => self.on_stream_open(profile),
            Settlement::Failed(err) => self.fail(ScanError::Acquisition(err)),
        }
        self.publish();
    }

    /// Waits for the next frame of the held stream. Pending when none is held.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.acquisition.next_frame().await
    }

    /// Handles one frame, or the end of the stream when `frame` is `None`.
    pub fn on_frame(&mut self, frame: Option<Frame>) {
        let Some(frame) = frame else {
            if self.session.as_ref().is_some_and(CaptureSession::is_live) {
                self.fail(ScanError::StreamEnded);
            } else {
                self.acquisition.release();
            }
            self.publish();
            return;
        };

        match self.decode_loop.on_frame(&frame) {
            FrameVerdict::Ignored | FrameVerdict::NotFound | FrameVerdict::Rejected(_) => {}
            FrameVerdict::Anomaly(err) => {
                if self.surface_decode_errors {
                    self.listener.on_error(&ScanError::Decode(err));
                }
            }
            FrameVerdict::Detected(barcode) => {
                self.record_attempts();
                self.deliver(barcode, ScanSource::Camera);
                self.publish();
                return;
            }
        }
        self.record_attempts();
        self.publish();
    }

    fn begin_session(&mut self) {
        if self.session.is_some() {
            self.teardown(CaptureState::Stopped);
        }

        self.generation += 1;
        self.sessions_started += 1;
        self.last_failure = None;
        self.last_outcome = None;

        let mut session = CaptureSession::new(self.generation);
        advance(&mut session, CaptureState::Acquiring);
        info!(
            session_id = %session.id(),
            generation = self.generation,
            "Capture session started"
        );

        self.decode_loop.configure(self.formats.clone());
        self.acquisition.begin(self.generation, self.reports.clone());
        self.session = Some(session);
    }

    fn on_stream_open(&mut self, profile: String) {
        let Some(session) = self.session.as_mut() else {
            // Settled reports always belong to the current session.
            self.acquisition.release();
            return;
        };

        session.record_profile(profile);
        advance(session, CaptureState::Streaming);

        if self.decode_loop.start(self.acquisition.is_holding()) {
            advance(session, CaptureState::Decoding);
            debug!(session_id = %session.id(), "Decode loop started");
        }
    }

    fn deliver(&mut self, barcode: Barcode, source: ScanSource) {
        info!(barcode = %barcode, source = ?source, "Barcode scanned");
        self.listener.on_scan(&barcode);
        self.last_outcome = Some(ScanOutcome::Scanned { barcode, source });
        self.teardown(CaptureState::Found);
    }

    fn fail(&mut self, error: ScanError) {
        warn!(code = %error.code(), error = %error, "Capture session failed");
        if let ScanError::Acquisition(err) = &error {
            self.last_failure = Some(err.clone());
        }
        self.teardown(CaptureState::Failed);
        self.listener.on_error(&error);
        self.last_outcome = Some(ScanOutcome::Failed { error });
    }

    /// Stops the loop, releases the device, and resolves the session to `Idle`.
    ///
    /// `terminal` is recorded when the state machine allows it from the
    /// current state; otherwise the session is recorded as `Stopped`.
    fn teardown(&mut self, terminal: CaptureState) {
        self.decode_loop.stop();
        let released = self.acquisition.release();

        let Some(mut session) = self.session.take() else {
            return;
        };

        let end = if session.state().can_transition_to(&terminal) {
            terminal
        } else {
            CaptureState::Stopped
        };
        if session.state().can_transition_to(&end) {
            advance(&mut session, end);
        }
        advance(&mut session, CaptureState::Idle);

        info!(
            session_id = %session.id(),
            end = %end,
            released,
            attempts = session.detection_attempts(),
            elapsed_ms = session.started_at().elapsed().num_milliseconds(),
            "Capture session ended"
        );
    }

    fn record_attempts(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.record_attempts(self.decode_loop.attempts());
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

fn advance(session: &mut CaptureSession, target: CaptureState) {
    if let Err(err) = session.advance(target) {
        error!(
            session_id = %session.id(),
            from = %session.state(),
            to = %target,
            error = %err,
            "Rejected capture state transition"
        );
    }
}
