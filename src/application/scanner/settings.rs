//! Runtime settings and the observable scanner snapshot.

use serde::Serialize;

use crate::domain::barcode::{CandidateValidator, FormatAllowList};
use crate::domain::capture::{AcquisitionError, CaptureState, ProfileChain, ScanOutcome};
use crate::domain::foundation::SessionId;

/// Everything the controller needs that is fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScannerSettings {
    /// Profiles tried in order when opening the device.
    pub profiles: ProfileChain,
    /// Symbologies the decode engine is asked for.
    pub formats: FormatAllowList,
    /// Length filter applied to decoded candidates.
    pub validator: CandidateValidator,
    /// Forward per-frame decode failures to `ScanListener::on_error`.
    pub surface_decode_errors: bool,
}

/// Point-in-time view of the controller, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScannerSnapshot {
    /// Host-controlled activation flag.
    pub active: bool,
    pub state: CaptureState,
    pub session_id: Option<SessionId>,
    pub active_profile: Option<String>,
    pub detection_attempts: u64,
    pub holding_device: bool,
    pub decoding: bool,
    pub sessions_started: u64,
    /// Acquisition failure of the most recent session, if it failed that way.
    pub last_failure: Option<AcquisitionError>,
    /// How the most recent session ended. Cleared when a new session starts.
    pub last_outcome: Option<ScanOutcome>,
}

impl ScannerSnapshot {
    /// True when no session is live and nothing holds the device.
    pub fn is_settled(&self) -> bool {
        self.state == CaptureState::Idle && !self.holding_device && !self.decoding
    }
}
