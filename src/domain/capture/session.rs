//! CaptureSession - one activation-to-teardown cycle.

use serde::Serialize;

use super::CaptureState;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};

/// A single capture attempt.
///
/// Created when activation is requested and dropped by the controller once it
/// resolves back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureSession {
    id: SessionId,
    generation: u64,
    state: CaptureState,
    active_profile: Option<String>,
    detection_attempts: u64,
    started_at: Timestamp,
}

impl CaptureSession {
    /// Starts a session in `Idle`; the controller moves it to `Acquiring`.
    pub fn new(generation: u64) -> Self {
        Self {
            id: SessionId::new(),
            generation,
            state: CaptureState::Idle,
            active_profile: None,
            detection_attempts: 0,
            started_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Monotonic number used to recognise stale acquisition reports.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn active_profile(&self) -> Option<&str> {
        self.active_profile.as_deref()
    }

    pub fn detection_attempts(&self) -> u64 {
        self.detection_attempts
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Moves to `target` if the state machine allows it.
    pub fn advance(&mut self, target: CaptureState) -> Result<CaptureState, ValidationError> {
        self.state = self.state.transition_to(target)?;
        Ok(self.state)
    }

    /// Records which profile opened the stream.
    pub fn record_profile(&mut self, profile: impl Into<String>) {
        self.active_profile = Some(profile.into());
    }

    pub fn record_attempts(&mut self, attempts: u64) {
        self.detection_attempts = attempts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_idle_with_zero_attempts() {
        let session = CaptureSession::new(1);
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(session.detection_attempts(), 0);
        assert_eq!(session.generation(), 1);
        assert!(session.active_profile().is_none());
        assert!(!session.is_live());
    }

    #[test]
    fn advance_follows_state_machine() {
        let mut session = CaptureSession::new(1);
        assert_eq!(session.advance(CaptureState::Acquiring), Ok(CaptureState::Acquiring));
        assert!(session.is_live());
        assert!(session.advance(CaptureState::Found).is_err());
        assert_eq!(session.state(), CaptureState::Acquiring);
    }

    #[test]
    fn records_profile_and_attempts() {
        let mut session = CaptureSession::new(3);
        session.record_profile("relaxed");
        session.record_attempts(7);
        assert_eq!(session.active_profile(), Some("relaxed"));
        assert_eq!(session.detection_attempts(), 7);
    }
}
