//! CaptureState enum for the lifecycle of a capture session.
//!
//! ```text
//! Idle --> Acquiring --> Streaming --> Decoding --> Found
//!              |             |            |-------> Stopped
//!              |             |            '-------> Failed
//!              |             '--> Stopped | Failed
//!              '--> Failed | Stopped
//! Found | Stopped | Failed --> Idle
//! any live state --> Idle   (unconditional teardown)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// No device held, no loop running.
    #[default]
    Idle,
    /// Device requested, waiting for the stream.
    Acquiring,
    /// Stream open, decode loop not yet started.
    Streaming,
    /// Decode loop consuming frames.
    Decoding,
    /// A validated result was delivered. Transient.
    Found,
    /// Deactivated or stopped by the user. Transient.
    Stopped,
    /// Acquisition or stream failed. Transient.
    Failed,
}

impl CaptureState {
    /// Returns true while a session holds, or is obtaining, the device.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            CaptureState::Acquiring | CaptureState::Streaming | CaptureState::Decoding
        )
    }

    /// Returns true for the states that resolve to `Idle` once their side effects complete.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CaptureState::Found | CaptureState::Stopped | CaptureState::Failed
        )
    }
}

impl StateMachine for CaptureState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CaptureState::*;
        matches!(
            (self, target),
            (Idle, Acquiring)
                | (Acquiring, Streaming)
                | (Acquiring, Failed)
                | (Acquiring, Stopped)
                | (Streaming, Decoding)
                | (Streaming, Stopped)
                | (Streaming, Failed)
                | (Decoding, Found)
                | (Decoding, Stopped)
                | (Decoding, Failed)
                | (Acquiring, Idle)
                | (Streaming, Idle)
                | (Decoding, Idle)
                | (Found, Idle)
                | (Stopped, Idle)
                | (Failed, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CaptureState::*;
        match self {
            Idle => vec![Acquiring],
            Acquiring => vec![Streaming, Failed, Stopped, Idle],
            Streaming => vec![Decoding, Stopped, Failed, Idle],
            Decoding => vec![Found, Stopped, Failed, Idle],
            Found | Stopped | Failed => vec![Idle],
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureState::Idle => "Idle",
            CaptureState::Acquiring => "Acquiring",
            CaptureState::Streaming => "Streaming",
            CaptureState::Decoding => "Decoding",
            CaptureState::Found => "Found",
            CaptureState::Stopped => "Stopped",
            CaptureState::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CaptureState; 7] = [
        CaptureState::Idle,
        CaptureState::Acquiring,
        CaptureState::Streaming,
        CaptureState::Decoding,
        CaptureState::Found,
        CaptureState::Stopped,
        CaptureState::Failed,
    ];

    #[test]
    fn default_is_idle() {
        assert_eq!(CaptureState::default(), CaptureState::Idle);
    }

    #[test]
    fn happy_path_is_valid() {
        let state = CaptureState::Idle
            .transition_to(CaptureState::Acquiring)
            .and_then(|s| s.transition_to(CaptureState::Streaming))
            .and_then(|s| s.transition_to(CaptureState::Decoding))
            .and_then(|s| s.transition_to(CaptureState::Found))
            .and_then(|s| s.transition_to(CaptureState::Idle));
        assert_eq!(state, Ok(CaptureState::Idle));
    }

    #[test]
    fn idle_cannot_jump_to_decoding() {
        assert!(CaptureState::Idle
            .transition_to(CaptureState::Decoding)
            .is_err());
    }

    #[test]
    fn found_only_comes_from_decoding() {
        for state in ALL {
            let allowed = state.can_transition_to(&CaptureState::Found);
            assert_eq!(allowed, state == CaptureState::Decoding, "{:?}", state);
        }
    }

    #[test]
    fn every_non_idle_state_can_return_to_idle() {
        for state in ALL.into_iter().filter(|s| *s != CaptureState::Idle) {
            assert!(state.can_transition_to(&CaptureState::Idle), "{:?}", state);
        }
    }

    #[test]
    fn transient_states_only_resolve_to_idle() {
        for state in ALL.into_iter().filter(|s| s.is_transient()) {
            assert_eq!(state.valid_transitions(), vec![CaptureState::Idle]);
        }
    }

    #[test]
    fn no_state_is_terminal() {
        for state in ALL {
            assert!(!state.is_terminal(), "{:?}", state);
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in ALL {
            for target in ALL {
                assert_eq!(
                    state.can_transition_to(&target),
                    state.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }

    #[test]
    fn live_states() {
        assert!(CaptureState::Acquiring.is_live());
        assert!(CaptureState::Decoding.is_live());
        assert!(!CaptureState::Idle.is_live());
        assert!(!CaptureState::Found.is_live());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&CaptureState::Decoding).unwrap(),
            "\"decoding\""
        );
    }
}
