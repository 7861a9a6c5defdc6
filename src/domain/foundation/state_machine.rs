//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across lifecycle statuses such as the capture session state.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for CaptureState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, Acquiring) | (Acquiring, Streaming))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![Acquiring],
///             // ... etc
///         }
///     }
/// }
///
/// let next = CaptureState::Idle.transition_to(CaptureState::Acquiring)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TrackStatus {
        Requested,
        Live,
        Ended,
    }

    impl StateMachine for TrackStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TrackStatus::*;
            matches!((self, target), (Requested, Live) | (Requested, Ended) | (Live, Ended))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TrackStatus::*;
            match self {
                Requested => vec![Live, Ended],
                Live => vec![Ended],
                Ended => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let result = TrackStatus::Requested.transition_to(TrackStatus::Live);
        assert_eq!(result, Ok(TrackStatus::Live));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let result = TrackStatus::Ended.transition_to(TrackStatus::Live);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(TrackStatus::Ended.is_terminal());
        assert!(!TrackStatus::Requested.is_terminal());
        assert!(!TrackStatus::Live.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [TrackStatus::Requested, TrackStatus::Live, TrackStatus::Ended] {
            for valid_target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    valid_target
                );
            }
        }
    }
}
