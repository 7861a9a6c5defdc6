//! Capture domain module.
//!
//! Session lifecycle, the constraint profiles used to open a device, and the
//! error and outcome types a session can end with.

mod errors;
mod outcome;
mod profile;
mod session;
mod state;

pub use errors::{AcquisitionError, ScanError};
pub use outcome::{ScanOutcome, ScanSource};
pub use profile::{
    ConstraintProfile, FacingConstraint, FacingMode, ProfileChain, Requirement, ResolutionHint,
};
pub use session::CaptureSession;
pub use state::CaptureState;
