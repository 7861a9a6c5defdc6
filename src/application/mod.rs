//! Application layer - Coordinates domain types and ports.
//!
//! The scanner module holds the capture lifecycle; everything with side
//! effects goes through the ports.

pub mod scanner;

pub use scanner::{
    ControlError, LifecycleController, ScannerHandle, ScannerService, ScannerSettings,
    ScannerSnapshot,
};
