//! Scanner - Capture session orchestration.
//!
//! Bottom-up:
//! - `DecodeEngineAdapter` wraps the decode engine port
//! - `ContinuousDecodeLoop` runs it on every frame and validates candidates
//! - `DeviceAcquisitionManager` opens the device and owns the stream
//! - `LifecycleController` drives the session state machine
//! - `ScannerService` / `ScannerHandle` host the controller on a task

mod acquisition;
mod controller;
mod decode_adapter;
mod decode_loop;
mod errors;
mod manual_entry;
mod service;
mod settings;

pub use acquisition::{
    acquire_with_fallback, AcquiredStream, AcquisitionReport, DeviceAcquisitionManager, Settlement,
};
pub use controller::LifecycleController;
pub use decode_adapter::DecodeEngineAdapter;
pub use decode_loop::{ContinuousDecodeLoop, FrameVerdict};
pub use errors::ControlError;
pub use manual_entry::{accept_manual_entry, ManualEntryError};
pub use service::{ControlCommand, ScannerHandle, ScannerService};
pub use settings::{ScannerSettings, ScannerSnapshot};
