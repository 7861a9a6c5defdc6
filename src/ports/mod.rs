//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the capture controller and the outside world. Adapters implement these ports.
//!
//! - `CaptureDevice` - Opens a camera-like stream under a constraint profile
//! - `StreamHandle` - Stops the tracks of an open stream
//! - `DecodeEngine` - Finds a barcode in one frame
//! - `ScanListener` - Receives scan results and errors

mod capture_device;
mod decode_engine;
mod scan_listener;

pub use capture_device::{CaptureDevice, CaptureStream, Frame, FrameReceiver, StreamHandle};
pub use decode_engine::{DecodeEngine, EngineError};
pub use scan_listener::ScanListener;
