//! Adapters - Implementations of port interfaces.
//!
//! - `simulated` - Scripted capture device, text-payload decode engine,
//!   and a recording listener

pub mod simulated;

pub use simulated::{FrameFeed, RecordingScanListener, SimulatedCaptureDevice, TextPayloadEngine};
