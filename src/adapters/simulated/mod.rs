//! Simulated adapters - In-process stand-ins for the camera, the decode
//! engine, and the host listener.

mod device;
mod engine;
mod listener;

pub use device::{FrameFeed, SimulatedCaptureDevice, DEFAULT_FRAME_BUFFER};
pub use engine::TextPayloadEngine;
pub use listener::RecordingScanListener;
