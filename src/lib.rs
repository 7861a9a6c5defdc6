//! Barcode Capture - Camera-driven barcode scanning controller
//!
//! This crate acquires a capture device, runs a decode engine over every
//! frame it pushes, validates what is read, and releases the device on every
//! exit path. The camera, the decode engine and the host are all ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
