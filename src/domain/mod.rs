//! Domain layer containing capture types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `barcode` - Symbologies, decode results and candidate validation
//! - `capture` - Session lifecycle, constraint profiles, acquisition errors and outcomes

pub mod barcode;
pub mod capture;
pub mod foundation;
