//! Recording scan listener.
//!
//! Captures every callback for later assertions. Also used by the demo
//! binary, which reads results through the scanner snapshot instead.

use std::sync::Mutex;

use crate::domain::barcode::Barcode;
use crate::domain::capture::ScanError;
use crate::ports::ScanListener;

/// Listener that stores what it is told.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned.
#[derive(Debug, Default)]
pub struct RecordingScanListener {
    scans: Mutex<Vec<Barcode>>,
    errors: Mutex<Vec<ScanError>>,
}

impl RecordingScanListener {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Barcodes received so far, as text.
    pub fn scans(&self) -> Vec<String> {
        self.scans
            .lock()
            .expect("RecordingScanListener: scans lock poisoned")
            .iter()
            .map(|b| b.as_str().to_string())
            .collect()
    }

    pub fn scan_count(&self) -> usize {
        self.scans
            .lock()
            .expect("RecordingScanListener: scans lock poisoned")
            .len()
    }

    pub fn errors(&self) -> Vec<ScanError> {
        self.errors
            .lock()
            .expect("RecordingScanListener: errors lock poisoned")
            .clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors
            .lock()
            .expect("RecordingScanListener: errors lock poisoned")
            .len()
    }

    /// Clears all recorded callbacks.
    pub fn clear(&self) {
        self.scans
            .lock()
            .expect("RecordingScanListener: scans lock poisoned")
            .clear();
        self.errors
            .lock()
            .expect("RecordingScanListener: errors lock poisoned")
            .clear();
    }
}

impl ScanListener for RecordingScanListener {
    fn on_scan(&self, barcode: &Barcode) {
        self.scans
            .lock()
            .expect("RecordingScanListener: scans lock poisoned")
            .push(barcode.clone());
    }

    fn on_error(&self, error: &ScanError) {
        self.errors
            .lock()
            .expect("RecordingScanListener: errors lock poisoned")
            .push(error.clone());
    }
}
