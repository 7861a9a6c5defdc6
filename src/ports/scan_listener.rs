//! ScanListener port - Callbacks through which the controller reports to its host.

use crate::domain::barcode::Barcode;
use crate::domain::capture::ScanError;

/// Receives scan results and errors.
///
/// Implementations must ensure:
/// - Callbacks return quickly (they run on the controller's task)
/// - Callbacks never call back into the controller synchronously
pub trait ScanListener: Send + Sync {
    /// Called exactly once per successful session.
    fn on_scan(&self, barcode: &Barcode);

    /// Called once for a fatal failure, and for transient anomalies when enabled.
    fn on_error(&self, error: &ScanError);
}
