use serde::Serialize;

use vela_core::{ContinuityReport, Interval};

/// Which acquisition strategy produced the returned window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    /// One live-endpoint call asking for the whole target.
    DirectMax,
    /// Live window plus a watermark-driven walk of the historical endpoint.
    BackwardWalk,
    /// Direct requests with a descending list of candidate page sizes.
    PageSizeProbe,
}

/// Diagnostic record for one acquisition call.
///
/// Always produced, including for the total-failure case (empty window, no
/// strategy selected) and for cancelled acquisitions.
#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionReport {
    /// Instrument the acquisition targeted.
    pub symbol: String,
    /// Requested cadence.
    pub interval: Interval,
    /// Requested record count.
    pub target: usize,
    /// Unique records in the returned window.
    pub unique_records: usize,
    /// Strategy whose candidate was kept; `None` when no strategy produced
    /// any data.
    pub strategy: Option<StrategyKind>,
    /// Whether the window reached the target count.
    pub complete: bool,
    /// Whether the acquisition stopped early on a cancellation request.
    pub cancelled: bool,
    /// Per-strategy failures collected while falling through the list.
    pub strategy_errors: Vec<String>,
    /// Continuity verification of the returned window.
    pub continuity: Option<ContinuityReport>,
}

impl AcquisitionReport {
    /// Fraction of the target actually delivered, as a percentage.
    #[must_use]
    pub fn fill_rate(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.unique_records as f64 / self.target as f64 * 100.0
        }
    }
}
