//! Ordered acquisition strategies.
//!
//! Each strategy implements one way of coaxing a target-sized series out of
//! a bounded-pagination upstream; the acquirer iterates the list until the
//! target is met or the list is exhausted.

use async_trait::async_trait;

use vela_core::{Candle, CandleSource, Interval, VelaError};

use crate::CancelToken;
use crate::config::AcquirerConfig;
use crate::report::StrategyKind;

mod backward;
mod direct;
mod probe;

pub use backward::BackwardWalk;
pub use direct::DirectMax;
pub use probe::PageSizeProbe;

/// Immutable inputs shared by every strategy attempt of one acquisition.
#[derive(Debug, Clone, Copy)]
pub struct AttemptContext<'a> {
    /// Instrument to acquire.
    pub symbol: &'a str,
    /// Requested cadence.
    pub interval: Interval,
    /// Requested record count.
    pub target: usize,
    /// Acquirer tunables.
    pub cfg: &'a AcquirerConfig,
}

/// One way of acquiring candles toward a target count.
///
/// An attempt returns the candles it gathered (possibly fewer than the
/// target, possibly none) in arbitrary order; the acquirer merges and
/// counts. Errors make the acquirer fall through to the next strategy,
/// except fatal ones which abort the list.
#[async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Which strategy this is, for reports and logs.
    fn kind(&self) -> StrategyKind;

    /// Run the strategy once against `source`.
    ///
    /// Implementations that loop internally must check `cancel` between
    /// batches and return what they have gathered so far on cancellation.
    ///
    /// # Errors
    /// Propagates source failures; a partial result already gathered is
    /// preferred over an error where the strategy can make that call.
    async fn attempt(
        &self,
        source: &dyn CandleSource,
        ctx: &AttemptContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, VelaError>;
}

/// The standard strategy order: direct max request, backward walk, page-size
/// probing.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn AcquisitionStrategy>> {
    vec![
        Box::new(DirectMax),
        Box::new(BackwardWalk),
        Box::new(PageSizeProbe),
    ]
}
