//! vela
//!
//! Multi-strategy acquisition of deduplicated, strictly time-ordered candle
//! series from bounded-pagination market-data APIs, with a continuity
//! verification pass over the assembled window.
//!
//! The [`Acquirer`] drives an ordered list of [`strategy::AcquisitionStrategy`]
//! implementations against any [`vela_core::CandleSource`]:
//!
//! 1. **Direct max request**: ask the live endpoint for the whole target in
//!    one call.
//! 2. **Backward-walk batching**: fetch the live window, then walk the
//!    historical endpoint batch by batch, extending coverage strictly
//!    earlier in time behind a watermark cursor.
//! 3. **Page-size probing**: retry the direct request with a descending
//!    list of candidate page sizes and keep the best result.
//!
//! The first strategy whose merged unique-record count reaches the target
//! wins; otherwise the best candidate is kept. Total failure yields an empty
//! window plus diagnostics, never an error across the public boundary.
#![warn(missing_docs)]

/// The cancellable acquisition loop and its public entry points.
pub mod acquire;
/// Cooperative cancellation flag shared with the acquisition loop.
pub mod cancel;
/// Acquirer tunables.
pub mod config;
/// Acquisition outcome diagnostics.
pub mod report;
/// Ordered acquisition strategies.
pub mod strategy;

pub use acquire::{Acquirer, Acquisition};
pub use cancel::CancelToken;
pub use config::AcquirerConfig;
pub use report::{AcquisitionReport, StrategyKind};

pub use vela_core::{
    BatchRequest, Candle, CandleSource, ContinuityGrade, ContinuityReport, CursorDirection,
    CursorParam, Endpoint, FetchCursor, GapEvent, Interval, OverlapEvent, TimeSeriesWindow,
    VelaError, analyze,
};
