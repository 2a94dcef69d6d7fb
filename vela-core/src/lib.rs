//! vela-core
//!
//! Core types, traits, and time-series utilities shared across the vela
//! ecosystem.
//!
//! - `types`: common data structures (candles, batch requests, cursors).
//! - `window`: the frozen, strictly-ordered [`TimeSeriesWindow`].
//! - `source`: the [`CandleSource`] trait implemented by upstream connectors.
//! - `merge`: batch concatenation, deduplication, and truncation helpers.
//! - `continuity`: gap/overlap classification and continuity scoring.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem as the async runtime: the
//! [`CandleSource`] trait is `async` and connectors implementing it are
//! expected to run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Gap/overlap classification and continuity scoring for candle series.
pub mod continuity;
/// Polars export of a window (behind the `dataframe` feature).
#[cfg(feature = "dataframe")]
pub mod dataframe;
/// Error taxonomy for the vela workspace.
pub mod error;
/// Batch merge, deduplication, and truncation utilities.
pub mod merge;
/// The `CandleSource` capability trait implemented by upstream connectors.
pub mod source;
pub mod types;
/// The frozen, strictly-ordered candle window.
pub mod window;

pub use continuity::{ContinuityGrade, ContinuityReport, GapEvent, OverlapEvent, analyze};
#[cfg(feature = "dataframe")]
pub use dataframe::window_to_dataframe;
pub use error::VelaError;
pub use merge::{merge_batches, truncate_latest};
pub use source::CandleSource;
pub use types::*;
pub use window::TimeSeriesWindow;
