use chrono::{DateTime, TimeDelta, Utc};

use crate::merge::{merge_batches, truncate_latest};
use crate::types::Candle;

/// An ordered candle series for one (symbol, interval) pair.
///
/// Invariant: strictly increasing `open_time`, no duplicates. Windows are
/// only built through [`TimeSeriesWindow::from_batches`] (which merges,
/// deduplicates, and sorts) and are read-only afterwards: once returned to a
/// caller the series is frozen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesWindow {
    candles: Vec<Candle>,
}

impl TimeSeriesWindow {
    /// An empty window; the normal, reportable outcome of a fully failed
    /// acquisition.
    #[must_use]
    pub const fn empty() -> Self {
        Self { candles: Vec::new() }
    }

    /// Build a window by merging candle batches (deduplicate by `open_time`,
    /// sort ascending).
    #[must_use]
    pub fn from_batches<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<Candle>>,
    {
        Self {
            candles: merge_batches(batches),
        }
    }

    /// Build a window from a single batch.
    #[must_use]
    pub fn from_candles(candles: Vec<Candle>) -> Self {
        Self::from_batches([candles])
    }

    /// Keep only the `n` most recent records, consuming the window.
    #[must_use]
    pub fn truncated_to_latest(self, n: usize) -> Self {
        Self {
            candles: truncate_latest(self.candles, n),
        }
    }

    /// The candles in ascending `open_time` order.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Whether the window holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Opening timestamp of the oldest record, if any.
    #[must_use]
    pub fn first_time(&self) -> Option<DateTime<Utc>> {
        self.candles.first().map(|c| c.open_time)
    }

    /// Opening timestamp of the newest record, if any.
    #[must_use]
    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.candles.last().map(|c| c.open_time)
    }

    /// Total covered span, `None` for fewer than two records.
    #[must_use]
    pub fn span(&self) -> Option<TimeDelta> {
        match (self.first_time(), self.last_time()) {
            (Some(a), Some(b)) if self.len() >= 2 => Some(b - a),
            _ => None,
        }
    }

    /// Iterate over the candles in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Candle> {
        self.candles.iter()
    }
}

impl<'a> IntoIterator for &'a TimeSeriesWindow {
    type Item = &'a Candle;
    type IntoIter = core::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
