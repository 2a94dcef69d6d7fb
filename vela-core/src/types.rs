//! Common data structures shared across the vela ecosystem.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLCV record for a fixed time bucket, keyed by its opening timestamp.
///
/// Candles are immutable once parsed; every downstream structure treats them
/// as values. Trailing wire columns (`quote_volume`, `turnover`,
/// `trade_count`) may be absent upstream and are therefore optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening timestamp of the bucket; unique key within a series.
    pub open_time: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// Highest price within the bucket.
    pub high: Decimal,
    /// Lowest price within the bucket.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume in contracts/base units.
    pub volume: Decimal,
    /// Traded volume in quote currency, when reported.
    pub quote_volume: Option<Decimal>,
    /// Turnover, when reported.
    pub turnover: Option<Decimal>,
    /// Number of trades within the bucket, when reported.
    pub trade_count: Option<u64>,
    /// Whether the bucket is finished; the most recent live candle is not.
    pub is_closed: bool,
}

/// Candle cadence, expressed in the upstream's bar vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute.
    #[serde(rename = "1m")]
    Min1,
    /// 5 minutes.
    #[serde(rename = "5m")]
    Min5,
    /// 15 minutes.
    #[serde(rename = "15m")]
    Min15,
    /// 30 minutes.
    #[serde(rename = "30m")]
    Min30,
    /// 1 hour.
    #[serde(rename = "1H")]
    Hour1,
    /// 4 hours.
    #[serde(rename = "4H")]
    Hour4,
    /// 12 hours.
    #[serde(rename = "12H")]
    Hour12,
    /// 1 day.
    #[serde(rename = "1D")]
    Day1,
    /// 1 week.
    #[serde(rename = "1W")]
    Week1,
}

impl Interval {
    /// The upstream query-string code for this interval.
    #[must_use]
    pub const fn as_bar(self) -> &'static str {
        match self {
            Self::Min1 => "1m",
            Self::Min5 => "5m",
            Self::Min15 => "15m",
            Self::Min30 => "30m",
            Self::Hour1 => "1H",
            Self::Hour4 => "4H",
            Self::Hour12 => "12H",
            Self::Day1 => "1D",
            Self::Week1 => "1W",
        }
    }

    /// Nominal length of one bucket.
    #[must_use]
    pub fn duration(self) -> TimeDelta {
        match self {
            Self::Min1 => TimeDelta::minutes(1),
            Self::Min5 => TimeDelta::minutes(5),
            Self::Min15 => TimeDelta::minutes(15),
            Self::Min30 => TimeDelta::minutes(30),
            Self::Hour1 => TimeDelta::hours(1),
            Self::Hour4 => TimeDelta::hours(4),
            Self::Hour12 => TimeDelta::hours(12),
            Self::Day1 => TimeDelta::days(1),
            Self::Week1 => TimeDelta::weeks(1),
        }
    }
}

impl core::fmt::Display for Interval {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_bar())
    }
}

/// Which upstream candle endpoint a batch request targets.
///
/// The two endpoints cover overlapping but different time ranges: `Live`
/// serves the recent window, `Historical` reaches further back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// The recent-window candles endpoint.
    Live,
    /// The deep-history candles endpoint.
    Historical,
}

/// Direction a paginated walk extends coverage in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorDirection {
    /// Extend coverage earlier in time (the backward walk).
    Backward,
    /// Extend coverage later in time.
    Forward,
}

/// Which query parameter carries the watermark on the historical endpoint.
///
/// The upstream's documented `before`/`after` semantics proved unreliable in
/// practice, so the parameter used for "rows strictly earlier than the
/// watermark" is configuration to be validated empirically per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CursorParam {
    /// Pass the watermark as `after` (observed to return strictly earlier rows).
    #[default]
    After,
    /// Pass the watermark as `before`.
    Before,
}

/// Pagination state for one acquisition; lives only for the duration of a
/// single acquisition call and is mutated only by the acquirer's walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCursor {
    /// Direction the walk extends coverage in.
    pub direction: CursorDirection,
    /// Timestamp boundary used to request the next page.
    pub watermark: DateTime<Utc>,
    /// Endpoint the next page will be requested from.
    pub endpoint: Endpoint,
    /// Number of batches fetched through this cursor so far.
    pub batches_used: u32,
}

impl FetchCursor {
    /// Start a backward walk against the historical endpoint from `watermark`.
    #[must_use]
    pub const fn backward(watermark: DateTime<Utc>) -> Self {
        Self {
            direction: CursorDirection::Backward,
            watermark,
            endpoint: Endpoint::Historical,
            batches_used: 0,
        }
    }

    /// Record a successful batch and move the watermark to `next`.
    pub fn advance(&mut self, next: DateTime<Utc>) {
        self.watermark = next;
        self.batches_used += 1;
    }
}

/// Parameters for one paginated call to one candle endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    /// Instrument identifier, e.g. `BTC-USD-SWAP`.
    pub symbol: String,
    /// Candle cadence.
    pub interval: Interval,
    /// Maximum number of rows requested; capped by the endpoint's page size.
    pub limit: u32,
    /// Return rows on the newer side of this boundary, per upstream semantics.
    pub before: Option<DateTime<Utc>>,
    /// Return rows on the older side of this boundary, per upstream semantics.
    pub after: Option<DateTime<Utc>>,
    /// Which endpoint to hit.
    pub endpoint: Endpoint,
}

impl BatchRequest {
    /// Build a plain request with no pagination boundary.
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: u32, endpoint: Endpoint) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit,
            before: None,
            after: None,
            endpoint,
        }
    }

    /// Attach the watermark under the configured cursor parameter.
    #[must_use]
    pub fn with_watermark(mut self, param: CursorParam, watermark: DateTime<Utc>) -> Self {
        match param {
            CursorParam::After => self.after = Some(watermark),
            CursorParam::Before => self.before = Some(watermark),
        }
        self
    }
}
