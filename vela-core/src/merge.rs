use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::Candle;

/// Merge candle batches into one deduplicated, ascending series.
///
/// - Candles are keyed by `open_time`; the first appearance wins for
///   duplicates (values are assumed identical across sources).
/// - The output is sorted ascending by `open_time` with no duplicates.
/// - The operation is idempotent (`merge([merge(batches)]) == merge(batches)`)
///   and independent of batch order with respect to the final sorted result.
#[must_use]
pub fn merge_batches<I>(batches: I) -> Vec<Candle>
where
    I: IntoIterator<Item = Vec<Candle>>,
{
    let mut map: BTreeMap<DateTime<Utc>, Candle> = BTreeMap::new();
    for batch in batches {
        for c in batch {
            map.entry(c.open_time).or_insert(c);
        }
    }
    map.into_values().collect()
}

/// Keep the `n` most recent records of an ascending series.
///
/// The input must already be sorted ascending by `open_time` (the shape
/// produced by [`merge_batches`]). Series at or under `n` records are
/// returned unchanged.
#[must_use]
pub fn truncate_latest(mut candles: Vec<Candle>, n: usize) -> Vec<Candle> {
    if candles.len() > n {
        candles.drain(..candles.len() - n);
    }
    candles
}
