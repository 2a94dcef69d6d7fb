use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use vela_core::{Candle, merge_batches, truncate_latest};

fn ts(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn candle_with(sec: i64, close_cents: i64) -> Candle {
    let px = Decimal::new(close_cents, 2);
    Candle {
        open_time: ts(sec),
        open: px,
        high: px,
        low: px,
        close: px,
        volume: Decimal::ONE,
        quote_volume: None,
        turnover: None,
        trade_count: None,
        is_closed: true,
    }
}

// Values derived from the timestamp, so candles at the same instant are
// identical across batches (the upstream contract the merger assumes).
fn candle(sec: i64) -> Candle {
    candle_with(sec, sec.rem_euclid(100_000))
}

fn arb_batch() -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec((-2_000_000i64..2_000_000i64).prop_map(candle), 0..80)
}

proptest! {
    #[test]
    fn merged_output_is_sorted_and_unique(batches in proptest::collection::vec(arb_batch(), 0..6)) {
        let merged = merge_batches(batches);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].open_time < pair[1].open_time);
        }
    }

    #[test]
    fn merge_is_idempotent(batches in proptest::collection::vec(arb_batch(), 0..6)) {
        let once = merge_batches(batches);
        let twice = merge_batches([once.clone()]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_is_batch_order_independent(batches in proptest::collection::vec(arb_batch(), 0..6)) {
        let forward = merge_batches(batches.clone());
        let mut reversed = batches;
        reversed.reverse();
        let backward = merge_batches(reversed);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn truncation_keeps_the_most_recent(
        batches in proptest::collection::vec(arb_batch(), 0..6),
        n in 0usize..200,
    ) {
        let merged = merge_batches(batches);
        let expected_tail: Vec<Candle> = merged
            .iter()
            .skip(merged.len().saturating_sub(n))
            .cloned()
            .collect();
        let truncated = truncate_latest(merged, n);
        prop_assert!(truncated.len() <= n);
        prop_assert_eq!(truncated, expected_tail);
    }
}

#[test]
fn first_appearance_wins_on_duplicate_timestamps() {
    let a = vec![candle_with(60, 101)];
    let b = vec![candle_with(60, 999), candle_with(120, 202)];
    let merged = merge_batches([a, b]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].close, Decimal::new(101, 2));
    assert_eq!(merged[1].close, Decimal::new(202, 2));
}
