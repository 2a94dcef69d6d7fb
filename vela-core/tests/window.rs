use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use vela_core::{Candle, TimeSeriesWindow};

fn ts(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn candle(sec: i64) -> Candle {
    Candle {
        open_time: ts(sec),
        open: Decimal::ONE,
        high: Decimal::ONE,
        low: Decimal::ONE,
        close: Decimal::ONE,
        volume: Decimal::ONE,
        quote_volume: None,
        turnover: None,
        trade_count: None,
        is_closed: true,
    }
}

#[test]
fn overlapping_batches_merge_without_duplicates() {
    // A = [t0..t10], B = [t5..t15], unit step.
    let a: Vec<Candle> = (0..=10).map(candle).collect();
    let b: Vec<Candle> = (5..=15).map(candle).collect();

    let window = TimeSeriesWindow::from_batches([a, b]);
    assert_eq!(window.len(), 16);
    for (i, c) in window.iter().enumerate() {
        assert_eq!(c.open_time, ts(i64::try_from(i).unwrap()));
    }
}

#[test]
fn truncation_keeps_the_largest_timestamps() {
    let pool: Vec<Candle> = (0..600).map(|i| candle(i * 60)).collect();
    let window = TimeSeriesWindow::from_candles(pool).truncated_to_latest(512);

    assert_eq!(window.len(), 512);
    assert_eq!(window.first_time(), Some(ts(88 * 60)));
    assert_eq!(window.last_time(), Some(ts(599 * 60)));
}

#[test]
fn truncation_under_target_is_a_no_op() {
    let pool: Vec<Candle> = (0..100).map(|i| candle(i * 60)).collect();
    let window = TimeSeriesWindow::from_candles(pool.clone()).truncated_to_latest(512);
    assert_eq!(window.candles(), pool.as_slice());
}

#[test]
fn unsorted_input_comes_out_strictly_ordered() {
    let window = TimeSeriesWindow::from_candles(vec![
        candle(300),
        candle(0),
        candle(120),
        candle(300),
        candle(60),
    ]);
    assert_eq!(window.len(), 4);
    for pair in window.candles().windows(2) {
        assert!(pair[0].open_time < pair[1].open_time);
    }
}

#[test]
fn empty_window_accessors() {
    let window = TimeSeriesWindow::empty();
    assert!(window.is_empty());
    assert_eq!(window.first_time(), None);
    assert_eq!(window.last_time(), None);
    assert_eq!(window.span(), None);
}

#[test]
fn span_covers_first_to_last() {
    let window = TimeSeriesWindow::from_candles((0..=4).map(|i| candle(i * 3600)).collect());
    assert_eq!(window.span(), Some(chrono::TimeDelta::hours(4)));
}
