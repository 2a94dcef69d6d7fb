use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use vela_core::{Candle, ContinuityGrade, analyze};

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

const DAY: i64 = 86_400;

#[test]
fn daily_series_with_one_missing_day() {
    // d0, d1, d2, d4 with d3 missing.
    let candles: Vec<Candle> = [0, DAY, 2 * DAY, 4 * DAY].map(candle).to_vec();
    let report = analyze(&candles, TimeDelta::days(1), 0.1).unwrap();

    assert_eq!(report.total_intervals, 3);
    assert_eq!(report.normal_count, 2);
    assert_eq!(report.gap_events.len(), 1);
    let gap = &report.gap_events[0];
    assert_eq!(gap.position, 3);
    assert_eq!(gap.time, ts(4 * DAY));
    assert_eq!(gap.missing_periods, 1);
    assert!(report.overlap_events.is_empty());
    assert_eq!(report.duplicate_count, 0);
    assert!(report.is_monotonic);

    let score = report.score.unwrap();
    assert!((score - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.grade, Some(ContinuityGrade::Poor));
}

#[test]
fn perfect_series_scores_one_hundred() {
    let candles: Vec<Candle> = (0..10).map(|i| candle(i * 4 * 3600)).collect();
    let report = analyze(&candles, TimeDelta::hours(4), 0.0).unwrap();
    assert_eq!(report.normal_count, 9);
    assert_eq!(report.score, Some(100.0));
    assert_eq!(report.grade, Some(ContinuityGrade::Excellent));
    assert!(report.is_clean());
}

#[test]
fn out_of_order_pair_is_an_overlap_and_breaks_monotonicity() {
    let candles: Vec<Candle> = [0, 2 * DAY, DAY].map(candle).to_vec();
    let report = analyze(&candles, TimeDelta::days(1), 0.1).unwrap();

    assert!(!report.is_monotonic);
    assert_eq!(report.overlap_events.len(), 1);
    let overlap = &report.overlap_events[0];
    assert_eq!(overlap.position, 2);
    assert_eq!(overlap.magnitude_ms, u64::try_from(DAY * 1000).unwrap());
}

#[test]
fn exact_duplicate_counts_as_overlap_and_duplicate() {
    let candles: Vec<Candle> = [0, DAY, DAY, 2 * DAY].map(candle).to_vec();
    let report = analyze(&candles, TimeDelta::days(1), 0.1).unwrap();

    assert_eq!(report.duplicate_count, 1);
    assert_eq!(report.overlap_events.len(), 1);
    assert_eq!(report.overlap_events[0].magnitude_ms, 0);
    // Monotonic non-decreasing order still holds.
    assert!(report.is_monotonic);
}

#[test]
fn short_interval_is_neither_normal_nor_gap() {
    let candles: Vec<Candle> = [0, 3600, 3600 + 4 * 3600].map(candle).to_vec();
    let report = analyze(&candles, TimeDelta::hours(4), 0.1).unwrap();
    assert_eq!(report.short_count, 1);
    assert_eq!(report.normal_count, 1);
    assert!(report.gap_events.is_empty());
    assert!(report.overlap_events.is_empty());
}

#[test]
fn fewer_than_two_records_has_undefined_score() {
    let report = analyze(&[], TimeDelta::days(1), 0.1).unwrap();
    assert_eq!(report.total_intervals, 0);
    assert_eq!(report.score, None);
    assert_eq!(report.grade, None);

    let report = analyze(&[candle(0)], TimeDelta::days(1), 0.1).unwrap();
    assert_eq!(report.total_intervals, 0);
    assert_eq!(report.score, None);
}

#[test]
fn gap_just_outside_tolerance_with_no_whole_period_missing() {
    // 1.2 days at 10% tolerance: a gap, but floor(1.2) - 1 == 0 periods missing.
    let candles: Vec<Candle> = [0, DAY + DAY / 5].map(candle).to_vec();
    let report = analyze(&candles, TimeDelta::days(1), 0.1).unwrap();
    assert_eq!(report.gap_events.len(), 1);
    assert_eq!(report.gap_events[0].missing_periods, 0);
}

#[test]
fn invalid_arguments_are_rejected() {
    assert!(analyze(&[], TimeDelta::zero(), 0.1).is_err());
    assert!(analyze(&[], TimeDelta::days(-1), 0.1).is_err());
    assert!(analyze(&[], TimeDelta::days(1), 1.0).is_err());
    assert!(analyze(&[], TimeDelta::days(1), -0.1).is_err());
}
