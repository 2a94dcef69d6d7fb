use polars::prelude::{DataFrame, NamedFrom, Series};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::VelaError;
use crate::window::TimeSeriesWindow;

fn to_f64(v: Decimal) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

/// Convert a window into the tabular artifact consumed by downstream
/// training/prediction collaborators.
///
/// Columns: `timestamp` (epoch milliseconds, UTC, monotonic), `open`,
/// `high`, `low`, `close`, `volume`, and `amount` (quote-currency volume,
/// zero when the upstream did not report it).
///
/// # Errors
/// Returns `VelaError::Data` if the frame cannot be assembled.
pub fn window_to_dataframe(window: &TimeSeriesWindow) -> Result<DataFrame, VelaError> {
    let n = window.len();
    let mut ts: Vec<i64> = Vec::with_capacity(n);
    let mut open: Vec<f64> = Vec::with_capacity(n);
    let mut high: Vec<f64> = Vec::with_capacity(n);
    let mut low: Vec<f64> = Vec::with_capacity(n);
    let mut close: Vec<f64> = Vec::with_capacity(n);
    let mut volume: Vec<f64> = Vec::with_capacity(n);
    let mut amount: Vec<f64> = Vec::with_capacity(n);

    for c in window {
        ts.push(c.open_time.timestamp_millis());
        open.push(to_f64(c.open));
        high.push(to_f64(c.high));
        low.push(to_f64(c.low));
        close.push(to_f64(c.close));
        volume.push(to_f64(c.volume));
        amount.push(c.quote_volume.map_or(0.0, to_f64));
    }

    DataFrame::new(vec![
        Series::new("timestamp".into(), ts).into(),
        Series::new("open".into(), open).into(),
        Series::new("high".into(), high).into(),
        Series::new("low".into(), low).into(),
        Series::new("close".into(), close).into(),
        Series::new("volume".into(), volume).into(),
        Series::new("amount".into(), amount).into(),
    ])
    .map_err(|e| VelaError::Data(e.to_string()))
}
