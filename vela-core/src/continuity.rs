use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::VelaError;
use crate::types::Candle;

/// An inter-sample interval larger than the tolerance band, implying missing
/// periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapEvent {
    /// Index of the interval within the series (1-based, the position of the
    /// later sample of the pair).
    pub position: usize,
    /// Opening timestamp of the later sample of the pair.
    pub time: DateTime<Utc>,
    /// Whole nominal periods missing inside the gap.
    pub missing_periods: u64,
}

/// An inter-sample interval at or below zero, implying repeated or
/// out-of-order timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapEvent {
    /// Index of the interval within the series (1-based).
    pub position: usize,
    /// Opening timestamp of the later sample of the pair.
    pub time: DateTime<Utc>,
    /// Absolute size of the backwards step, in milliseconds.
    pub magnitude_ms: u64,
}

/// Qualitative rating derived from the continuity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContinuityGrade {
    /// Score ≥ 95: highly continuous data.
    Excellent,
    /// Score ≥ 85: mostly continuous data.
    Good,
    /// Score ≥ 70: a handful of gaps.
    Fair,
    /// Anything lower.
    Poor,
}

impl ContinuityGrade {
    /// Rate a continuity score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            Self::Excellent
        } else if score >= 85.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Outcome of a continuity verification pass over one candle series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityReport {
    /// Number of consecutive sample pairs examined.
    pub total_intervals: usize,
    /// Intervals matching the nominal cadence within tolerance.
    pub normal_count: usize,
    /// Intervals positive but below the lower tolerance bound.
    pub short_count: usize,
    /// Intervals above the upper tolerance bound.
    pub gap_events: Vec<GapEvent>,
    /// Intervals at or below zero.
    pub overlap_events: Vec<OverlapEvent>,
    /// Exact-duplicate timestamps found in the series.
    pub duplicate_count: usize,
    /// Whether timestamps are globally non-decreasing as given.
    pub is_monotonic: bool,
    /// `normal_count / total_intervals * 100`; `None` when the series has
    /// fewer than two records (not a divide-by-zero).
    pub score: Option<f64>,
    /// Qualitative rating of the score; `None` when the score is undefined.
    pub grade: Option<ContinuityGrade>,
}

impl ContinuityReport {
    /// Whether the pass found nothing to complain about.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.gap_events.is_empty()
            && self.overlap_events.is_empty()
            && self.short_count == 0
            && self.duplicate_count == 0
            && self.is_monotonic
    }
}

/// Classify every inter-sample interval of `candles` against a nominal
/// cadence and score the series' continuity.
///
/// `tolerance` is the relative half-width of the acceptance band: an interval
/// Δt is `normal` when it falls within
/// `[nominal * (1 - tolerance), nominal * (1 + tolerance)]`, a gap when above
/// the upper bound (with `missing_periods = floor(Δt / nominal) - 1`), and an
/// overlap when at or below zero. Intervals positive but below the lower
/// bound are counted in `short_count`.
///
/// The pass also independently verifies global monotonic non-decreasing
/// order and counts exact-duplicate timestamps. The input is examined as
/// given; it is not sorted first.
///
/// # Errors
/// Returns `VelaError::InvalidArg` if `nominal` is not positive or
/// `tolerance` is outside `[0, 1)`.
pub fn analyze(
    candles: &[Candle],
    nominal: TimeDelta,
    tolerance: f64,
) -> Result<ContinuityReport, VelaError> {
    let nominal_ms = nominal.num_milliseconds();
    if nominal_ms <= 0 {
        return Err(VelaError::InvalidArg(
            "nominal interval must be positive".into(),
        ));
    }
    if !(0.0..1.0).contains(&tolerance) {
        return Err(VelaError::InvalidArg(format!(
            "tolerance must be in [0, 1), got {tolerance}"
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let lower = nominal_ms as f64 * (1.0 - tolerance);
    #[allow(clippy::cast_precision_loss)]
    let upper = nominal_ms as f64 * (1.0 + tolerance);

    let mut seen: HashSet<i64> = HashSet::with_capacity(candles.len());
    let mut duplicate_count = 0usize;
    for c in candles {
        if !seen.insert(c.open_time.timestamp_millis()) {
            duplicate_count += 1;
        }
    }

    let mut normal_count = 0usize;
    let mut short_count = 0usize;
    let mut gap_events = Vec::new();
    let mut overlap_events = Vec::new();
    let mut is_monotonic = true;

    for (i, pair) in candles.windows(2).enumerate() {
        let dt_ms = (pair[1].open_time - pair[0].open_time).num_milliseconds();
        let position = i + 1;
        let time = pair[1].open_time;

        if dt_ms < 0 {
            is_monotonic = false;
        }

        #[allow(clippy::cast_precision_loss)]
        let dt = dt_ms as f64;
        if dt_ms <= 0 {
            overlap_events.push(OverlapEvent {
                position,
                time,
                magnitude_ms: dt_ms.unsigned_abs(),
            });
        } else if dt > upper {
            gap_events.push(GapEvent {
                position,
                time,
                missing_periods: (dt_ms / nominal_ms - 1).unsigned_abs(),
            });
        } else if dt >= lower {
            normal_count += 1;
        } else {
            short_count += 1;
        }
    }

    let total_intervals = candles.len().saturating_sub(1);
    #[allow(clippy::cast_precision_loss)]
    let score = (total_intervals > 0)
        .then(|| normal_count as f64 / total_intervals as f64 * 100.0);
    let grade = score.map(ContinuityGrade::from_score);

    let report = ContinuityReport {
        total_intervals,
        normal_count,
        short_count,
        gap_events,
        overlap_events,
        duplicate_count,
        is_monotonic,
        score,
        grade,
    };

    if !report.is_clean() {
        tracing::warn!(
            gaps = report.gap_events.len(),
            overlaps = report.overlap_events.len(),
            duplicates = report.duplicate_count,
            monotonic = report.is_monotonic,
            score = ?report.score,
            "continuity verification found irregularities"
        );
    }

    Ok(report)
}
