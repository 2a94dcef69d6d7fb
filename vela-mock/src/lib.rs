//! vela-mock
//!
//! Deterministic scripted [`CandleSource`] for tests and CI-safe examples.
//!
//! Batches are queued per endpoint and consumed in order; an exhausted queue
//! answers with an empty batch, which is exactly how a depleted upstream
//! behaves. Every received request is recorded for assertions.
#![warn(missing_docs)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use vela_core::{BatchRequest, Candle, CandleSource, Endpoint, VelaError};

/// Instruction for how one queued batch call should behave.
#[derive(Debug)]
pub enum MockBehavior {
    /// Return the provided candles immediately.
    Return(Vec<Candle>),
    /// Fail immediately with the provided error.
    Fail(VelaError),
}

#[derive(Default)]
struct State {
    live: VecDeque<MockBehavior>,
    historical: VecDeque<MockBehavior>,
    requests: Vec<BatchRequest>,
}

/// Scripted candle source. Queue behaviors per endpoint, then hand the source
/// to an acquirer and assert on the recorded requests afterwards.
pub struct MockSource {
    state: Mutex<State>,
    page_cap: u32,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// An empty source with the standard 300-row page cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_cap(300)
    }

    /// An empty source advertising a custom page cap.
    #[must_use]
    pub fn with_page_cap(page_cap: u32) -> Self {
        Self {
            state: Mutex::new(State::default()),
            page_cap,
        }
    }

    /// Queue the next live-endpoint behavior.
    pub fn push_live(&self, behavior: MockBehavior) {
        self.state.lock().expect("mutex poisoned").live.push_back(behavior);
    }

    /// Queue the next historical-endpoint behavior.
    pub fn push_historical(&self, behavior: MockBehavior) {
        self.state
            .lock()
            .expect("mutex poisoned")
            .historical
            .push_back(behavior);
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.state.lock().expect("mutex poisoned").requests.clone()
    }

    /// Number of requests received on `endpoint`.
    #[must_use]
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .expect("mutex poisoned")
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl CandleSource for MockSource {
    fn name(&self) -> &'static str {
        "vela-mock"
    }

    async fn fetch_batch(&self, req: &BatchRequest) -> Result<Vec<Candle>, VelaError> {
        let mut state = self.state.lock().expect("mutex poisoned");
        state.requests.push(req.clone());
        let queue = match req.endpoint {
            Endpoint::Live => &mut state.live,
            Endpoint::Historical => &mut state.historical,
        };
        match queue.pop_front() {
            Some(MockBehavior::Return(candles)) => Ok(candles),
            Some(MockBehavior::Fail(err)) => Err(err),
            None => Ok(Vec::new()),
        }
    }

    fn page_cap(&self) -> u32 {
        self.page_cap
    }
}

/// Candle fixtures for tests and examples.
pub mod fixtures {
    use chrono::DateTime;
    use rust_decimal::Decimal;

    use vela_core::Candle;

    /// A closed candle at `sec` seconds since the epoch with synthetic values.
    ///
    /// # Panics
    /// Panics if `sec` is outside the representable timestamp range.
    #[must_use]
    pub fn candle(sec: i64) -> Candle {
        let px = Decimal::new(30_000 + sec.rem_euclid(1000), 0);
        Candle {
            open_time: DateTime::from_timestamp(sec, 0).expect("timestamp in range"),
            open: px,
            high: px + Decimal::new(50, 0),
            low: px - Decimal::new(50, 0),
            close: px + Decimal::new(10, 0),
            volume: Decimal::new(100, 0),
            quote_volume: Some(Decimal::new(3_000_000, 0)),
            turnover: None,
            trade_count: Some(250),
            is_closed: true,
        }
    }

    /// `n` consecutive candles starting at `start_sec`, `step_sec` apart,
    /// oldest first.
    #[must_use]
    pub fn series(start_sec: i64, step_sec: i64, n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| candle(start_sec + i64::try_from(i).expect("fits i64") * step_sec))
            .collect()
    }

    /// Like [`series`] but newest first, the arrival order real endpoints use.
    #[must_use]
    pub fn series_newest_first(start_sec: i64, step_sec: i64, n: usize) -> Vec<Candle> {
        let mut out = series(start_sec, step_sec, n);
        out.reverse();
        out
    }
}
