use std::sync::Arc;

use vela_core::{CandleSource, Interval, TimeSeriesWindow, analyze, merge_batches};

use crate::CancelToken;
use crate::config::AcquirerConfig;
use crate::report::{AcquisitionReport, StrategyKind};
use crate::strategy::{AcquisitionStrategy, AttemptContext, default_strategies};

/// Outcome of one acquisition call: the frozen window plus its diagnostics.
#[derive(Debug)]
pub struct Acquisition {
    /// The assembled series, truncated to the target, possibly empty.
    pub window: TimeSeriesWindow,
    /// Diagnostics: selected strategy, fill level, continuity verification,
    /// and per-strategy failures.
    pub report: AcquisitionReport,
}

/// Drives the ordered acquisition strategies against one candle source.
///
/// One acquirer may serve many concurrent acquisitions; every per-call state
/// (cursor, window in progress) is owned by the call itself, and the shared
/// source is responsible for keeping the aggregate request rate bounded.
pub struct Acquirer {
    source: Arc<dyn CandleSource>,
    cfg: AcquirerConfig,
    strategies: Vec<Box<dyn AcquisitionStrategy>>,
}

impl Acquirer {
    /// Build an acquirer with the default configuration and strategy order.
    #[must_use]
    pub fn new(source: Arc<dyn CandleSource>) -> Self {
        Self::with_config(source, AcquirerConfig::default())
    }

    /// Build an acquirer with custom tunables.
    #[must_use]
    pub fn with_config(source: Arc<dyn CandleSource>, cfg: AcquirerConfig) -> Self {
        Self {
            source,
            cfg,
            strategies: default_strategies(),
        }
    }

    /// Replace the strategy list; attempted in the given order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn AcquisitionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Assemble a deduplicated, strictly time-ordered window of up to
    /// `target` candles for `(symbol, interval)`.
    ///
    /// Never fails across this boundary: total strategy failure yields an
    /// empty window with the failures recorded in the report.
    pub async fn acquire(&self, symbol: &str, interval: Interval, target: usize) -> Acquisition {
        self.acquire_cancellable(symbol, interval, target, &CancelToken::new())
            .await
    }

    /// Like [`Acquirer::acquire`], but cooperatively cancellable between
    /// strategies and between backward-walk batches.
    ///
    /// A cancelled acquisition returns the valid partial window accumulated
    /// so far with `cancelled` set in the report.
    pub async fn acquire_cancellable(
        &self,
        symbol: &str,
        interval: Interval,
        target: usize,
        cancel: &CancelToken,
    ) -> Acquisition {
        tracing::info!(symbol, %interval, target, "starting acquisition");
        let ctx = AttemptContext {
            symbol,
            interval,
            target,
            cfg: &self.cfg,
        };

        let mut best = Vec::new();
        let mut selected: Option<StrategyKind> = None;
        let mut strategy_errors = Vec::new();

        for strategy in &self.strategies {
            if cancel.is_cancelled() {
                break;
            }
            let kind = strategy.kind();
            match strategy.attempt(self.source.as_ref(), &ctx, cancel).await {
                Ok(candles) => {
                    let unique = merge_batches([candles]);
                    tracing::info!(symbol, strategy = ?kind, records = unique.len(), "strategy finished");
                    if unique.len() > best.len() {
                        best = unique;
                        selected = Some(kind);
                    }
                    if best.len() >= target {
                        break;
                    }
                }
                Err(err) if err.is_fatal() => {
                    tracing::warn!(symbol, strategy = ?kind, error = %err, "fatal failure, aborting strategy list");
                    strategy_errors.push(format!("{kind:?}: {err}"));
                    break;
                }
                Err(err) => {
                    tracing::warn!(symbol, strategy = ?kind, error = %err, "strategy failed, falling through");
                    strategy_errors.push(format!("{kind:?}: {err}"));
                }
            }
        }

        let window = TimeSeriesWindow::from_candles(best).truncated_to_latest(target);
        let continuity = match analyze(window.candles(), interval.duration(), self.cfg.tolerance) {
            Ok(report) => Some(report),
            Err(err) => {
                strategy_errors.push(format!("continuity: {err}"));
                None
            }
        };

        let report = AcquisitionReport {
            symbol: symbol.to_owned(),
            interval,
            target,
            unique_records: window.len(),
            strategy: if window.is_empty() { None } else { selected },
            complete: window.len() >= target,
            cancelled: cancel.is_cancelled(),
            strategy_errors,
            continuity,
        };
        if report.complete {
            tracing::info!(
                symbol,
                records = report.unique_records,
                strategy = ?report.strategy,
                "acquisition complete"
            );
        } else {
            tracing::warn!(
                symbol,
                records = report.unique_records,
                target,
                cancelled = report.cancelled,
                "acquisition under target"
            );
        }

        Acquisition { window, report }
    }
}
