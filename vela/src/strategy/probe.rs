use async_trait::async_trait;

use vela_core::{BatchRequest, Candle, CandleSource, Endpoint, VelaError, merge_batches};

use crate::CancelToken;
use crate::report::StrategyKind;
use crate::strategy::{AcquisitionStrategy, AttemptContext};

/// Retry the direct request with a descending list of candidate page sizes.
///
/// Some upstreams clamp or reject limits inconsistently across ranges; the
/// probe keeps the candidate that yields the largest unique count and stops
/// early once one meets the target.
pub struct PageSizeProbe;

#[async_trait]
impl AcquisitionStrategy for PageSizeProbe {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PageSizeProbe
    }

    async fn attempt(
        &self,
        source: &dyn CandleSource,
        ctx: &AttemptContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, VelaError> {
        let mut best: Vec<Candle> = Vec::new();

        for &limit in &ctx.cfg.probe_limits {
            if cancel.is_cancelled() {
                break;
            }
            let req = BatchRequest::new(ctx.symbol, ctx.interval, limit, Endpoint::Live);
            let batch = match source.fetch_batch(&req).await {
                Ok(batch) => batch,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(symbol = ctx.symbol, limit, error = %err, "probe failed");
                    continue;
                }
            };
            let unique = merge_batches([batch]);
            tracing::debug!(symbol = ctx.symbol, limit, records = unique.len(), "probe result");
            if unique.len() > best.len() {
                best = unique;
            }
            if best.len() >= ctx.target {
                break;
            }
        }

        Ok(best)
    }
}
