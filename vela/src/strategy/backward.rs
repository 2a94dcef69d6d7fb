use async_trait::async_trait;

use vela_core::{
    BatchRequest, Candle, CandleSource, Endpoint, FetchCursor, VelaError, merge_batches,
};

use crate::CancelToken;
use crate::report::StrategyKind;
use crate::strategy::{AcquisitionStrategy, AttemptContext};

/// Fetch the live window, then walk the historical endpoint batch by batch,
/// extending coverage strictly earlier in time behind a watermark cursor.
///
/// Each batch request depends on the watermark produced by the previous one,
/// so the walk is inherently sequential. It stops when a batch yields no
/// strictly-earlier rows, when the historical endpoint answers empty, when
/// the target is met, or at the configured batch ceiling. The ceiling is the
/// hard bound against a misbehaving endpoint that keeps answering without
/// ever extending coverage.
pub struct BackwardWalk;

#[async_trait]
impl AcquisitionStrategy for BackwardWalk {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BackwardWalk
    }

    async fn attempt(
        &self,
        source: &dyn CandleSource,
        ctx: &AttemptContext<'_>,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, VelaError> {
        let page_cap = source.page_cap();

        let live_req = BatchRequest::new(ctx.symbol, ctx.interval, page_cap, Endpoint::Live);
        let live = source.fetch_batch(&live_req).await?;
        if live.is_empty() {
            return Err(VelaError::EmptyResponse);
        }

        let mut merged = merge_batches([live]);
        // merge_batches sorts ascending, so the first record is the minimum
        // timestamp observed so far.
        let mut cursor = FetchCursor::backward(merged[0].open_time);

        while merged.len() < ctx.target && cursor.batches_used < ctx.cfg.batch_ceiling {
            if cancel.is_cancelled() {
                tracing::info!(
                    symbol = ctx.symbol,
                    records = merged.len(),
                    "backward walk cancelled, keeping partial window"
                );
                break;
            }

            let needed = u32::try_from(ctx.target - merged.len()).unwrap_or(u32::MAX);
            let req = BatchRequest::new(
                ctx.symbol,
                ctx.interval,
                page_cap.min(needed),
                Endpoint::Historical,
            )
            .with_watermark(ctx.cfg.cursor_param, cursor.watermark);

            let batch = match source.fetch_batch(&req).await {
                Ok(batch) => batch,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    // Keep what the walk has gathered; a partial window beats
                    // surfacing a transient failure after useful batches.
                    tracing::warn!(
                        symbol = ctx.symbol,
                        batch = cursor.batches_used + 1,
                        error = %err,
                        "historical batch failed, stopping walk"
                    );
                    break;
                }
            };
            if batch.is_empty() {
                tracing::debug!(symbol = ctx.symbol, "historical endpoint exhausted");
                break;
            }

            let earlier: Vec<Candle> = batch
                .into_iter()
                .filter(|c| c.open_time < cursor.watermark)
                .collect();
            if earlier.is_empty() {
                // Only already-seen timestamps: the walk would loop forever,
                // terminate on the first such batch.
                tracing::debug!(symbol = ctx.symbol, "no strictly-earlier rows, stopping walk");
                break;
            }

            let next_watermark = earlier
                .iter()
                .map(|c| c.open_time)
                .min()
                .unwrap_or(cursor.watermark);
            let added = earlier.len();
            merged = merge_batches([merged, earlier]);
            cursor.advance(next_watermark);
            tracing::debug!(
                symbol = ctx.symbol,
                batch = cursor.batches_used,
                added,
                total = merged.len(),
                watermark = %cursor.watermark,
                "historical batch prepended"
            );
        }

        Ok(merged)
    }
}
