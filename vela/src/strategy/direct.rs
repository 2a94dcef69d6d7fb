use async_trait::async_trait;

use vela_core::{BatchRequest, Candle, CandleSource, Endpoint, VelaError};

use crate::CancelToken;
use crate::report::StrategyKind;
use crate::strategy::{AcquisitionStrategy, AttemptContext};

/// Ask the live endpoint for the whole target in a single call.
///
/// Upstreams silently clamp the limit to their page cap, so this either
/// satisfies the target outright or establishes the best single-page
/// baseline for the fallback strategies.
pub struct DirectMax;

#[async_trait]
impl AcquisitionStrategy for DirectMax {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DirectMax
    }

    async fn attempt(
        &self,
        source: &dyn CandleSource,
        ctx: &AttemptContext<'_>,
        _cancel: &CancelToken,
    ) -> Result<Vec<Candle>, VelaError> {
        let limit = u32::try_from(ctx.target).unwrap_or(u32::MAX);
        let req = BatchRequest::new(ctx.symbol, ctx.interval, limit, Endpoint::Live);
        source.fetch_batch(&req).await
    }
}
