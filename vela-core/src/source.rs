use async_trait::async_trait;

use crate::VelaError;
use crate::types::{BatchRequest, Candle};

/// Capability trait for upstreams that can serve one paginated candle batch.
///
/// Implementors own transport concerns (signing, retries, throttling); the
/// acquirer only sees "one request in, ordered-by-arrival candles out".
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Short, stable connector name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Issue one paginated call to the endpoint selected by `req` and parse
    /// the raw rows into typed candles, preserving arrival order.
    ///
    /// An upstream that answers successfully with no rows yields an empty
    /// vec, not an error.
    ///
    /// # Errors
    /// Returns `VelaError::Auth` for fatal signing/credential failures,
    /// `VelaError::Transient`/`VelaError::RateLimited` once the transport's
    /// retry budget is exhausted, and `VelaError::SchemaMismatch` when rows
    /// are too narrow to parse.
    async fn fetch_batch(&self, req: &BatchRequest) -> Result<Vec<Candle>, VelaError>;

    /// Largest `limit` a single page may carry on this upstream.
    fn page_cap(&self) -> u32 {
        300
    }
}
