//! vela-okx
//!
//! OKX-style upstream connector for the vela candle acquisition engine.
//!
//! The connector implements [`vela_core::CandleSource`] on top of three
//! layers:
//!
//! - [`sign::RequestSigner`]: pure HMAC-SHA256 request signing.
//! - [`transport::RateLimitedTransport`]: a reqwest wrapper with bounded
//!   retries, exponential backoff with jitter, and a shared concurrency
//!   limiter so parallel acquisitions stay under the upstream rate limit.
//! - [`fetch::OkxConnector`]: one paginated call per invocation against the
//!   live or historical candle endpoint, parsing raw rows into typed
//!   [`vela_core::Candle`] records and adapting to schema-width drift.
#![warn(missing_docs)]

/// Batch fetching and raw-row parsing.
pub mod fetch;
/// Request signing and credential handling.
pub mod sign;
/// Retrying, rate-limited HTTP transport.
pub mod transport;

pub use fetch::{OkxConnector, OkxConnectorBuilder, parse_batch_rows};
pub use sign::{Credentials, RequestSigner};
pub use transport::{RateLimitedTransport, TransportConfig};

/// Production OKX REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";
