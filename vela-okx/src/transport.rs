use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tokio::sync::Semaphore;
use url::Url;

use vela_core::VelaError;

use crate::sign::RequestSigner;

/// Tunables for [`RateLimitedTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total attempts per call, including the first (not only retries).
    pub max_attempts: u32,
    /// Base backoff before the second attempt; doubles per further attempt.
    pub backoff_base: Duration,
    /// Jitter added on top of the exponential backoff, as a percentage.
    pub backoff_jitter_percent: u32,
    /// Bounded per-call timeout; a timeout is retried like any transient
    /// network failure.
    pub timeout: Duration,
    /// Upper bound on in-flight requests across every acquisition sharing
    /// this transport.
    pub max_in_flight: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_millis(500),
            backoff_jitter_percent: 20,
            timeout: Duration::from_secs(10),
            max_in_flight: 2,
        }
    }
}

/// Envelope every candle endpoint wraps its rows in.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<Vec<String>>,
}

/// HTTP call wrapper with bounded retries, exponential backoff, and a shared
/// concurrency limiter.
///
/// The limiter is an `Arc<Semaphore>`: clones of the transport (and every
/// acquisition running through them) contend on the same permits, so the
/// aggregate outbound rate stays bounded even when several symbol/interval
/// acquisitions run in parallel.
#[derive(Debug, Clone)]
pub struct RateLimitedTransport {
    client: reqwest::Client,
    signer: RequestSigner,
    base_url: Url,
    limiter: Arc<Semaphore>,
    cfg: TransportConfig,
}

impl RateLimitedTransport {
    /// Build a transport for `base_url` with the given signer and tunables.
    ///
    /// # Errors
    /// Returns `VelaError::InvalidArg` for an unparseable base URL or a zero
    /// attempt budget, and `VelaError::Transient` if the HTTP client cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        signer: RequestSigner,
        cfg: TransportConfig,
    ) -> Result<Self, VelaError> {
        if cfg.max_attempts == 0 {
            return Err(VelaError::InvalidArg("max_attempts must be at least 1".into()));
        }
        let base_url = Url::parse(base_url)
            .map_err(|e| VelaError::InvalidArg(format!("invalid base url {base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| VelaError::transient(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            signer,
            base_url,
            limiter: Arc::new(Semaphore::new(cfg.max_in_flight.max(1))),
            cfg,
        })
    }

    /// Issue one signed GET for `path_and_query`, retrying retryable failures
    /// up to the attempt budget, and return the decoded data rows.
    ///
    /// # Errors
    /// Returns the last classified error once the budget is exhausted, or
    /// immediately for fatal (`Auth`, argument, data) failures.
    pub async fn get_rows(&self, path_and_query: &str) -> Result<Vec<Vec<String>>, VelaError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.get_rows_once(path_and_query).await {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_retryable() && attempt < self.cfg.max_attempts => {
                    let wait = self.backoff_ms(attempt, &err);
                    tracing::warn!(
                        attempt,
                        wait_ms = wait,
                        error = %err,
                        path = path_and_query,
                        "transient upstream failure, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_rows_once(&self, path_and_query: &str) -> Result<Vec<Vec<String>>, VelaError> {
        // Hold a permit only for the duration of the call itself; backoff
        // sleeps must not starve other acquisitions.
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| VelaError::transient("transport limiter closed"))?;

        let url = self
            .base_url
            .join(path_and_query)
            .map_err(|e| VelaError::InvalidArg(format!("invalid request path: {e}")))?;

        let mut request = self.client.get(url);
        for (name, value) in self.signer.headers(Utc::now(), "GET", path_and_query, "") {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(classify_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, &response));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| VelaError::data(format!("undecodable response body: {e}")))?;
        if envelope.code != "0" {
            return Err(VelaError::data(format!(
                "upstream error code {}: {}",
                envelope.code, envelope.msg
            )));
        }
        Ok(envelope.data)
    }

    fn backoff_ms(&self, attempt: u32, err: &VelaError) -> u64 {
        if let VelaError::RateLimited {
            retry_after_ms: Some(ms),
        } = err
        {
            return *ms;
        }
        let base = u64::try_from(self.cfg.backoff_base.as_millis()).unwrap_or(u64::MAX);
        let exp = base.saturating_mul(1u64 << (attempt - 1).min(16));
        let jitter_range = if self.cfg.backoff_jitter_percent == 0 {
            1
        } else {
            std::cmp::max(
                1,
                exp.saturating_mul(u64::from(self.cfg.backoff_jitter_percent)) / 100,
            )
        };
        let mut rng = rand::rng();
        exp.saturating_add(rng.random_range(0..jitter_range))
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> VelaError {
    // Timeouts are deliberately indistinguishable from other transient
    // network failures for retry purposes.
    VelaError::transient(err.to_string())
}

fn classify_status(status: reqwest::StatusCode, response: &reqwest::Response) -> VelaError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_ms = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs * 1000);
        return VelaError::RateLimited { retry_after_ms };
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return VelaError::auth(format!("upstream rejected credentials: {status}"));
    }
    if status.is_server_error() {
        return VelaError::transient(format!("upstream server error: {status}"));
    }
    VelaError::data(format!("unexpected upstream status: {status}"))
}
