use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use vela_core::VelaError;

type HmacSha256 = Hmac<Sha256>;

/// API credentials for the upstream.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// API key, sent as `OK-ACCESS-KEY`.
    pub api_key: String,
    /// Secret key used to sign requests; never sent on the wire.
    pub secret_key: String,
    /// Passphrase, sent as `OK-ACCESS-PASSPHRASE`.
    pub passphrase: String,
}

impl Credentials {
    /// Build credentials from explicit values.
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Load credentials from `OKX_API_KEY`, `OKX_API_SECRET`, and
    /// `OKX_API_PASSPHRASE`.
    ///
    /// # Errors
    /// Returns `VelaError::Auth` naming the first missing variable.
    pub fn from_env() -> Result<Self, VelaError> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| VelaError::auth(format!("missing environment variable {name}")))
        };
        Ok(Self {
            api_key: var("OKX_API_KEY")?,
            secret_key: var("OKX_API_SECRET")?,
            passphrase: var("OKX_API_PASSPHRASE")?,
        })
    }
}

/// Pure request signer producing the upstream's auth header set.
///
/// The signature is `base64(HMAC-SHA256(secret, timestamp + METHOD + path +
/// body))` where `path` includes the query string. No side effects, no
/// retries.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    /// Wrap validated credentials.
    ///
    /// # Errors
    /// Returns `VelaError::Auth` when the secret key is empty; signing would
    /// only ever produce rejected requests.
    pub fn new(credentials: Credentials) -> Result<Self, VelaError> {
        if credentials.secret_key.is_empty() {
            return Err(VelaError::auth("secret key is empty"));
        }
        Ok(Self { credentials })
    }

    /// Compute the base64 signature over `timestamp + method + path + body`.
    #[must_use]
    pub fn signature(&self, timestamp: &str, method: &str, path: &str, body: &str) -> String {
        // new_from_slice only fails for unusable key lengths, which HMAC does
        // not have; the secret was validated non-empty in `new`.
        let mut mac = HmacSha256::new_from_slice(self.credentials.secret_key.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(timestamp.as_bytes());
        mac.update(method.as_bytes());
        mac.update(path.as_bytes());
        mac.update(body.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Produce the full signed header set for one request at `now`.
    ///
    /// `path` must be the request path including the query string.
    #[must_use]
    pub fn headers(
        &self,
        now: DateTime<Utc>,
        method: &str,
        path: &str,
        body: &str,
    ) -> Vec<(&'static str, String)> {
        let timestamp = format_timestamp(now);
        let signature = self.signature(&timestamp, method, path, body);
        vec![
            ("Content-Type", "application/json".to_owned()),
            ("OK-ACCESS-KEY", self.credentials.api_key.clone()),
            ("OK-ACCESS-SIGN", signature),
            ("OK-ACCESS-TIMESTAMP", timestamp),
            ("OK-ACCESS-PASSPHRASE", self.credentials.passphrase.clone()),
        ]
    }
}

/// ISO-8601 UTC with millisecond precision, the upstream's expected format.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
