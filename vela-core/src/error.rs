use thiserror::Error;

/// Unified error type for the vela workspace.
///
/// Variants distinguish retryable transport failures from fatal auth failures
/// and from benign "no more data" signals so that callers can make correct
/// fallback decisions instead of treating every failure as equivalent.
#[derive(Debug, Error)]
pub enum VelaError {
    /// A transient network or server failure; safe to retry.
    #[error("transient transport failure: {msg}")]
    Transient {
        /// Human-readable description of the underlying failure.
        msg: String,
    },

    /// The upstream throttled the request; retry after backing off.
    #[error("rate limited by upstream (retry after {retry_after_ms:?} ms)")]
    RateLimited {
        /// Suggested wait before the next attempt, when the upstream provided one.
        retry_after_ms: Option<u64>,
    },

    /// Authentication or signing failure. Fatal: never retried.
    #[error("authentication failed: {msg}")]
    Auth {
        /// Human-readable description (missing secret, rejected signature, ...).
        msg: String,
    },

    /// The upstream answered successfully but carried no rows.
    ///
    /// Non-fatal: the acquirer treats this as "try the next strategy".
    #[error("upstream returned no data")]
    EmptyResponse,

    /// The received row layout is too narrow to build a candle from.
    ///
    /// Rows wider than expected, or missing only trailing optional columns,
    /// are adapted silently and never produce this error.
    #[error("schema mismatch: need at least {min} columns, got {got}")]
    SchemaMismatch {
        /// Minimum number of columns required to parse a candle.
        min: usize,
        /// Number of columns actually received.
        got: usize,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned or expected data (unparseable fields, bad envelope).
    #[error("data issue: {0}")]
    Data(String),
}

impl VelaError {
    /// Helper: build a `Transient` error from any message.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient { msg: msg.into() }
    }

    /// Helper: build an `Auth` error from any message.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth { msg: msg.into() }
    }

    /// Helper: build a `Data` error from any message.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Whether the transport layer may retry the failed call.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::RateLimited { .. })
    }

    /// Whether the failure must abort the whole acquisition (no fallback).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}
