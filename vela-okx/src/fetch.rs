use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use vela_core::{BatchRequest, Candle, CandleSource, Endpoint, Interval, VelaError};

use crate::DEFAULT_BASE_URL;
use crate::sign::{Credentials, RequestSigner};
use crate::transport::{RateLimitedTransport, TransportConfig};

/// Wire column layout of both candle endpoints, widest form first. Trailing
/// columns may be absent depending on endpoint and instrument.
const EXPECTED_COLUMNS: [&str; 9] = [
    "ts", "open", "high", "low", "close", "volume", "quote_volume", "turnover", "trade_count",
];

/// Columns required to build a candle at all (`ts` through `volume`).
const MIN_COLUMNS: usize = 6;

const LIVE_PATH: &str = "/api/v5/market/candles";
const HISTORY_PATH: &str = "/api/v5/market/history-candles";

/// OKX candle connector: one signed, rate-limited, paginated call per
/// [`CandleSource::fetch_batch`] invocation.
#[derive(Debug, Clone)]
pub struct OkxConnector {
    transport: RateLimitedTransport,
    page_cap: u32,
}

/// Builder for [`OkxConnector`]; customize before calling `build()`.
#[derive(Debug)]
pub struct OkxConnectorBuilder {
    credentials: Credentials,
    base_url: String,
    transport: TransportConfig,
    page_cap: u32,
}

impl OkxConnectorBuilder {
    /// Point the connector at a non-production base URL (tests, mirrors).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transport tunables.
    #[must_use]
    pub fn transport(mut self, cfg: TransportConfig) -> Self {
        self.transport = cfg;
        self
    }

    /// Override the per-page row cap advertised to the acquirer.
    #[must_use]
    pub const fn page_cap(mut self, cap: u32) -> Self {
        self.page_cap = cap;
        self
    }

    /// Validate the credentials and assemble the connector.
    ///
    /// # Errors
    /// Returns `VelaError::Auth` for an empty secret and
    /// `VelaError::InvalidArg` for an unusable base URL.
    pub fn build(self) -> Result<OkxConnector, VelaError> {
        let signer = RequestSigner::new(self.credentials)?;
        let transport = RateLimitedTransport::new(&self.base_url, signer, self.transport)?;
        Ok(OkxConnector {
            transport,
            page_cap: self.page_cap,
        })
    }
}

impl OkxConnector {
    /// Returns an unconfigured builder for the production upstream.
    ///
    /// Customize with the builder methods before calling `.build()`.
    #[must_use]
    pub fn builder(credentials: Credentials) -> OkxConnectorBuilder {
        OkxConnectorBuilder {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            transport: TransportConfig::default(),
            page_cap: 300,
        }
    }

    /// Build a connector for the production upstream with default tunables.
    ///
    /// # Errors
    /// Returns `VelaError::Auth` for an empty secret.
    pub fn new(credentials: Credentials) -> Result<Self, VelaError> {
        Self::builder(credentials).build()
    }

    /// Fetch the current, still-open bucket from the live endpoint.
    ///
    /// Mirrors a `limit = 1` batch call but marks the record `is_closed =
    /// false`; `None` when the upstream has nothing for the pair.
    ///
    /// # Errors
    /// Propagates transport and parse failures like
    /// [`CandleSource::fetch_batch`].
    pub async fn latest(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Option<Candle>, VelaError> {
        let req = BatchRequest::new(symbol, interval, 1, Endpoint::Live);
        let rows = self.transport.get_rows(&request_path(&req)).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let mut candles = parse_batch_rows(&rows[..1], false)?;
        Ok(candles.pop())
    }
}

#[async_trait]
impl CandleSource for OkxConnector {
    fn name(&self) -> &'static str {
        "vela-okx"
    }

    async fn fetch_batch(&self, req: &BatchRequest) -> Result<Vec<Candle>, VelaError> {
        let path = request_path(req);
        tracing::debug!(
            symbol = %req.symbol,
            interval = %req.interval,
            limit = req.limit,
            endpoint = ?req.endpoint,
            before = ?req.before,
            after = ?req.after,
            "fetching candle batch"
        );
        let rows = self.transport.get_rows(&path).await?;
        if rows.is_empty() {
            tracing::debug!(symbol = %req.symbol, endpoint = ?req.endpoint, "empty batch");
            return Ok(Vec::new());
        }
        let candles = parse_batch_rows(&rows, true)?;
        tracing::debug!(symbol = %req.symbol, records = candles.len(), "parsed candle batch");
        Ok(candles)
    }

    fn page_cap(&self) -> u32 {
        self.page_cap
    }
}

/// Assemble the request path (including query string) for one batch call.
fn request_path(req: &BatchRequest) -> String {
    let path = match req.endpoint {
        Endpoint::Live => LIVE_PATH,
        Endpoint::Historical => HISTORY_PATH,
    };
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("instId", &req.symbol);
    query.append_pair("bar", req.interval.as_bar());
    query.append_pair("limit", &req.limit.to_string());
    if let Some(before) = req.before {
        query.append_pair("before", &before.timestamp_millis().to_string());
    }
    if let Some(after) = req.after {
        query.append_pair("after", &after.timestamp_millis().to_string());
    }
    format!("{path}?{}", query.finish())
}

/// Parse raw endpoint rows into typed candles, preserving arrival order.
///
/// When the received width differs from [`EXPECTED_COLUMNS`], the expected
/// set is truncated to the received width instead of failing; only rows too
/// narrow to carry `ts` through `volume` are rejected.
///
/// # Errors
/// Returns `VelaError::SchemaMismatch` for rows narrower than the minimum
/// column set and `VelaError::Data` for unparseable fields.
pub fn parse_batch_rows(rows: &[Vec<String>], is_closed: bool) -> Result<Vec<Candle>, VelaError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let width = first.len().min(EXPECTED_COLUMNS.len());
    if first.len() < MIN_COLUMNS {
        return Err(VelaError::SchemaMismatch {
            min: MIN_COLUMNS,
            got: first.len(),
        });
    }
    if first.len() != EXPECTED_COLUMNS.len() {
        tracing::warn!(
            expected = EXPECTED_COLUMNS.len(),
            received = first.len(),
            "column count mismatch, truncating expected set"
        );
    }

    rows.iter().map(|row| parse_row(row, width, is_closed)).collect()
}

fn parse_row(row: &[String], width: usize, is_closed: bool) -> Result<Candle, VelaError> {
    if row.len() < MIN_COLUMNS {
        return Err(VelaError::SchemaMismatch {
            min: MIN_COLUMNS,
            got: row.len(),
        });
    }
    let open_time = parse_timestamp(&row[0])?;
    Ok(Candle {
        open_time,
        open: parse_decimal(&row[1], "open")?,
        high: parse_decimal(&row[2], "high")?,
        low: parse_decimal(&row[3], "low")?,
        close: parse_decimal(&row[4], "close")?,
        volume: parse_decimal(&row[5], "volume")?,
        quote_volume: optional_decimal(row, width, 6, "quote_volume")?,
        turnover: optional_decimal(row, width, 7, "turnover")?,
        trade_count: if width > 8 {
            Some(
                row[8]
                    .parse::<u64>()
                    .map_err(|e| VelaError::data(format!("bad trade_count {:?}: {e}", row[8])))?,
            )
        } else {
            None
        },
        is_closed,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, VelaError> {
    let ms: i64 = raw
        .parse()
        .map_err(|e| VelaError::data(format!("bad timestamp {raw:?}: {e}")))?;
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| VelaError::data(format!("timestamp out of range: {ms}")))
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, VelaError> {
    raw.parse()
        .map_err(|e| VelaError::data(format!("bad {field} {raw:?}: {e}")))
}

fn optional_decimal(
    row: &[String],
    width: usize,
    idx: usize,
    field: &str,
) -> Result<Option<Decimal>, VelaError> {
    if width > idx && row.len() > idx {
        parse_decimal(&row[idx], field).map(Some)
    } else {
        Ok(None)
    }
}
