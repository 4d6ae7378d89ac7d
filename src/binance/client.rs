// =============================================================================
// Binance USDⓈ-M Futures REST Client — public market data
// =============================================================================
//
// Only unsigned endpoints are used:
//   GET /fapi/v1/klines        — candles
//   GET /fapi/v1/openInterest  — open interest
//   GET /fapi/v1/premiumIndex  — mark price and last funding rate
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::MarketDataSource;
use crate::market_data::{Candle, KlineInterval};
use crate::snapshot::OpenInterest;

/// Production futures REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Fields required per kline entry: openTime .. closeTime.
const KLINE_MIN_FIELDS: usize = 7;

/// Binance futures REST client for public market data.
#[derive(Clone)]
pub struct BinanceFuturesClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceFuturesClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client for BinanceFuturesClient")?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a client that re-uses an existing HTTP client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "BinanceFuturesClient initialised");
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the JSON body, failing on non-2xx.
    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {path} request failed"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse {path} response body"))?;

        if !status.is_success() {
            anyhow::bail!("Binance GET {} returned {}: {}", path, status, body);
        }

        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    #[instrument(skip(self), name = "binance::get_klines")]
    async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let path = format!("/fapi/v1/klines?symbol={symbol}&interval={interval}&limit={limit}");
        let body = self.get_json(&path).await?;
        let candles = parse_klines(&body)?;
        debug!(symbol, interval = %interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    #[instrument(skip(self), name = "binance::get_open_interest")]
    async fn get_open_interest(&self, symbol: &str) -> Result<OpenInterest> {
        let body = self
            .get_json(&format!("/fapi/v1/openInterest?symbol={symbol}"))
            .await?;
        let oi = parse_open_interest(&body)?;
        debug!(symbol, latest = oi.latest, "open interest fetched");
        Ok(oi)
    }

    #[instrument(skip(self), name = "binance::get_funding_rate")]
    async fn get_funding_rate(&self, symbol: &str) -> Result<f64> {
        let body = self
            .get_json(&format!("/fapi/v1/premiumIndex?symbol={symbol}"))
            .await?;
        let rate = parse_funding_rate(&body)?;
        debug!(symbol, rate_pct = format!("{:.4}", rate * 100.0), "funding rate fetched");
        Ok(rate)
    }
}

impl std::fmt::Debug for BinanceFuturesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceFuturesClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// -------------------------------------------------------------------------
// Response decoding
// -------------------------------------------------------------------------

/// Decode the kline array-of-arrays response.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, ...
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < KLINE_MIN_FIELDS {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = arr[0].as_i64().context("kline openTime is not an integer")?;
        let open = parse_str_f64(&arr[1]).context("kline open")?;
        let high = parse_str_f64(&arr[2]).context("kline high")?;
        let low = parse_str_f64(&arr[3]).context("kline low")?;
        let close = parse_str_f64(&arr[4]).context("kline close")?;
        let volume = parse_str_f64(&arr[5]).context("kline volume")?;
        let close_time = arr[6].as_i64().context("kline closeTime is not an integer")?;

        candles.push(Candle::new(open_time, open, high, low, close, volume, close_time));
    }

    Ok(candles)
}

/// Decode `{"openInterest": "...", ...}`.
pub fn parse_open_interest(body: &serde_json::Value) -> Result<OpenInterest> {
    let latest = parse_str_f64(&body["openInterest"]).context("openInterest field")?;
    Ok(OpenInterest::from_latest(latest))
}

/// Decode the `lastFundingRate` field of a premiumIndex response.
pub fn parse_funding_rate(body: &serde_json::Value) -> Result<f64> {
    parse_str_f64(&body["lastFundingRate"]).context("lastFundingRate field")
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}
