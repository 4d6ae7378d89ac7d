// =============================================================================
// Market-Data Provider
// =============================================================================
//
// The snapshot service consumes three capabilities from a derivatives data
// provider. They may fail independently; the service decides which failures
// are fatal.

pub mod client;

pub use client::BinanceFuturesClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::market_data::{Candle, KlineInterval};
use crate::snapshot::OpenInterest;

/// Source of candles, open interest and funding rates for a futures symbol.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Most recent `limit` candles at `interval`, oldest first.
    async fn get_klines(&self, symbol: &str, interval: KlineInterval, limit: u32)
        -> Result<Vec<Candle>>;

    /// Current open interest.
    async fn get_open_interest(&self, symbol: &str) -> Result<OpenInterest>;

    /// Latest funding rate as a decimal (e.g. 0.0001 = 0.01%).
    async fn get_funding_rate(&self, symbol: &str) -> Result<f64>;
}
