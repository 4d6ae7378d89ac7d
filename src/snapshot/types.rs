use serde::{Deserialize, Serialize};

use crate::market_data::KlineInterval;

/// Open interest for a perpetual contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenInterest {
    /// Latest open interest in contracts.
    pub latest: f64,
    /// Approximate average; no historical series is fetched, see
    /// [`OpenInterest::from_latest`].
    pub average: f64,
}

impl OpenInterest {
    /// Factor applied to the latest reading to stand in for the average.
    pub const AVERAGE_FACTOR: f64 = 0.999;

    /// Build from a single reading, approximating the average as
    /// `latest * 0.999`.
    pub fn from_latest(latest: f64) -> Self {
        Self {
            latest,
            average: latest * Self::AVERAGE_FACTOR,
        }
    }
}

/// Trailing indicator history on the intraday interval.
///
/// Each series is right-aligned to the latest candle but starts only once its
/// own indicator is defined, so the vectors differ in length and must not be
/// zipped positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradaySeries {
    pub mid_prices: Vec<f64>,
    pub ema20_values: Vec<f64>,
    pub macd_values: Vec<f64>,
    pub rsi7_values: Vec<f64>,
    pub rsi14_values: Vec<f64>,
    /// Resolution of the candles the series were computed on.
    pub interval: KlineInterval,
}

/// Trend and volatility context on the 4-hour interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongerTermContext {
    pub ema20: f64,
    pub ema50: f64,
    pub atr3: f64,
    pub atr14: f64,
    pub current_volume: f64,
    pub average_volume: f64,
    pub macd_values: Vec<f64>,
    pub rsi14_values: Vec<f64>,
}

/// Point-in-time technical-analysis snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Normalized futures symbol, e.g. `BTCUSDT`.
    pub symbol: String,
    pub current_price: f64,
    pub current_ema20: f64,
    pub current_macd: f64,
    pub current_rsi7: f64,
    /// Percent change over the last hour of intraday bars.
    pub price_change_1h: f64,
    /// Percent change of the latest 4h close against the previous 4h close.
    pub price_change_4h: f64,
    pub open_interest: OpenInterest,
    pub funding_rate: f64,
    pub intraday_series: IntradaySeries,
    pub longer_term_context: LongerTermContext,
}
