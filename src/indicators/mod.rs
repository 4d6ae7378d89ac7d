// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators that make up a
// market snapshot. Every scalar entry point is total: insufficient history
// yields exactly `0.0`, never NaN or a panic.
//
// The `*_series` functions return one value per candle from the indicator's
// first defined index to the latest candle, each bit-identical to recomputing
// the indicator from scratch over that prefix. The series sampler relies on
// this to avoid quadratic recomputation.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod series;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use series::{mid_prices, trailing_series, TRAILING_WINDOW};

use crate::market_data::Candle;

/// An indicator together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Ema(usize),
    Macd,
    Rsi(usize),
    Atr(usize),
}

impl Indicator {
    /// Smallest number of candles for which the indicator is defined.
    pub fn min_candles(&self) -> usize {
        match *self {
            Self::Ema(period) => period,
            Self::Macd => macd::MACD_SLOW_PERIOD,
            Self::Rsi(period) | Self::Atr(period) => period + 1,
        }
    }

    /// Values for every prefix of `candles` long enough to define the
    /// indicator, oldest first, ending at the latest candle.
    pub fn series(&self, candles: &[Candle]) -> Vec<f64> {
        match *self {
            Self::Ema(period) => ema::ema_series(candles, period),
            Self::Macd => macd::macd_series(candles),
            Self::Rsi(period) => rsi::rsi_series(candles, period),
            Self::Atr(period) => atr::atr_series(candles, period),
        }
    }

    /// Value over the full sequence (`0.0` on insufficient history).
    pub fn latest(&self, candles: &[Candle]) -> f64 {
        match *self {
            Self::Ema(period) => calculate_ema(candles, period),
            Self::Macd => calculate_macd(candles),
            Self::Rsi(period) => calculate_rsi(candles, period),
            Self::Atr(period) => calculate_atr(candles, period),
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ema(p) => write!(f, "EMA{p}"),
            Self::Macd => write!(f, "MACD"),
            Self::Rsi(p) => write!(f, "RSI{p}"),
            Self::Atr(p) => write!(f, "ATR{p}"),
        }
    }
}

/// Collapse NaN / infinite results (only reachable from malformed input) to zero.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
