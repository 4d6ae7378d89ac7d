// =============================================================================
// MACD Line
// =============================================================================
//
//   MACD = EMA(12) - EMA(26)
//
// Both EMAs run over the same full sequence with the SMA seeding rule of the
// EMA module. This is the MACD line only; no signal line or histogram.
// =============================================================================

use super::ema::ema_series;
use super::finite_or_zero;
use crate::market_data::Candle;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;

/// MACD line for every candle from index `MACD_SLOW_PERIOD - 1` onward.
///
/// Empty when fewer than `MACD_SLOW_PERIOD` candles are available.
pub fn macd_series(candles: &[Candle]) -> Vec<f64> {
    if candles.len() < MACD_SLOW_PERIOD {
        return Vec::new();
    }

    let fast = ema_series(candles, MACD_FAST_PERIOD);
    let slow = ema_series(candles, MACD_SLOW_PERIOD);

    // `fast` starts SLOW - FAST candles earlier than `slow`.
    let offset = MACD_SLOW_PERIOD - MACD_FAST_PERIOD;
    fast[offset..]
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| f - s)
        .collect()
}

/// MACD line of the full sequence, or `0.0` with fewer than 26 candles.
pub fn calculate_macd(candles: &[Candle]) -> f64 {
    macd_series(candles)
        .last()
        .copied()
        .map_or(0.0, finite_or_zero)
}
