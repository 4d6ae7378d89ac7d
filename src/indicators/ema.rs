// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
// =============================================================================

use super::finite_or_zero;
use crate::market_data::Candle;

/// Compute the EMA series for `candles` and look-back `period`.
///
/// Element `k` of the result is the EMA of the prefix ending at candle
/// `period - 1 + k`, so the last element belongs to the latest candle. Each
/// element is bit-identical to a from-scratch evaluation of that prefix.
///
/// # Edge cases
/// - `period == 0` => empty vec (division by zero guard)
/// - `candles.len() < period` => empty vec
pub fn ema_series(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` closes.
    let sum: f64 = candles[..period].iter().map(|c| c.close).sum();
    let mut ema = sum / period as f64;

    let mut result = Vec::with_capacity(candles.len() - period + 1);
    result.push(ema);

    for candle in &candles[period..] {
        ema = (candle.close - ema) * multiplier + ema;
        result.push(ema);
    }

    result
}

/// EMA of the full sequence, or `0.0` when fewer than `period` candles exist.
pub fn calculate_ema(candles: &[Candle], period: usize) -> f64 {
    ema_series(candles, period)
        .last()
        .copied()
        .map_or(0.0, finite_or_zero)
}
