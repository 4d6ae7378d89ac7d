// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// True Range (TR) for each bar after the first:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// The first bar has no previous close and contributes no TR.
//
//   ATR_0   = SMA of the first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
// =============================================================================

use super::finite_or_zero;
use crate::market_data::Candle;

/// Compute the ATR series for `candles` and `period`.
///
/// Element `k` belongs to the prefix ending at candle `period + k`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `candles.len() <= period` => empty vec (need `period` TR values, each
///   requiring a previous candle)
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 || candles.len() <= period {
        return Vec::new();
    }

    // --- Step 1: True Range for each consecutive pair ------------------------
    let tr_values: Vec<f64> = candles
        .windows(2)
        .map(|pair| pair[1].true_range(pair[0].close))
        .collect();

    // --- Step 2: Seed ATR with SMA of first `period` TR values ---------------
    let period_f = period as f64;
    let mut atr = tr_values[..period].iter().sum::<f64>() / period_f;

    let mut result = Vec::with_capacity(tr_values.len() - period + 1);
    result.push(atr);

    // --- Step 3: Wilder's smoothing for remaining TR values ------------------
    for &tr in &tr_values[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        result.push(atr);
    }

    result
}

/// ATR of the full sequence, or `0.0` when `candles.len() <= period`.
pub fn calculate_atr(candles: &[Candle], period: usize) -> f64 {
    atr_series(candles, period)
        .last()
        .copied()
        .map_or(0.0, finite_or_zero)
}
