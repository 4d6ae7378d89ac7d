// =============================================================================
// Series Sampler — bounded trailing indicator history
// =============================================================================
//
// For the last `window` candles of a sequence, emit the indicator evaluated
// over each prefix ending at that candle. Prefixes too short to define the
// indicator are omitted rather than zero-filled, so different indicators over
// the same window yield series of different lengths. Every series is
// right-aligned to the latest candle; series are not co-indexed.
// =============================================================================

use super::{finite_or_zero, Indicator};
use crate::market_data::Candle;

/// Number of trailing points kept per indicator.
pub const TRAILING_WINDOW: usize = 10;

/// Trailing history of `indicator` over the last `window` candles, oldest first.
///
/// Point `i` (a candle index inside the window) is present only when
/// `i + 1 >= indicator.min_candles()`.
pub fn trailing_series(candles: &[Candle], indicator: Indicator, window: usize) -> Vec<f64> {
    let n = candles.len();
    let window_start = n.saturating_sub(window);

    // The full series ends at the latest candle, so its first element belongs
    // to candle `n - series.len()`.
    let series = indicator.series(candles);
    let first_defined = n - series.len();
    let from = window_start.max(first_defined);

    series[from - first_defined..]
        .iter()
        .copied()
        .map(finite_or_zero)
        .collect()
}

/// Closing prices of the last `window` candles; never gated.
pub fn mid_prices(candles: &[Candle], window: usize) -> Vec<f64> {
    let start = candles.len().saturating_sub(window);
    candles[start..].iter().map(|c| c.close).collect()
}
