// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Seed average gain / average loss with the mean of the positive and
//          negative parts of the first `period` close-to-close deltas.
// Step 2 — Apply Wilder's smoothing for every later delta:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)       (exactly 100 when avg_loss == 0)
// =============================================================================

use super::finite_or_zero;
use crate::market_data::Candle;

/// Compute the RSI series for `candles` and `period`.
///
/// Element `k` belongs to the prefix ending at candle `period + k` (the first
/// `period + 1` closes are consumed to seed the averages).
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `candles.len() <= period` => empty vec (need at least `period` deltas)
pub fn rsi_series(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 || candles.len() <= period {
        return Vec::new();
    }

    let period_f = period as f64;

    // --- Seed averages from the first `period` deltas ------------------------
    let mut gains = 0.0_f64;
    let mut losses = 0.0_f64;
    for pair in candles[..=period].windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses += -change;
        }
    }

    let mut avg_gain = gains / period_f;
    let mut avg_loss = losses / period_f;

    let mut result = Vec::with_capacity(candles.len() - period);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    // --- Wilder's smoothing for subsequent deltas ----------------------------
    for pair in candles[period..].windows(2) {
        let change = pair[1].close - pair[0].close;
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// RSI of the full sequence, or `0.0` when `candles.len() <= period`.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> f64 {
    rsi_series(candles, period)
        .last()
        .copied()
        .map_or(0.0, finite_or_zero)
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// A zero average loss (including a completely flat market) reads as 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{flat, from_closes, zigzag};

    #[test]
    fn rsi_period_zero() {
        assert!(rsi_series(&zigzag(10), 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data_is_zero() {
        // Need period+1 closes. 14 closes => 13 deltas < 14.
        for len in 0..=14 {
            assert_eq!(calculate_rsi(&zigzag(len), 14), 0.0, "len={len}");
        }
        assert_ne!(calculate_rsi(&zigzag(15), 14), 0.0);
    }

    #[test]
    fn rsi_all_gains_is_exactly_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in rsi_series(&from_closes(&closes), 14) {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_non_negative_deltas_after_seed_stay_100() {
        // Flat seed then only rises or flat bars: avg_loss never leaves zero.
        let mut closes = vec![50.0; 8];
        closes.extend([51.0, 51.0, 53.0, 53.0, 54.5]);
        assert_eq!(calculate_rsi(&from_closes(&closes), 7), 100.0);
    }

    #[test]
    fn rsi_flat_market_reads_100() {
        assert_eq!(calculate_rsi(&flat(30, 100.0), 14), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in rsi_series(&from_closes(&closes), 14) {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let candles = from_closes(&closes);
        for period in [3, 7, 14] {
            for &v in &rsi_series(&candles, period) {
                assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
            }
        }
    }

    #[test]
    fn rsi_seed_only_matches_hand_computation() {
        // Deltas: +2, -1, +3 => avg_gain = 5/3, avg_loss = 1/3, RS = 5.
        let candles = from_closes(&[10.0, 12.0, 11.0, 14.0]);
        let rsi = calculate_rsi(&candles, 3);
        assert!((rsi - (100.0 - 100.0 / 6.0)).abs() < 1e-10);
    }

    #[test]
    fn rsi_wilder_step_matches_hand_computation() {
        // Seed as above, then delta -2: avg_gain = (5/3*2)/3, avg_loss = (1/3*2 + 2)/3.
        let candles = from_closes(&[10.0, 12.0, 11.0, 14.0, 12.0]);
        let avg_gain = (5.0 / 3.0 * 2.0) / 3.0;
        let avg_loss = (1.0 / 3.0 * 2.0 + 2.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((calculate_rsi(&candles, 3) - expected).abs() < 1e-10);
    }
}
