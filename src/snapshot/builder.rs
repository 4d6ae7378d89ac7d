// =============================================================================
// Snapshot Builder — pure aggregation of two candle sequences
// =============================================================================
//
// Intraday sequence (resolution from the scan interval):
//   current price / EMA20 / MACD / RSI7, 1h price change, trailing
//   mid-price, EMA20, MACD, RSI7, RSI14 series.
//
// 4-hour sequence:
//   EMA20 / EMA50 / ATR3 / ATR14, current and mean volume, 4h price change,
//   trailing MACD and RSI14 series.
//
// Precondition: the intraday candles are spaced one scan interval apart.
// The 1h lookback is `floor(60 / scan)` bars; a sequence of any other
// spacing measures the change over the wrong span.
// =============================================================================

use tracing::debug;

use super::types::{IntradaySeries, LongerTermContext, OpenInterest, Snapshot};
use crate::indicators::{
    calculate_atr, calculate_ema, calculate_macd, calculate_rsi, mid_prices, trailing_series,
    Indicator, TRAILING_WINDOW,
};
use crate::market_data::{Candle, KlineInterval, ScanInterval};

const EMA_SHORT_PERIOD: usize = 20;
const EMA_LONG_PERIOD: usize = 50;
const RSI_FAST_PERIOD: usize = 7;
const RSI_SLOW_PERIOD: usize = 14;
const ATR_FAST_PERIOD: usize = 3;
const ATR_SLOW_PERIOD: usize = 14;

/// Assemble a snapshot from already-fetched inputs.
///
/// `intraday` must be spaced `scan` minutes apart: `price_change_1h` looks
/// back [`ScanInterval::bars_for_one_hour`] bars.
///
/// Never fails: any field whose indicator lacks history is `0.0` (scalars)
/// or a shortened / empty series.
pub fn build_snapshot(
    symbol: &str,
    scan: ScanInterval,
    intraday: &[Candle],
    long_term: &[Candle],
    open_interest: OpenInterest,
    funding_rate: f64,
) -> Snapshot {
    let interval = scan.kline_interval();

    let current_price = intraday.last().map_or(0.0, |c| c.close);
    let price_change_1h = price_change_over_bars(intraday, scan.bars_for_one_hour());
    let price_change_4h = price_change_over_bars(long_term, 1);

    let snapshot = Snapshot {
        symbol: symbol.to_string(),
        current_price,
        current_ema20: calculate_ema(intraday, EMA_SHORT_PERIOD),
        current_macd: calculate_macd(intraday),
        current_rsi7: calculate_rsi(intraday, RSI_FAST_PERIOD),
        price_change_1h,
        price_change_4h,
        open_interest,
        funding_rate,
        intraday_series: intraday_series(intraday, interval),
        longer_term_context: longer_term_context(long_term),
    };

    debug!(
        symbol,
        interval = %interval,
        intraday_candles = intraday.len(),
        long_term_candles = long_term.len(),
        current_price,
        price_change_1h = format!("{:.3}", price_change_1h),
        price_change_4h = format!("{:.3}", price_change_4h),
        "snapshot built"
    );

    snapshot
}

/// [`build_snapshot`] with the default 3-minute scan interval.
pub fn build_default_snapshot(
    symbol: &str,
    intraday: &[Candle],
    long_term: &[Candle],
    open_interest: OpenInterest,
    funding_rate: f64,
) -> Snapshot {
    build_snapshot(
        symbol,
        ScanInterval::default(),
        intraday,
        long_term,
        open_interest,
        funding_rate,
    )
}

/// Percent change of the latest close against the close `bars` candles
/// earlier. Zero when the history is shorter than `bars + 1` or the past
/// close is not positive.
pub fn price_change_over_bars(candles: &[Candle], bars: usize) -> f64 {
    let Some(current) = candles.last() else {
        return 0.0;
    };
    if candles.len() < bars + 1 {
        return 0.0;
    }
    let past = candles[candles.len() - 1 - bars].close;
    price_change_pct(current.close, past)
}

/// `(current - past) / past * 100`, guarded to zero for `past <= 0`.
pub fn price_change_pct(current: f64, past: f64) -> f64 {
    if past > 0.0 {
        (current - past) / past * 100.0
    } else {
        0.0
    }
}

/// Trailing intraday history over the last [`TRAILING_WINDOW`] candles.
pub fn intraday_series(candles: &[Candle], interval: KlineInterval) -> IntradaySeries {
    IntradaySeries {
        mid_prices: mid_prices(candles, TRAILING_WINDOW),
        ema20_values: trailing_series(candles, Indicator::Ema(EMA_SHORT_PERIOD), TRAILING_WINDOW),
        macd_values: trailing_series(candles, Indicator::Macd, TRAILING_WINDOW),
        rsi7_values: trailing_series(candles, Indicator::Rsi(RSI_FAST_PERIOD), TRAILING_WINDOW),
        rsi14_values: trailing_series(candles, Indicator::Rsi(RSI_SLOW_PERIOD), TRAILING_WINDOW),
        interval,
    }
}

/// Longer-term context computed over the full 4-hour sequence.
pub fn longer_term_context(candles: &[Candle]) -> LongerTermContext {
    let (current_volume, average_volume) = match candles.last() {
        Some(last) => {
            let total: f64 = candles.iter().map(|c| c.volume).sum();
            (last.volume, total / candles.len() as f64)
        }
        None => (0.0, 0.0),
    };

    LongerTermContext {
        ema20: calculate_ema(candles, EMA_SHORT_PERIOD),
        ema50: calculate_ema(candles, EMA_LONG_PERIOD),
        atr3: calculate_atr(candles, ATR_FAST_PERIOD),
        atr14: calculate_atr(candles, ATR_SLOW_PERIOD),
        current_volume,
        average_volume,
        macd_values: trailing_series(candles, Indicator::Macd, TRAILING_WINDOW),
        rsi14_values: trailing_series(candles, Indicator::Rsi(RSI_SLOW_PERIOD), TRAILING_WINDOW),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{from_closes, zigzag};

    #[test]
    fn one_hour_change_on_three_minute_bars() {
        // 21 bars: constant 100 except the last at 110; 20 bars back is 100.
        let mut closes = vec![100.0; 21];
        closes[20] = 110.0;
        let candles = from_closes(&closes);
        let scan = ScanInterval::new(3);
        assert_eq!(price_change_over_bars(&candles, scan.bars_for_one_hour()), 10.0);

        let snapshot = build_snapshot("BTCUSDT", scan, &candles, &[], OpenInterest::default(), 0.0);
        assert_eq!(snapshot.price_change_1h, 10.0);
        assert_eq!(snapshot.current_price, 110.0);
    }

    #[test]
    fn one_hour_lookback_follows_scan_not_resolution() {
        // scan=10 fetches 15m bars but looks back 60/10 = 6 bars.
        let candles = from_closes(&[100.0, 200.0, 200.0, 105.0, 200.0, 200.0, 110.0]);
        let snapshot = build_snapshot(
            "BTCUSDT",
            ScanInterval::new(10),
            &candles,
            &[],
            OpenInterest::default(),
            0.0,
        );
        assert_eq!(snapshot.price_change_1h, 10.0);
    }

    #[test]
    fn scan_over_an_hour_has_zero_lookback() {
        let candles = from_closes(&[100.0, 150.0]);
        let snapshot = build_snapshot(
            "BTCUSDT",
            ScanInterval::new(120),
            &candles,
            &[],
            OpenInterest::default(),
            0.0,
        );
        assert_eq!(snapshot.price_change_1h, 0.0);
        assert_eq!(snapshot.current_price, 150.0);
    }

    #[test]
    fn one_hour_change_needs_lookback_plus_one_bars() {
        let mut closes = vec![100.0; 20];
        closes[19] = 110.0;
        assert_eq!(price_change_over_bars(&from_closes(&closes), 20), 0.0);
    }

    #[test]
    fn change_guards_non_positive_past_close() {
        assert_eq!(price_change_pct(110.0, 0.0), 0.0);
        assert_eq!(price_change_pct(110.0, -5.0), 0.0);
        assert_eq!(price_change_over_bars(&from_closes(&[0.0, 50.0]), 1), 0.0);
    }

    #[test]
    fn four_hour_change_uses_previous_bar() {
        let long_term = from_closes(&[90.0, 100.0, 105.0]);
        let snapshot = build_default_snapshot(
            "ETHUSDT",
            &from_closes(&[1.0]),
            &long_term,
            OpenInterest::default(),
            0.0,
        );
        assert!((snapshot.price_change_4h - 5.0).abs() < 1e-12);

        let single = build_default_snapshot(
            "ETHUSDT",
            &from_closes(&[1.0]),
            &from_closes(&[100.0]),
            OpenInterest::default(),
            0.0,
        );
        assert_eq!(single.price_change_4h, 0.0);
    }

    #[test]
    fn scalars_match_indicator_engine() {
        let intraday = zigzag(40);
        let long_term = zigzag(60);
        let snapshot = build_default_snapshot(
            "SOLUSDT",
            &intraday,
            &long_term,
            OpenInterest::from_latest(5000.0),
            0.0001,
        );

        assert_eq!(snapshot.symbol, "SOLUSDT");
        assert_eq!(snapshot.current_price, intraday[39].close);
        assert_eq!(snapshot.current_ema20, calculate_ema(&intraday, 20));
        assert_eq!(snapshot.current_macd, calculate_macd(&intraday));
        assert_eq!(snapshot.current_rsi7, calculate_rsi(&intraday, 7));
        assert_eq!(snapshot.funding_rate, 0.0001);
        assert_eq!(snapshot.open_interest.latest, 5000.0);

        let ctx = &snapshot.longer_term_context;
        assert_eq!(ctx.ema20, calculate_ema(&long_term, 20));
        assert_eq!(ctx.ema50, calculate_ema(&long_term, 50));
        assert_eq!(ctx.atr3, calculate_atr(&long_term, 3));
        assert_eq!(ctx.atr14, calculate_atr(&long_term, 14));
        assert_ne!(ctx.ema50, 0.0);
    }

    #[test]
    fn intraday_series_lengths_follow_gates() {
        // 30 candles: window is indices 20..=29.
        let series = intraday_series(&zigzag(30), KlineInterval::ThreeMinutes);
        assert_eq!(series.mid_prices.len(), 10);
        assert_eq!(series.ema20_values.len(), 10);
        assert_eq!(series.macd_values.len(), 5);
        assert_eq!(series.rsi7_values.len(), 10);
        assert_eq!(series.rsi14_values.len(), 10);
        assert_eq!(series.interval, KlineInterval::ThreeMinutes);
    }

    #[test]
    fn longer_term_volume_stats() {
        // zigzag volume = 10 + i.
        let ctx = longer_term_context(&zigzag(5));
        assert_eq!(ctx.current_volume, 14.0);
        assert_eq!(ctx.average_volume, 12.0);
        assert_eq!(ctx.atr3, calculate_atr(&zigzag(5), 3));
        assert_eq!(ctx.ema20, 0.0);
        assert!(ctx.macd_values.is_empty());
        assert!(ctx.rsi14_values.is_empty());
    }

    #[test]
    fn empty_inputs_degrade_to_zero_filled_snapshot() {
        let snapshot = build_snapshot(
            "BTCUSDT",
            ScanInterval::new(5),
            &[],
            &[],
            OpenInterest::default(),
            0.0,
        );
        assert_eq!(snapshot.current_price, 0.0);
        assert_eq!(snapshot.current_macd, 0.0);
        assert_eq!(snapshot.price_change_1h, 0.0);
        assert_eq!(snapshot.price_change_4h, 0.0);
        assert!(snapshot.intraday_series.mid_prices.is_empty());
        assert_eq!(snapshot.intraday_series.interval, KlineInterval::FiveMinutes);
        assert_eq!(snapshot.longer_term_context.average_volume, 0.0);
    }

    #[test]
    fn short_history_zeroes_indicators_but_keeps_prices() {
        let intraday = zigzag(12);
        let snapshot = build_default_snapshot("BTCUSDT", &intraday, &zigzag(3), OpenInterest::default(), 0.0);
        assert_eq!(snapshot.current_ema20, 0.0);
        assert_eq!(snapshot.current_macd, 0.0);
        assert_ne!(snapshot.current_rsi7, 0.0);
        assert_eq!(snapshot.intraday_series.mid_prices.len(), 10);
        assert!(snapshot.intraday_series.ema20_values.is_empty());
        assert_eq!(snapshot.intraday_series.rsi7_values.len(), 5);
        for v in snapshot
            .intraday_series
            .rsi7_values
            .iter()
            .chain([snapshot.current_rsi7].iter())
        {
            assert!(v.is_finite());
        }
    }
}
