// =============================================================================
// Kline Intervals & Scan-Interval Resolution
// =============================================================================
//
// The intraday candle resolution is derived from how often the caller scans:
//
//   scan <= 1m  => 1m      scan <= 15m => 15m
//   scan <= 3m  => 3m      scan <= 30m => 30m
//   scan <= 5m  => 5m      otherwise   => 1h
//
// The 1h price-change lookback counts bars of the *resolved* interval, so the
// bar spacing the fetcher must supply is pinned by `ScanInterval::kline_interval`
// rather than inferred from the raw scan hint.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Minimum intraday bars requested: a 26-period MACD plus safety margin.
const MIN_INTRADAY_BARS: u32 = 40;

/// Wall-clock span (minutes) the intraday fetch should cover at minimum.
const INTRADAY_COVERAGE_MINUTES: u32 = 120;

/// Candle resolutions understood by the futures kline endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
}

impl KlineInterval {
    /// The interval label used in API query strings and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::ThreeMinutes => "3m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
        }
    }

    /// Bar spacing in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::ThreeMinutes => 3,
            Self::FiveMinutes => 5,
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::OneHour => 60,
            Self::FourHours => 240,
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often the caller refreshes a snapshot, in whole minutes (at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInterval(u32);

impl ScanInterval {
    /// Scan cadence used by the convenience entry points.
    pub const DEFAULT_MINUTES: u32 = 3;

    /// Wrap a scan cadence; zero is clamped to one minute.
    pub fn new(minutes: u32) -> Self {
        Self(minutes.max(1))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Resolve the intraday candle resolution for this scan cadence.
    pub fn kline_interval(&self) -> KlineInterval {
        match self.0 {
            0..=1 => KlineInterval::OneMinute,
            2..=3 => KlineInterval::ThreeMinutes,
            4..=5 => KlineInterval::FiveMinutes,
            6..=15 => KlineInterval::FifteenMinutes,
            16..=30 => KlineInterval::ThirtyMinutes,
            _ => KlineInterval::OneHour,
        }
    }

    /// Intraday candles to request: `max(40, floor(120 / scan))`.
    pub fn intraday_limit(&self) -> u32 {
        (INTRADAY_COVERAGE_MINUTES / self.0).max(MIN_INTRADAY_BARS)
    }

    /// Lookback (in intraday bars) for the 1h price change: `floor(60 / scan)`.
    ///
    /// Assumes the intraday bars are spaced one scan apart. A scan longer
    /// than an hour yields 0, which compares the latest close with itself.
    pub fn bars_for_one_hour(&self) -> usize {
        (60 / self.0) as usize
    }
}

impl Default for ScanInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}
