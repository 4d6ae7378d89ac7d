use thiserror::Error;

use crate::market_data::KlineInterval;

/// Which of the two candle sequences a snapshot is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleFrame {
    /// Short-resolution sequence picked from the scan interval.
    Intraday,
    /// Fixed 4-hour sequence for the longer-term context.
    LongTerm,
}

impl std::fmt::Display for CandleFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intraday => write!(f, "intraday"),
            Self::LongTerm => write!(f, "longer-term"),
        }
    }
}

/// Errors that abort snapshot construction.
///
/// Insufficient history is not an error (indicators fall back to zero), and
/// open-interest / funding-rate failures are downgraded to defaults. Only the
/// candle fetches are fatal.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to fetch {frame} candles ({interval}) for {symbol}: {source:#}")]
    CandleFetch {
        symbol: String,
        frame: CandleFrame,
        interval: KlineInterval,
        source: anyhow::Error,
    },

    #[error("provider returned no {frame} candles ({interval}) for {symbol}")]
    EmptyCandles {
        symbol: String,
        frame: CandleFrame,
        interval: KlineInterval,
    },
}

impl SnapshotError {
    /// Symbol whose fetch failed.
    pub fn symbol(&self) -> &str {
        match self {
            Self::CandleFetch { symbol, .. } | Self::EmptyCandles { symbol, .. } => symbol,
        }
    }

    /// Candle sequence whose fetch failed.
    pub fn frame(&self) -> CandleFrame {
        match self {
            Self::CandleFetch { frame, .. } | Self::EmptyCandles { frame, .. } => *frame,
        }
    }
}
