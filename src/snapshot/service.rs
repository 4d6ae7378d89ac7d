// =============================================================================
// Snapshot Service — fetch orchestration
// =============================================================================
//
// Fetches the intraday candles, 4h candles, open interest and funding rate
// concurrently, then hands them to the pure builder.
//
// Failure policy:
//   candle fetch error / empty candles => SnapshotError (fatal)
//   open interest error                => {0, 0} + warning
//   funding rate error                 => 0 + warning
// =============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use super::builder::build_snapshot;
use super::types::{OpenInterest, Snapshot};
use crate::binance::MarketDataSource;
use crate::errors::{CandleFrame, SnapshotError};
use crate::market_data::{normalize_symbol, Candle, KlineInterval, ScanInterval};

/// Interval of the longer-term context sequence.
pub const LONG_TERM_INTERVAL: KlineInterval = KlineInterval::FourHours;

/// 4h candles requested by default; enough for EMA50 plus a margin.
pub const DEFAULT_LONG_TERM_LIMIT: u32 = 60;

/// Builds snapshots from a [`MarketDataSource`].
#[derive(Clone)]
pub struct SnapshotService {
    source: Arc<dyn MarketDataSource>,
    long_term_limit: u32,
}

impl SnapshotService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            long_term_limit: DEFAULT_LONG_TERM_LIMIT,
        }
    }

    /// Override how many 4h candles are requested.
    pub fn with_long_term_limit(mut self, limit: u32) -> Self {
        self.long_term_limit = limit.max(1);
        self
    }

    /// Fetch everything needed and build a snapshot for `symbol`.
    ///
    /// The symbol is normalized first; the normalized form is what gets
    /// requested and stored in the snapshot.
    pub async fn fetch_snapshot(
        &self,
        symbol: &str,
        scan: ScanInterval,
    ) -> Result<Snapshot, SnapshotError> {
        let symbol = normalize_symbol(symbol);
        let interval = scan.kline_interval();
        let intraday_limit = scan.intraday_limit();

        debug!(
            symbol = %symbol,
            interval = %interval,
            intraday_limit,
            long_term_limit = self.long_term_limit,
            "fetching snapshot inputs"
        );

        let (intraday, long_term, open_interest, funding_rate) = tokio::join!(
            self.source.get_klines(&symbol, interval, intraday_limit),
            self.source
                .get_klines(&symbol, LONG_TERM_INTERVAL, self.long_term_limit),
            self.source.get_open_interest(&symbol),
            self.source.get_funding_rate(&symbol),
        );

        let intraday = require_candles(&symbol, CandleFrame::Intraday, interval, intraday)?;
        let long_term =
            require_candles(&symbol, CandleFrame::LongTerm, LONG_TERM_INTERVAL, long_term)?;

        let open_interest = open_interest.unwrap_or_else(|e| {
            warn!(symbol = %symbol, error = %e, "open interest unavailable, using zero");
            OpenInterest::default()
        });

        let funding_rate = funding_rate.unwrap_or_else(|e| {
            warn!(symbol = %symbol, error = %e, "funding rate unavailable, using zero");
            0.0
        });

        Ok(build_snapshot(
            &symbol,
            scan,
            &intraday,
            &long_term,
            open_interest,
            funding_rate,
        ))
    }

    /// [`fetch_snapshot`](Self::fetch_snapshot) with the default 3-minute scan.
    pub async fn fetch_default_snapshot(&self, symbol: &str) -> Result<Snapshot, SnapshotError> {
        self.fetch_snapshot(symbol, ScanInterval::default()).await
    }
}

impl std::fmt::Debug for SnapshotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotService")
            .field("long_term_limit", &self.long_term_limit)
            .finish_non_exhaustive()
    }
}

/// Turn a candle fetch result into candles, tagging failures with the frame.
fn require_candles(
    symbol: &str,
    frame: CandleFrame,
    interval: KlineInterval,
    fetched: anyhow::Result<Vec<Candle>>,
) -> Result<Vec<Candle>, SnapshotError> {
    let candles = fetched.map_err(|source| SnapshotError::CandleFetch {
        symbol: symbol.to_string(),
        frame,
        interval,
        source,
    })?;

    if candles.is_empty() {
        return Err(SnapshotError::EmptyCandles {
            symbol: symbol.to_string(),
            frame,
            interval,
        });
    }

    Ok(candles)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::zigzag;
    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// In-memory source with switchable failures; records kline requests.
    #[derive(Default)]
    struct StubSource {
        fail_intraday: bool,
        fail_long_term: bool,
        empty_long_term: bool,
        fail_open_interest: bool,
        fail_funding: bool,
        requests: Mutex<Vec<(String, KlineInterval, u32)>>,
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn get_klines(
            &self,
            symbol: &str,
            interval: KlineInterval,
            limit: u32,
        ) -> Result<Vec<Candle>> {
            self.requests.lock().push((symbol.to_string(), interval, limit));
            if interval == LONG_TERM_INTERVAL {
                if self.fail_long_term {
                    anyhow::bail!("4h upstream down");
                }
                if self.empty_long_term {
                    return Ok(Vec::new());
                }
            } else if self.fail_intraday {
                anyhow::bail!("intraday upstream down");
            }
            Ok(zigzag(limit as usize))
        }

        async fn get_open_interest(&self, _symbol: &str) -> Result<OpenInterest> {
            if self.fail_open_interest {
                anyhow::bail!("open interest timeout");
            }
            Ok(OpenInterest::from_latest(2000.0))
        }

        async fn get_funding_rate(&self, _symbol: &str) -> Result<f64> {
            if self.fail_funding {
                anyhow::bail!("funding timeout");
            }
            Ok(0.0001)
        }
    }

    fn service(stub: StubSource) -> (SnapshotService, Arc<StubSource>) {
        let stub = Arc::new(stub);
        (SnapshotService::new(stub.clone()), stub)
    }

    #[tokio::test]
    async fn fetches_with_normalized_symbol_and_limits() {
        let (svc, stub) = service(StubSource::default());
        let snapshot = svc.fetch_snapshot("btc", ScanInterval::new(1)).await.unwrap();

        assert_eq!(snapshot.symbol, "BTCUSDT");
        assert_eq!(snapshot.intraday_series.interval, KlineInterval::OneMinute);
        assert_eq!(snapshot.open_interest, OpenInterest::from_latest(2000.0));
        assert_eq!(snapshot.funding_rate, 0.0001);

        let mut requests = stub.requests.lock().clone();
        requests.sort_by_key(|r| r.2);
        assert_eq!(
            requests,
            vec![
                ("BTCUSDT".to_string(), KlineInterval::FourHours, 60),
                ("BTCUSDT".to_string(), KlineInterval::OneMinute, 120),
            ]
        );
    }

    #[tokio::test]
    async fn snapshot_matches_pure_builder() {
        let (svc, _) = service(StubSource::default());
        let snapshot = svc.fetch_default_snapshot("ethusdt").await.unwrap();
        let expected = build_snapshot(
            "ETHUSDT",
            ScanInterval::default(),
            &zigzag(40),
            &zigzag(60),
            OpenInterest::from_latest(2000.0),
            0.0001,
        );
        assert_eq!(snapshot, expected);
    }

    #[tokio::test]
    async fn open_interest_failure_defaults_to_zero() {
        let (svc, _) = service(StubSource {
            fail_open_interest: true,
            ..Default::default()
        });
        let snapshot = svc.fetch_default_snapshot("BTC").await.unwrap();
        assert_eq!(snapshot.open_interest, OpenInterest::default());
        assert_eq!(snapshot.funding_rate, 0.0001);
        assert_ne!(snapshot.current_macd, 0.0);
        assert_eq!(snapshot.intraday_series.mid_prices.len(), 10);
        assert_eq!(snapshot.longer_term_context.macd_values.len(), 10);
    }

    #[tokio::test]
    async fn funding_failure_defaults_to_zero() {
        let (svc, _) = service(StubSource {
            fail_funding: true,
            ..Default::default()
        });
        let snapshot = svc.fetch_default_snapshot("BTC").await.unwrap();
        assert_eq!(snapshot.funding_rate, 0.0);
        assert_eq!(snapshot.open_interest.latest, 2000.0);
    }

    #[tokio::test]
    async fn intraday_failure_is_fatal_and_identified() {
        let (svc, _) = service(StubSource {
            fail_intraday: true,
            ..Default::default()
        });
        let err = svc.fetch_default_snapshot("sol").await.unwrap_err();
        assert_eq!(err.symbol(), "SOLUSDT");
        assert_eq!(err.frame(), CandleFrame::Intraday);
        assert!(err.to_string().contains("intraday upstream down"));
    }

    #[tokio::test]
    async fn long_term_failure_is_fatal_and_identified() {
        let (svc, _) = service(StubSource {
            fail_long_term: true,
            ..Default::default()
        });
        let err = svc.fetch_default_snapshot("sol").await.unwrap_err();
        assert_eq!(err.frame(), CandleFrame::LongTerm);
        assert!(matches!(err, SnapshotError::CandleFetch { interval: KlineInterval::FourHours, .. }));
    }

    #[tokio::test]
    async fn empty_long_term_response_is_fatal() {
        let (svc, _) = service(StubSource {
            empty_long_term: true,
            ..Default::default()
        });
        let err = svc.fetch_default_snapshot("sol").await.unwrap_err();
        assert!(matches!(err, SnapshotError::EmptyCandles { frame: CandleFrame::LongTerm, .. }));
    }

    #[tokio::test]
    async fn long_term_limit_is_configurable() {
        let (svc, stub) = service(StubSource::default());
        let svc = svc.with_long_term_limit(100);
        svc.fetch_default_snapshot("BTC").await.unwrap();
        assert!(stub
            .requests
            .lock()
            .iter()
            .any(|r| r.1 == KlineInterval::FourHours && r.2 == 100));
    }
}
