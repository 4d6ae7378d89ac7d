// =============================================================================
// Aurora Market Snapshot
// =============================================================================
//
// Point-in-time technical-analysis snapshots for USDT-margined perpetuals:
// price, EMA / MACD / RSI / ATR on an intraday and a 4-hour horizon, trailing
// indicator history, open interest and funding rate.
//
// The indicator engine and snapshot builder are pure and synchronous; all
// network I/O lives behind `binance::MarketDataSource`.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod binance;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod market_data;
pub mod report;
pub mod snapshot;

pub use errors::{CandleFrame, SnapshotError};
pub use market_data::{Candle, KlineInterval, ScanInterval};
pub use report::render_report;
pub use snapshot::{build_default_snapshot, build_snapshot, Snapshot, SnapshotService};
