// =============================================================================
// Snapshot Module
// =============================================================================
//
// Turns an intraday candle sequence and a 4-hour candle sequence, plus the
// externally fetched open interest and funding rate, into one immutable
// technical-analysis snapshot.
//
//   builder — pure aggregation (no I/O, total on any input)
//   service — fetch orchestration over a `MarketDataSource`

pub mod builder;
pub mod service;
pub mod types;

pub use builder::{build_default_snapshot, build_snapshot};
pub use service::SnapshotService;
pub use types::{IntradaySeries, LongerTermContext, OpenInterest, Snapshot};
