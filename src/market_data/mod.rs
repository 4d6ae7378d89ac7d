pub mod candle;
pub mod interval;
pub mod symbol;

// Re-export the core market types for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::Candle;
pub use interval::{KlineInterval, ScanInterval};
pub use symbol::{normalize_symbol, QUOTE_ASSET};
