// =============================================================================
// Snapshot Daemon Configuration
// =============================================================================
//
// Loaded from a JSON file; every field carries a serde default so that a
// partial (or empty) file is valid. A handful of environment variables
// override the file after loading:
//
//   SNAPSHOT_SYMBOLS       comma-separated symbols (normalized)
//   SNAPSHOT_SCAN_MINUTES  scan cadence in minutes
//   SNAPSHOT_BIND_ADDR     HTTP listen address
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binance::client::DEFAULT_BASE_URL;
use crate::market_data::{normalize_symbol, ScanInterval};
use crate::snapshot::service::DEFAULT_LONG_TERM_LIMIT;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "BTCUSDT".to_string(),
        "ETHUSDT".to_string(),
        "SOLUSDT".to_string(),
    ]
}

fn default_scan_interval_minutes() -> u32 {
    ScanInterval::DEFAULT_MINUTES
}

fn default_long_term_limit() -> u32 {
    DEFAULT_LONG_TERM_LIMIT
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Symbols refreshed by the background loop.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Scan cadence; picks the intraday candle resolution.
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u32,

    /// Number of 4h candles requested per snapshot.
    #[serde(default = "default_long_term_limit")]
    pub long_term_limit: u32,

    /// Seconds between background refreshes.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// HTTP API listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Futures REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            scan_interval_minutes: default_scan_interval_minutes(),
            long_term_limit: default_long_term_limit(),
            refresh_secs: default_refresh_secs(),
            bind_addr: default_bind_addr(),
            base_url: default_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        config.symbols = normalize_all(config.symbols.iter().map(String::as_str));

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            scan_interval_minutes = config.scan_interval_minutes,
            "config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup` (an environment-like key/value source).
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(syms) = lookup("SNAPSHOT_SYMBOLS") {
            let symbols = normalize_all(syms.split(','));
            if symbols.is_empty() {
                warn!("SNAPSHOT_SYMBOLS is empty, keeping configured symbols");
            } else {
                self.symbols = symbols;
            }
        }

        if let Some(raw) = lookup("SNAPSHOT_SCAN_MINUTES") {
            match raw.trim().parse::<u32>() {
                Ok(minutes) => self.scan_interval_minutes = minutes,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid SNAPSHOT_SCAN_MINUTES"),
            }
        }

        if let Some(addr) = lookup("SNAPSHOT_BIND_ADDR") {
            self.bind_addr = addr;
        }
    }

    pub fn scan_interval(&self) -> ScanInterval {
        ScanInterval::new(self.scan_interval_minutes)
    }
}

/// Normalize, drop blanks, and de-duplicate while keeping order.
fn normalize_all<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in raw.map(str::trim).filter(|s| !s.is_empty()) {
        let sym = normalize_symbol(s);
        if !out.contains(&sym) {
            out.push(sym);
        }
    }
    out
}
