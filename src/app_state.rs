// =============================================================================
// Central Application State — Snapshot Daemon
// =============================================================================
//
// Holds the configuration, the snapshot service and the latest snapshot per
// symbol. The refresh loop writes; the HTTP API reads.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the snapshot cache and the error map.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures_util::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::errors::SnapshotError;
use crate::snapshot::{Snapshot, SnapshotService};

/// A cached snapshot and when it was generated.
#[derive(Debug, Clone, Serialize)]
pub struct CachedSnapshot {
    pub snapshot: Snapshot,
    /// ISO 8601 timestamp.
    pub generated_at: String,
}

/// The most recent refresh failure for a symbol.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Shared state passed to every task via `Arc<AppState>`.
pub struct AppState {
    /// Incremented every time the cache changes.
    pub state_version: AtomicU64,
    pub config: AppConfig,
    pub service: SnapshotService,
    snapshots: RwLock<HashMap<String, CachedSnapshot>>,
    last_errors: RwLock<HashMap<String, ErrorRecord>>,
}

impl AppState {
    pub fn new(config: AppConfig, service: SnapshotService) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            config,
            service,
            snapshots: RwLock::new(HashMap::new()),
            last_errors: RwLock::new(HashMap::new()),
        }
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::Relaxed)
    }

    fn increment_version(&self) {
        self.state_version.fetch_add(1, Ordering::Relaxed);
    }

    /// Cache `snapshot` under its symbol and clear any recorded error.
    pub fn store_snapshot(&self, snapshot: Snapshot) {
        let symbol = snapshot.symbol.clone();
        let cached = CachedSnapshot {
            snapshot,
            generated_at: Utc::now().to_rfc3339(),
        };
        self.snapshots.write().insert(symbol.clone(), cached);
        self.last_errors.write().remove(&symbol);
        self.increment_version();
    }

    pub fn record_error(&self, symbol: &str, message: impl Into<String>) {
        let record = ErrorRecord {
            message: message.into(),
            at: Utc::now().to_rfc3339(),
        };
        self.last_errors.write().insert(symbol.to_string(), record);
        self.increment_version();
    }

    pub fn snapshot(&self, symbol: &str) -> Option<CachedSnapshot> {
        self.snapshots.read().get(symbol).cloned()
    }

    /// All cached snapshots, ordered by symbol.
    pub fn all_snapshots(&self) -> Vec<CachedSnapshot> {
        let mut all: Vec<CachedSnapshot> = self.snapshots.read().values().cloned().collect();
        all.sort_by(|a, b| a.snapshot.symbol.cmp(&b.snapshot.symbol));
        all
    }

    pub fn errors(&self) -> HashMap<String, ErrorRecord> {
        self.last_errors.read().clone()
    }

    /// Fetch and cache a fresh snapshot for `symbol` at the configured scan.
    pub async fn refresh_symbol(&self, symbol: &str) -> Result<(), SnapshotError> {
        match self
            .service
            .fetch_snapshot(symbol, self.config.scan_interval())
            .await
        {
            Ok(snapshot) => {
                debug!(symbol = %snapshot.symbol, price = snapshot.current_price, "snapshot refreshed");
                self.store_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                error!(symbol, error = %e, "snapshot refresh failed");
                self.record_error(e.symbol(), e.to_string());
                Err(e)
            }
        }
    }

    /// Refresh every configured symbol concurrently. Returns how many succeeded.
    pub async fn refresh_all(&self) -> usize {
        let results = join_all(self.config.symbols.iter().map(|s| self.refresh_symbol(s))).await;
        let ok = results.iter().filter(|r| r.is_ok()).count();
        info!(
            refreshed = ok,
            failed = results.len() - ok,
            "snapshot refresh cycle complete"
        );
        ok
    }
}
