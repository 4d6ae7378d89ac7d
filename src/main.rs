// =============================================================================
// Aurora Market Snapshot — Main Entry Point
// =============================================================================
//
// `aurora-snapshot`                 run the refresh loop and the HTTP API
// `aurora-snapshot BTC ETH ...`     print one report per symbol and exit
//
// `--config <path>` and `--scan <minutes>` apply to both modes.
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aurora_market_snapshot::api;
use aurora_market_snapshot::app_state::AppState;
use aurora_market_snapshot::binance::BinanceFuturesClient;
use aurora_market_snapshot::config::AppConfig;
use aurora_market_snapshot::{render_report, SnapshotService};

const CONFIG_PATH: &str = "snapshot_config.json";

#[derive(Parser, Debug)]
#[command(
    name = "aurora-snapshot",
    version,
    about = "Technical-analysis snapshots for USDT-margined perpetuals"
)]
struct Cli {
    /// Symbols to report once (e.g. `BTC ETHUSDT`). Runs the daemon when omitted.
    symbols: Vec<String>,

    /// Scan cadence in minutes; overrides the config file and SNAPSHOT_SCAN_MINUTES.
    #[arg(long, value_name = "MINUTES")]
    scan: Option<u32>,

    /// Path to the JSON config file.
    #[arg(long, value_name = "PATH", default_value = CONFIG_PATH)]
    config: PathBuf,
}

impl Cli {
    /// Flags win over both the config file and the environment.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(scan) = self.scan {
            config.scan_interval_minutes = scan;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AppConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();
    cli.apply(&mut config);

    // ── 2. Market-data client & snapshot service ─────────────────────────
    let client = BinanceFuturesClient::new(
        config.base_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let service = SnapshotService::new(Arc::new(client)).with_long_term_limit(config.long_term_limit);

    // ── 3. One-shot mode ─────────────────────────────────────────────────
    if !cli.symbols.is_empty() {
        let scan = config.scan_interval();
        for symbol in &cli.symbols {
            let snapshot = service
                .fetch_snapshot(symbol, scan)
                .await
                .with_context(|| format!("snapshot for {symbol}"))?;
            println!("{}", render_report(&snapshot));
        }
        return Ok(());
    }

    info!(
        symbols = ?config.symbols,
        scan_interval_minutes = config.scan_interval_minutes,
        refresh_secs = config.refresh_secs,
        "Aurora Market Snapshot starting"
    );

    let bind_addr = config.bind_addr.clone();
    let refresh = Duration::from_secs(config.refresh_secs.max(1));
    let state = Arc::new(AppState::new(config, service));

    // ── 4. Refresh loop ──────────────────────────────────────────────────
    let refresh_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh);
        loop {
            interval.tick().await;
            refresh_state.refresh_all().await;
        }
    });

    // ── 5. API server ────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    let app = api::router(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received, stopping");
    info!(
        state_version = state.current_state_version(),
        "Aurora Market Snapshot shut down complete."
    );
    Ok(())
}
