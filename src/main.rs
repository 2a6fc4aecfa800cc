use rustscreen::application::{Screener, TaIndicatorEngine};
use rustscreen::config::{Config, log_filter};
use rustscreen::domain::screening::{SessionStatus, TradingSession};
use rustscreen::infrastructure::{DhanMarketDataService, NseSymbolUniverse, TelegramNotifier};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::prelude::*;

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Setup Logging
    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    // 2. Trading-hours gate; an external scheduler re-invokes us
    let session = TradingSession::nse();
    if session.status_now() == SessionStatus::Closed {
        info!("⏰ Outside trading hours. Skipping.");
        return Ok(());
    }

    // 3. Wire adapters from credentials
    let config = Config::from_env();
    let screener = Screener::new(
        Arc::new(DhanMarketDataService::new(config.dhan)),
        Arc::new(NseSymbolUniverse::new()),
        Arc::new(TaIndicatorEngine::new()),
        Arc::new(TelegramNotifier::new(config.telegram)),
    );

    // 4. Run once
    let report = screener.run();
    if !report.matches.is_empty() && !report.notified {
        info!("Matches were found but the alert was not delivered");
    }

    Ok(())
}
