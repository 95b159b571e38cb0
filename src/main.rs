// =============================================================================
// Trend Features: Main Entry Point
// =============================================================================
//
// Loads a price history (local JSON file or the market-data API), computes the
// standard indicator set in the configured mode, and prints a descriptive
// summary of the resulting feature table.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod indicators;
mod market_data;
mod provider;
mod runtime_config;
mod summary;
mod types;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::indicators::IndicatorEngine;
use crate::market_data::PriceSeries;
use crate::provider::MarketDataClient;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("INDICATOR_CONFIG").unwrap_or_else(|_| "indicator_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, path = %config_path, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    apply_env_overrides(&mut config)?;

    info!(
        mode = %config.mode,
        symbol = %config.request.symbol,
        frequency = %config.request.frequency,
        "Trend Features starting"
    );

    // ── 2. Price history ─────────────────────────────────────────────────
    let series = load_series(&config).await?;
    if series.is_empty() {
        anyhow::bail!("price history for '{}' is empty", series.symbol);
    }
    if let Some((first, last)) = series.date_range() {
        info!(symbol = %series.symbol, rows = series.len(), first, last, "series ready");
    }

    // ── 3. Indicators ────────────────────────────────────────────────────
    let mut engine = IndicatorEngine::new(&series, config.mode);
    engine
        .compute_all(&config.periods)
        .context("indicator computation failed")?;
    let mut table = engine.into_table();

    for name in &config.drop_columns {
        match table.drop_column(name) {
            Ok(_) => info!(column = %name, "column dropped"),
            Err(e) => warn!(error = %e, "configured drop column not present"),
        }
    }

    info!(
        columns = ?table.column_names(),
        preview = %serde_json::to_string(&table.head(config.preview_rows))?,
        "feature table ready"
    );

    // ── 4. Output ────────────────────────────────────────────────────────
    let summaries = summary::summarize_table(&table);
    if config.summary_by_column {
        for column in &summaries {
            println!("{}", serde_json::to_string_pretty(column)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    if let Some(path) = &config.output_path {
        let json = serde_json::to_string_pretty(&table)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write feature table to {}", path.display()))?;
        info!(path = %path.display(), rows = table.len(), "feature table written");
    }

    Ok(())
}

fn apply_env_overrides(config: &mut RuntimeConfig) -> Result<()> {
    if let Ok(key) = std::env::var("MARKET_DATA_API_KEY") {
        config.provider.api_key = key;
    }
    if let Ok(symbol) = std::env::var("INDICATOR_SYMBOL") {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() {
            config.request.symbol = symbol;
        }
    }
    if let Ok(mode) = std::env::var("INDICATOR_MODE") {
        config.mode = mode.parse().context("invalid INDICATOR_MODE")?;
    }
    if let Ok(path) = std::env::var("INDICATOR_HISTORY_FILE") {
        config.history_file = Some(path.into());
    }
    Ok(())
}

async fn load_series(config: &RuntimeConfig) -> Result<PriceSeries> {
    match &config.history_file {
        Some(path) => {
            let mut series = market_data::read_history_file(path)?;
            if series.symbol.is_empty() {
                series.symbol = config.request.symbol.clone();
            }
            Ok(series)
        }
        None => {
            MarketDataClient::new(config.provider.clone())?
                .fetch_history(&config.request)
                .await
        }
    }
}
