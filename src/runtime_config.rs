// =============================================================================
// Runtime Configuration
// =============================================================================
//
// Everything the pipeline needs is injected through this struct at startup:
// output mode, indicator periods, the market-data provider (API key and URL
// templates), the history request, and output options.
//
// All fields carry `#[serde(default)]` so that a partial or older JSON file
// still loads.
// =============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::IndicatorMode;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma() -> usize {
    5
}

fn default_wma() -> usize {
    5
}

fn default_momentum() -> usize {
    7
}

fn default_stochastic_k() -> usize {
    14
}

fn default_stochastic_d() -> usize {
    3
}

fn default_rsi() -> usize {
    14
}

fn default_williams_r() -> usize {
    14
}

fn default_cci() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_frequency() -> String {
    "daily".to_string()
}

fn default_symbol() -> String {
    "AAPL".to_string()
}

fn default_preview_rows() -> usize {
    10
}

fn default_requests() -> HashMap<String, String> {
    let base = "https://financialmodelingprep.com/api/v3";
    [
        (
            "daily",
            format!("{base}/historical-price-full/{{symbol}}?from={{from_date}}&to={{to_date}}&apikey={{key}}"),
        ),
        (
            "5min",
            format!("{base}/historical-chart/5min/{{symbol}}?from={{from_date}}&to={{to_date}}&apikey={{key}}"),
        ),
        (
            "1hour",
            format!("{base}/historical-chart/1hour/{{symbol}}?from={{from_date}}&to={{to_date}}&apikey={{key}}"),
        ),
        ("forex_list", format!("{base}/fx?apikey={{key}}")),
        ("forex", format!("{base}/historical-price-full/{{currencies}}?apikey={{key}}")),
        (
            "forex_light",
            format!("{base}/historical-price-full/{{currencies}}?from={{from_date}}&to={{to_date}}&apikey={{key}}"),
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

// =============================================================================
// IndicatorPeriods
// =============================================================================

/// Look-back periods for the standard indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPeriods {
    #[serde(default = "default_sma")]
    pub sma: usize,

    #[serde(default = "default_wma")]
    pub wma: usize,

    #[serde(default = "default_momentum")]
    pub momentum: usize,

    /// %K channel length.  Must be at least 7.
    #[serde(default = "default_stochastic_k")]
    pub stochastic_k: usize,

    /// %D smoothing window over %K.
    #[serde(default = "default_stochastic_d")]
    pub stochastic_d: usize,

    #[serde(default = "default_rsi")]
    pub rsi: usize,

    /// Williams %R channel length.  Must be at least 7.
    #[serde(default = "default_williams_r")]
    pub williams_r: usize,

    /// CCI typical-price average length.  The deviation window is fixed.
    #[serde(default = "default_cci")]
    pub cci: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            sma: default_sma(),
            wma: default_wma(),
            momentum: default_momentum(),
            stochastic_k: default_stochastic_k(),
            stochastic_d: default_stochastic_d(),
            rsi: default_rsi(),
            williams_r: default_williams_r(),
            cci: default_cci(),
        }
    }
}

// =============================================================================
// Provider / request
// =============================================================================

/// Market-data API access.  The key is never logged.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,

    /// Frequency key => URL template with `{symbol}`, `{currencies}`, `{key}`,
    /// `{from_date}` and `{to_date}` placeholders.
    #[serde(default = "default_requests")]
    pub requests: HashMap<String, String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            requests: default_requests(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("requests", &self.requests.keys().collect::<Vec<_>>())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Which history to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    /// Key into `ProviderConfig::requests`.
    #[serde(default = "default_frequency")]
    pub frequency: String,

    /// Ticker, or currency pair for the forex templates.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default)]
    pub from_date: Option<String>,

    #[serde(default)]
    pub to_date: Option<String>,
}

impl Default for DataRequest {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            symbol: default_symbol(),
            from_date: None,
            to_date: None,
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Raw values or discretised trend signals.
    #[serde(default)]
    pub mode: IndicatorMode,

    #[serde(default)]
    pub periods: IndicatorPeriods,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub request: DataRequest,

    /// Read the history from this JSON file instead of calling the API.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Columns removed from the table before it is handed on.
    #[serde(default)]
    pub drop_columns: Vec<String>,

    /// Write the finished table here as JSON.
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Print one summary per column instead of a single table.
    #[serde(default)]
    pub summary_by_column: bool,

    /// Rows of the finished table echoed to the log.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: IndicatorMode::default(),
            periods: IndicatorPeriods::default(),
            provider: ProviderConfig::default(),
            request: DataRequest::default(),
            history_file: None,
            drop_columns: Vec::new(),
            output_path: None,
            summary_by_column: false,
            preview_rows: default_preview_rows(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            mode = %config.mode,
            symbol = %config.request.symbol,
            frequency = %config.request.frequency,
            "runtime config loaded"
        );

        Ok(config)
    }
}
