use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading period as delivered by the market-data API.
///
/// Extra fields in the payload (`adjClose`, `vwap`, ...) are ignored; any of
/// the five OHLCV fields missing is a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Chronologically ordered (earliest first) OHLCV history for one symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub records: Vec<PriceRecord>,
}

/// The two payload shapes the API answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryPayload {
    Envelope {
        symbol: String,
        historical: Vec<PriceRecord>,
    },
    Bare(Vec<PriceRecord>),
}

impl PriceSeries {
    /// Build a series from records in any order; they are sorted by date.
    pub fn new(symbol: impl Into<String>, records: Vec<PriceRecord>) -> Result<Self> {
        let mut keyed = records
            .into_iter()
            .map(|r| parse_timestamp(&r.date).map(|ts| (ts, r)))
            .collect::<Result<Vec<_>>>()?;
        // Stable: equal timestamps keep their delivery order.
        keyed.sort_by_key(|(ts, _)| *ts);

        Ok(Self {
            symbol: symbol.into(),
            records: keyed.into_iter().map(|(_, r)| r).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<String> {
        self.records.iter().map(|r| r.date.clone()).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.volume).collect()
    }

    /// First and last date label, if any.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date.as_str(), last.date.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a history response body.
///
/// Accepted shapes:
/// ```json
/// { "symbol": "AAPL", "historical": [ { "date": "2024-11-04", "open": ... } ] }
/// [ { "date": "2024-11-04 09:30:00", "open": ... } ]
/// ```
/// A bare list carries no symbol, so the series symbol is left empty.
pub fn parse_history(text: &str) -> Result<PriceSeries> {
    let payload: HistoryPayload =
        serde_json::from_str(text).context("failed to parse price history JSON")?;

    let (symbol, records) = match payload {
        HistoryPayload::Envelope { symbol, historical } => (symbol, historical),
        HistoryPayload::Bare(records) => (String::new(), records),
    };

    debug!(symbol = %symbol, rows = records.len(), "price history parsed");
    PriceSeries::new(symbol, records)
}

/// Load a previously saved API response from disk.
pub fn read_history_file(path: impl AsRef<Path>) -> Result<PriceSeries> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read price history from {}", path.display()))?;
    let series = parse_history(&content)
        .with_context(|| format!("invalid price history in {}", path.display()))?;

    info!(path = %path.display(), rows = series.len(), "price history loaded from file");
    Ok(series)
}

/// Daily bars carry a bare date, intraday bars a full timestamp.
fn parse_timestamp(label: &str) -> Result<NaiveDateTime> {
    let label = label.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    let day = NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .with_context(|| format!("unrecognised date '{label}'"))?;
    day.and_hms_opt(0, 0, 0)
        .with_context(|| format!("date '{label}' has no midnight"))
}
