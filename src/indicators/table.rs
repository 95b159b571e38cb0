// =============================================================================
// Indicator Table
// =============================================================================
//
// Column store aligned 1:1 with a price series.  Base OHLCV columns are seeded
// at construction; indicator columns are appended in call order.  Re-inserting
// an existing name overwrites it in place and keeps its position.

use serde::Serialize;

use super::error::{EngineError, Result};
use crate::market_data::PriceSeries;

pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorTable {
    symbol: String,
    dates: Vec<String>,
    columns: Vec<Column>,
}

impl IndicatorTable {
    pub fn from_series(series: &PriceSeries) -> Self {
        let columns = vec![
            Column { name: OPEN.into(), values: series.opens() },
            Column { name: HIGH.into(), values: series.highs() },
            Column { name: LOW.into(), values: series.lows() },
            Column { name: CLOSE.into(), values: series.closes() },
            Column { name: VOLUME.into(), values: series.volumes() },
        ];
        Self {
            symbol: series.symbol.clone(),
            dates: series.dates(),
            columns,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| EngineError::MissingColumn(name.to_string()))
    }

    /// Add a column, or replace the one already carrying `name`.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<&[f64]> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(EngineError::LengthMismatch {
                name,
                expected: self.len(),
                got: values.len(),
            });
        }

        let idx = match self.columns.iter().position(|c| c.name == name) {
            Some(idx) => {
                self.columns[idx].values = values;
                idx
            }
            None => {
                self.columns.push(Column { name, values });
                self.columns.len() - 1
            }
        };
        Ok(&self.columns[idx].values)
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| EngineError::MissingColumn(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }

    /// First `n` rows of every column.
    pub fn head(&self, n: usize) -> IndicatorTable {
        let n = n.min(self.len());
        IndicatorTable {
            symbol: self.symbol.clone(),
            dates: self.dates[..n].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[..n].to_vec(),
                })
                .collect(),
        }
    }
}
