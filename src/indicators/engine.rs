// =============================================================================
// Indicator Engine
// =============================================================================
//
// Owns an `IndicatorTable` seeded from a price series and appends one column
// per indicator call.  The output mode is fixed for the engine's lifetime and
// passed explicitly into every indicator function.
//
// Column writes are all-or-nothing: a column is fully computed before the
// table is touched, so a failed call leaves the table unchanged.
//
// %K -> %D hand-off:
//   `stochastic_k` returns a `PercentK` token that owns the unfilled %K
//   values.  `stochastic_d` takes the token by value, so a token can be spent
//   only once.  The engine additionally tracks the latest token it issued;
//   a token from another engine, or one made stale by a later `stochastic_k`
//   call, is rejected with `PreconditionViolation`.
//
// Not thread-safe: confine an engine instance to one computation.  Callers
// that need the same series in parallel build one engine each.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use super::error::{EngineError, Result};
use super::table::{IndicatorTable, CLOSE, HIGH, LOW, VOLUME};
use super::{ad, cci, momentum, rsi, sma, stochastic, wma};
use crate::market_data::PriceSeries;
use crate::runtime_config::IndicatorPeriods;
use crate::types::IndicatorMode;

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Ownership token carrying the %K series from `stochastic_k` to
/// `stochastic_d`.  Deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct PercentK {
    engine_id: u64,
    generation: u64,
    period: usize,
    values: Vec<f64>,
}

impl PercentK {
    /// Look-back period the %K was computed with.
    pub fn period(&self) -> usize {
        self.period
    }
}

pub struct IndicatorEngine {
    id: u64,
    mode: IndicatorMode,
    table: IndicatorTable,
    k_generation: u64,
    pending_k: Option<u64>,
}

impl IndicatorEngine {
    pub fn new(series: &PriceSeries, mode: IndicatorMode) -> Self {
        let id = NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed);
        debug!(engine_id = id, rows = series.len(), %mode, "indicator engine created");
        Self {
            id,
            mode,
            table: IndicatorTable::from_series(series),
            k_generation: 0,
            pending_k: None,
        }
    }

    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    pub fn table(&self) -> &IndicatorTable {
        &self.table
    }

    /// Hand the finished table to its consumer.
    pub fn into_table(self) -> IndicatorTable {
        self.table
    }

    // -------------------------------------------------------------------------
    // Indicators
    // -------------------------------------------------------------------------

    /// `movement`: sign of the close-to-close change, row 0 flat.
    pub fn make_up_down(&mut self) -> Result<&[f64]> {
        let values = momentum::movement(self.table.column(CLOSE)?);
        self.append("movement".to_string(), values)
    }

    pub fn sma(&mut self, n: usize) -> Result<&[f64]> {
        let values = sma::sma(self.table.column(CLOSE)?, n, self.mode)?;
        self.append(self.mode.column_name(&format!("sma_{n}")), values)
    }

    pub fn wma(&mut self, n: usize) -> Result<&[f64]> {
        let values = wma::wma(self.table.column(CLOSE)?, n, self.mode)?;
        self.append(self.mode.column_name(&format!("wma_{n}")), values)
    }

    pub fn momentum(&mut self, n: usize) -> Result<&[f64]> {
        let values = momentum::momentum(self.table.column(CLOSE)?, n, self.mode);
        self.append(self.mode.column_name(&format!("momentum_{n}")), values)
    }

    /// Append the %K column and return the token `stochastic_d` needs.
    pub fn stochastic_k(&mut self, period: usize) -> Result<PercentK> {
        let k = stochastic::percent_k(
            self.table.column(HIGH)?,
            self.table.column(LOW)?,
            self.table.column(CLOSE)?,
            period,
        )?;
        let column = stochastic::k_column(&k, self.mode);
        self.append(self.mode.column_name(&format!("k_{period}")), column)?;

        self.k_generation += 1;
        self.pending_k = Some(self.k_generation);
        Ok(PercentK {
            engine_id: self.id,
            generation: self.k_generation,
            period,
            values: k,
        })
    }

    /// Append the %D column from the most recent %K, consuming its token.
    pub fn stochastic_d(&mut self, k: PercentK, period: usize) -> Result<&[f64]> {
        if k.engine_id != self.id {
            return Err(EngineError::PreconditionViolation {
                reason: "%K token was issued by a different engine",
            });
        }
        if self.pending_k != Some(k.generation) {
            return Err(EngineError::PreconditionViolation {
                reason: "%K token is stale or already consumed",
            });
        }

        let values = stochastic::percent_d(&k.values, period, self.mode)?;
        self.pending_k = None;
        debug!(k_period = k.period, d_period = period, "%K token consumed");
        self.append(self.mode.column_name(&format!("d_{period}")), values)
    }

    pub fn rsi(&mut self, period: usize) -> Result<&[f64]> {
        let values = rsi::rsi(self.table.column(CLOSE)?, period, self.mode)?;
        self.append(self.mode.column_name(&format!("rsi_{period}")), values)
    }

    /// Williams %R.
    pub fn stochastic_r(&mut self, period: usize) -> Result<&[f64]> {
        let values = stochastic::williams_r(
            self.table.column(HIGH)?,
            self.table.column(LOW)?,
            self.table.column(CLOSE)?,
            period,
            self.mode,
        )?;
        self.append(self.mode.column_name(&format!("r_{period}")), values)
    }

    /// Accumulation/Distribution.  Flat bars yield NaN/inf, not an error.
    pub fn ad(&mut self) -> Result<&[f64]> {
        let values = ad::accumulation_distribution(
            self.table.column(HIGH)?,
            self.table.column(LOW)?,
            self.table.column(CLOSE)?,
            self.table.column(VOLUME)?,
            self.mode,
        );
        self.append(self.mode.column_name("ad"), values)
    }

    pub fn cci(&mut self, period: usize) -> Result<&[f64]> {
        let values = cci::cci(
            self.table.column(CLOSE)?,
            self.table.column(HIGH)?,
            self.table.column(LOW)?,
            period,
            self.mode,
        )?;
        self.append(self.mode.column_name(&format!("cci_{period}")), values)
    }

    /// Compute the standard feature set in its canonical order.
    pub fn compute_all(&mut self, periods: &IndicatorPeriods) -> Result<()> {
        self.make_up_down()?;
        self.sma(periods.sma)?;
        self.wma(periods.wma)?;
        self.momentum(periods.momentum)?;
        let k = self.stochastic_k(periods.stochastic_k)?;
        self.stochastic_d(k, periods.stochastic_d)?;
        self.rsi(periods.rsi)?;
        self.stochastic_r(periods.williams_r)?;
        self.ad()?;
        self.cci(periods.cci)?;

        info!(
            symbol = %self.table.symbol(),
            mode = %self.mode,
            rows = self.table.len(),
            columns = self.table.columns().len(),
            "indicator set computed"
        );
        Ok(())
    }

    fn append(&mut self, name: String, values: Vec<f64>) -> Result<&[f64]> {
        debug!(column = %name, mode = %self.mode, "indicator column appended");
        self.table.insert(name, values)
    }
}
