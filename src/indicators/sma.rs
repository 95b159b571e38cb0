// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Raw:   rolling mean of close over `n` rows (min_periods = 1, so the first
//        rows average whatever history exists).
// Trend: sign(close - SMA), i.e. +1 when price trades above its average.
// =============================================================================

use super::error::Result;
use super::rolling::{rolling_mean, sign};
use crate::types::IndicatorMode;

pub fn sma(closes: &[f64], n: usize, mode: IndicatorMode) -> Result<Vec<f64>> {
    let means = rolling_mean(closes, n, 1)?;
    Ok(match mode {
        IndicatorMode::Raw => means,
        IndicatorMode::Trend => closes
            .iter()
            .zip(&means)
            .map(|(c, m)| sign(c - m))
            .collect(),
    })
}
