// =============================================================================
// Relative Strength Index (RSI), simple-average variant
// =============================================================================
//
// Step 1: deltas from consecutive closes (row 0 has none and counts as 0).
// Step 2: average gain / average loss as rolling means over `period` rows
//         with min_periods = 1 (no Wilder smoothing).
// Step 3: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// Raw: RSI with undefined rows (0/0) as 0.  Only-gain windows give RS = inf
// and therefore RSI = 100.
//
// Trend, per row:
//   RSI <= 30        =>  1  (oversold, expect a bounce)
//   RSI >= 70        => -1  (overbought)
//   otherwise           rising vs previous row => -1, falling => 1, equal => 0
//   row 0            =>  1
// A comparison that involves an undefined RSI yields 0.
// =============================================================================

use super::error::Result;
use super::rolling::{band_signal, diff, fill_nan, rolling_mean};
use crate::types::IndicatorMode;

pub const OVERSOLD: f64 = 30.0;
pub const OVERBOUGHT: f64 = 70.0;

pub fn rsi(closes: &[f64], period: usize, mode: IndicatorMode) -> Result<Vec<f64>> {
    let deltas = diff(closes);
    let gains: Vec<f64> = deltas.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).collect();
    let losses: Vec<f64> = deltas.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).collect();

    let avg_gain = rolling_mean(&gains, period, 1)?;
    let avg_loss = rolling_mean(&losses, period, 1)?;

    let values: Vec<f64> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| 100.0 - 100.0 / (1.0 + g / l))
        .collect();

    Ok(match mode {
        IndicatorMode::Raw => fill_nan(&values, 0.0),
        IndicatorMode::Trend => band_signal(&values, OVERSOLD, OVERBOUGHT),
    })
}
