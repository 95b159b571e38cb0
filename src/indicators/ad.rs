// =============================================================================
// Accumulation / Distribution (A/D)
// =============================================================================
//
//   MFM = (2*close - high - low) / (high - low)      money-flow multiplier
//   MFV = volume * MFM                               money-flow volume
//   A/D = running sum of MFV
//
// A bar with high == low divides by zero.  That is not guarded: the row
// carries NaN (or ±inf when close sits off the bar) and consumers must cope.
// The running sum skips NaN rows; an infinity poisons every later row.
//
// Trend: sign(diff(A/D)) with undefined diffs as 0.
// =============================================================================

use super::rolling::{cumsum, trend_of};
use crate::types::IndicatorMode;

pub fn accumulation_distribution(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    mode: IndicatorMode,
) -> Vec<f64> {
    let mfv: Vec<f64> = closes
        .iter()
        .zip(highs.iter().zip(lows))
        .zip(volumes)
        .map(|((c, (h, l)), v)| v * ((2.0 * c - h - l) / (h - l)))
        .collect();

    let ad = cumsum(&mfv);
    match mode {
        IndicatorMode::Raw => ad,
        IndicatorMode::Trend => trend_of(&ad),
    }
}
