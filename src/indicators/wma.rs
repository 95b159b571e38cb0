// =============================================================================
// Weighted Moving Average (WMA), legacy definition
// =============================================================================
//
// This is NOT a textbook ascending-weight WMA.  Models downstream were trained
// on this exact definition, so it is reproduced as-is:
//
//   denom = n(n+1)/2
//   n < i < len-n  : value = close[i]                       (pass-through)
//   otherwise      : value = sum(close[i-n .. i]) / denom
//
// The boundary slice uses wrap-around indexing for a negative start: the start
// becomes len + (i-n), clamped to 0, and an empty slice sums to 0.  On any
// series longer than `n` the rows 0..n therefore come out as 0.
//
// Trend: sign of successive differences, with an implicit 0 before row 0.
// =============================================================================

use super::error::{EngineError, Result};
use super::rolling::sign;
use crate::types::IndicatorMode;

pub fn wma(closes: &[f64], n: usize, mode: IndicatorMode) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(EngineError::InvalidWindow {
            window: 0,
            min_periods: 1,
        });
    }

    let len = closes.len();
    let denom = (n * (n + 1)) as f64 / 2.0;

    let means: Vec<f64> = (0..len)
        .map(|i| {
            if n < i && i + n < len {
                closes[i]
            } else {
                boundary_slice(closes, i, n).iter().sum::<f64>() / denom
            }
        })
        .collect();

    Ok(match mode {
        IndicatorMode::Raw => means,
        IndicatorMode::Trend => {
            let mut prev = 0.0;
            means
                .iter()
                .map(|&m| {
                    let s = sign(m - prev);
                    prev = m;
                    s
                })
                .collect()
        }
    })
}

/// `close[i-n .. i]` with wrap-around for a negative start.
fn boundary_slice(closes: &[f64], i: usize, n: usize) -> &[f64] {
    let start = if i >= n {
        i - n
    } else {
        // i - n < 0: wraps to len + i - n, floored at 0.
        (closes.len() + i).saturating_sub(n)
    };
    if start >= i {
        &[]
    } else {
        &closes[start..i]
    }
}
