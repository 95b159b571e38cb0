// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   TP  = (close + high + low) / 3
//   SMA = rolling mean(TP, period), min_periods = 1
//   dev = |TP - SMA|
//   MAD = mean of dev over the fixed 21-row centred window [i-10, i+10]
//         for 10 <= i <= len-10, else dev[i] itself
//   CCI = (TP - SMA) / (0.015 * MAD)
//
// The MAD window is 21 rows regardless of `period`.  At i == len-10 the window
// runs past the end of the series; the 20 available rows are still divided by
// 21.  Both quirks are kept so that stored features remain reproducible.
//
// MAD == 0 is not guarded (row 0 is always 0/0 = NaN), and Raw output is left
// unfilled.
//
// Trend: CCI >= 200 => -1, CCI <= -200 => 1, otherwise contrarian slope
// (see `band_signal`).
// =============================================================================

use super::error::Result;
use super::rolling::{band_signal, rolling_mean};
use crate::types::IndicatorMode;

pub const MAD_HALF_WIDTH: usize = 10;
pub const MAD_DIVISOR: f64 = 21.0;
pub const LAMBERT_CONSTANT: f64 = 0.015;
pub const OVERBOUGHT: f64 = 200.0;
pub const OVERSOLD: f64 = -200.0;

pub fn cci(
    closes: &[f64],
    highs: &[f64],
    lows: &[f64],
    period: usize,
    mode: IndicatorMode,
) -> Result<Vec<f64>> {
    let typical: Vec<f64> = closes
        .iter()
        .zip(highs.iter().zip(lows))
        .map(|(c, (h, l))| (c + h + l) / 3.0)
        .collect();
    let sma = rolling_mean(&typical, period, 1)?;
    let dev: Vec<f64> = typical.iter().zip(&sma).map(|(tp, m)| (tp - m).abs()).collect();

    let len = dev.len();
    let values: Vec<f64> = (0..len)
        .map(|i| {
            let mad = if i >= MAD_HALF_WIDTH && i + MAD_HALF_WIDTH <= len {
                let end = (i + MAD_HALF_WIDTH + 1).min(len);
                dev[i - MAD_HALF_WIDTH..end].iter().sum::<f64>() / MAD_DIVISOR
            } else {
                dev[i]
            };
            (typical[i] - sma[i]) / (LAMBERT_CONSTANT * mad)
        })
        .collect();

    Ok(match mode {
        IndicatorMode::Raw => values,
        IndicatorMode::Trend => band_signal(&values, OVERSOLD, OVERBOUGHT),
    })
}
