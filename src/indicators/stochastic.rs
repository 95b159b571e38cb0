// =============================================================================
// Stochastic Oscillator (%K, %D) and Williams %R
// =============================================================================
//
// Channel over `period` rows, defined once at least 7 rows exist:
//   LL = rolling min(low),  HH = rolling max(high)
//
//   %K = 100 * (close - LL) / (HH - LL)
//   %D = rolling mean(%K, d_period), defined only once the window is full
//   %R = 100 * (HH - close) / (HH - LL)
//
// Undefined values (short history, or a flat channel where HH == LL) become 0
// in Raw mode.  Trend mode emits sign(diff(x)) with undefined diffs as 0.
//
// %D consumes the *unfilled* %K, so a zero-filled warm-up never leaks into
// the average.
// =============================================================================

use super::error::Result;
use super::rolling::{fill_nan, rolling_max, rolling_mean, rolling_min, trend_of};
use crate::types::IndicatorMode;

/// Rows required inside the channel window before LL/HH are defined.
pub const CHANNEL_MIN_PERIODS: usize = 7;

struct Channel {
    lowest_low: Vec<f64>,
    highest_high: Vec<f64>,
}

fn channel(highs: &[f64], lows: &[f64], period: usize) -> Result<Channel> {
    Ok(Channel {
        lowest_low: rolling_min(lows, period, CHANNEL_MIN_PERIODS)?,
        highest_high: rolling_max(highs, period, CHANNEL_MIN_PERIODS)?,
    })
}

/// Unfilled %K series; NaN wherever the channel is undefined or flat.
pub fn percent_k(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<Vec<f64>> {
    let ch = channel(highs, lows, period)?;
    Ok(closes
        .iter()
        .zip(ch.lowest_low.iter().zip(&ch.highest_high))
        .map(|(c, (ll, hh))| 100.0 * ((c - ll) / (hh - ll)))
        .collect())
}

/// Output column for a %K series.
pub fn k_column(k: &[f64], mode: IndicatorMode) -> Vec<f64> {
    match mode {
        IndicatorMode::Raw => fill_nan(k, 0.0),
        IndicatorMode::Trend => trend_of(k),
    }
}

/// %D from an unfilled %K series.
pub fn percent_d(k: &[f64], period: usize, mode: IndicatorMode) -> Result<Vec<f64>> {
    let smoothed = rolling_mean(k, period, period)?;
    Ok(match mode {
        IndicatorMode::Raw => fill_nan(&smoothed, 0.0),
        IndicatorMode::Trend => trend_of(&smoothed),
    })
}

/// Larry Williams' %R.
pub fn williams_r(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    mode: IndicatorMode,
) -> Result<Vec<f64>> {
    let ch = channel(highs, lows, period)?;
    let rows = closes
        .iter()
        .zip(ch.lowest_low.iter().zip(&ch.highest_high));

    Ok(match mode {
        IndicatorMode::Raw => {
            let r: Vec<f64> = rows.map(|(c, (ll, hh))| 100.0 * (hh - c) / (hh - ll)).collect();
            fill_nan(&r, 0.0)
        }
        IndicatorMode::Trend => {
            let ratio: Vec<f64> = rows.map(|(c, (ll, hh))| (hh - c) / (hh - ll)).collect();
            trend_of(&ratio)
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::error::EngineError;

    struct Bars {
        highs: Vec<f64>,
        lows: Vec<f64>,
        closes: Vec<f64>,
    }

    /// Rising channel, close one below the high until the last row dips.
    fn bars() -> Bars {
        let highs: Vec<f64> = (10..18).map(|h| h as f64).collect();
        let lows = highs.iter().map(|h| h - 2.0).collect();
        let closes = vec![9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 14.0];
        Bars { highs, lows, closes }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-10, "got {actual:?}, expected {expected:?}");
        }
    }

    #[test]
    fn k_undefined_until_seven_rows() {
        let b = bars();
        let k = percent_k(&b.highs, &b.lows, &b.closes, 14).unwrap();
        assert!(k[..6].iter().all(|v| v.is_nan()));
        assert!((k[6] - 87.5).abs() < 1e-10);
        // row 7 window still starts at row 0: LL 8, HH 17
        assert!((k[7] - 200.0 / 3.0).abs() < 1e-10);

        assert_close(
            &k_column(&k, IndicatorMode::Raw),
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 87.5, 200.0 / 3.0],
        );
        assert_close(
            &k_column(&k, IndicatorMode::Trend),
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
        );
    }

    #[test]
    fn k_window_slides_with_period() {
        let b = bars();
        let k = percent_k(&b.highs, &b.lows, &b.closes, 7).unwrap();
        // row 7 window is rows 1..=7: LL 9, HH 17
        assert!((k[7] - 62.5).abs() < 1e-10);
    }

    #[test]
    fn k_flat_channel_fills_to_zero() {
        let flat = vec![5.0; 10];
        let k = percent_k(&flat, &flat, &flat, 14).unwrap();
        assert!(k.iter().all(|v| v.is_nan()));
        assert_eq!(k_column(&k, IndicatorMode::Raw), vec![0.0; 10]);
    }

    #[test]
    fn k_stays_within_bounds() {
        let highs: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.9).sin() * 5.0 + 1.0).collect();
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let closes: Vec<f64> = highs.iter().enumerate().map(|(i, h)| h - 1.0 - (i as f64).cos()).collect();
        let k = k_column(&percent_k(&highs, &lows, &closes, 14).unwrap(), IndicatorMode::Raw);
        assert!(k.iter().all(|v| (0.0..=100.0).contains(v)), "{k:?}");
    }

    #[test]
    fn short_period_cannot_satisfy_min_periods() {
        let b = bars();
        assert_eq!(
            percent_k(&b.highs, &b.lows, &b.closes, 5),
            Err(EngineError::InvalidWindow {
                window: 5,
                min_periods: 7
            })
        );
    }

    #[test]
    fn d_needs_a_full_window() {
        let k = [f64::NAN, 10.0, 20.0, 30.0, 40.0];
        assert_close(
            &percent_d(&k, 2, IndicatorMode::Raw).unwrap(),
            &[0.0, 0.0, 15.0, 25.0, 35.0],
        );
        assert_close(
            &percent_d(&k, 2, IndicatorMode::Trend).unwrap(),
            &[0.0, 0.0, 0.0, 1.0, 1.0],
        );
    }

    #[test]
    fn williams_r_mirrors_k() {
        let b = bars();
        let r = williams_r(&b.highs, &b.lows, &b.closes, 14, IndicatorMode::Raw).unwrap();
        assert_close(&r, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 12.5, 100.0 / 3.0]);

        let td = williams_r(&b.highs, &b.lows, &b.closes, 14, IndicatorMode::Trend).unwrap();
        assert_close(&td, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }
}
