// =============================================================================
// Rolling-window and element-wise primitives
// =============================================================================
//
// Every indicator column is assembled from these helpers.  All of them return
// a vector with exactly one element per input row.
//
// Window policy:
//   - trailing window [i - window + 1, i], clipped at row 0
//   - NaN inputs are skipped, not counted
//   - the output is NaN while fewer than `min_periods` values are available
// =============================================================================

use super::error::{EngineError, Result};

/// Reject windows that can never be satisfied.
pub fn check_window(window: usize, min_periods: usize) -> Result<()> {
    if window == 0 || min_periods > window {
        return Err(EngineError::InvalidWindow {
            window,
            min_periods,
        });
    }
    Ok(())
}

/// Apply `reduce` to the non-NaN values of every trailing window.
fn rolling_by<F>(values: &[f64], window: usize, min_periods: usize, reduce: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    check_window(window, min_periods)?;

    let mut present: Vec<f64> = Vec::with_capacity(window);
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        present.clear();
        present.extend(values[start..=i].iter().copied().filter(|v| !v.is_nan()));

        if present.len() < min_periods.max(1) {
            out.push(f64::NAN);
        } else {
            out.push(reduce(&present));
        }
    }
    Ok(out)
}

/// Trailing arithmetic mean.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Result<Vec<f64>> {
    rolling_by(values, window, min_periods, |w| {
        w.iter().sum::<f64>() / w.len() as f64
    })
}

/// Trailing minimum.
pub fn rolling_min(values: &[f64], window: usize, min_periods: usize) -> Result<Vec<f64>> {
    rolling_by(values, window, min_periods, |w| {
        w.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Trailing maximum.
pub fn rolling_max(values: &[f64], window: usize, min_periods: usize) -> Result<Vec<f64>> {
    rolling_by(values, window, min_periods, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// First difference; row 0 has no predecessor and is NaN.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Ternary sign.  NaN stays NaN, both zeros map to 0.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

pub fn sign_all(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(sign).collect()
}

/// Replace NaN with `fill`.  Infinities are left untouched.
pub fn fill_nan(values: &[f64], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v.is_nan() { fill } else { v })
        .collect()
}

/// `sign(diff(values))` with the undefined diffs treated as flat.
pub fn trend_of(values: &[f64]) -> Vec<f64> {
    sign_all(&fill_nan(&diff(values), 0.0))
}

/// Running total that skips NaN inputs.  A NaN input is reported as NaN at its
/// own row while the total carries on from the last defined value.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else {
                total += v;
                total
            }
        })
        .collect()
}

/// Contrarian oscillator signal.
///
/// At or below `lower` => 1, at or above `upper` => -1.  Inside the band the
/// signal leans against the slope: rising => -1, falling => 1, equal => 0.
/// Row 0 inside the band is 1; any comparison with NaN yields 0.
pub fn band_signal(values: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if v <= lower {
                1.0
            } else if v >= upper {
                -1.0
            } else if i == 0 {
                1.0
            } else {
                let prev = values[i - 1];
                if v > prev {
                    -1.0
                } else if v < prev {
                    1.0
                } else {
                    0.0
                }
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            if e.is_nan() {
                assert!(a.is_nan(), "row {i}: expected NaN, got {a}");
            } else {
                assert!((a - e).abs() < 1e-10, "row {i}: expected {e}, got {a}");
            }
        }
    }

    #[test]
    fn mean_with_min_periods_one_grows_into_window() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 1).unwrap();
        assert_close(&out, &[1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn mean_with_full_min_periods_is_nan_until_window_fills() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 3).unwrap();
        assert_close(&out, &[f64::NAN, f64::NAN, 2.0, 3.0]);
    }

    #[test]
    fn mean_skips_nan_but_counts_them_against_min_periods() {
        let out = rolling_mean(&[f64::NAN, 2.0, 4.0, 6.0], 2, 2).unwrap();
        assert_close(&out, &[f64::NAN, f64::NAN, 3.0, 5.0]);

        let out = rolling_mean(&[f64::NAN, 2.0, 4.0], 2, 1).unwrap();
        assert_close(&out, &[f64::NAN, 2.0, 3.0]);
    }

    #[test]
    fn min_and_max_respect_min_periods() {
        let values = [5.0, 3.0, 8.0, 1.0, 9.0];
        assert_close(
            &rolling_min(&values, 3, 2).unwrap(),
            &[f64::NAN, 3.0, 3.0, 1.0, 1.0],
        );
        assert_close(
            &rolling_max(&values, 3, 2).unwrap(),
            &[f64::NAN, 5.0, 8.0, 8.0, 9.0],
        );
    }

    #[test]
    fn invalid_windows_are_rejected() {
        assert_eq!(
            rolling_mean(&[1.0], 0, 0),
            Err(EngineError::InvalidWindow {
                window: 0,
                min_periods: 0
            })
        );
        assert!(rolling_min(&[1.0], 5, 7).is_err());
        assert!(check_window(7, 7).is_ok());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(rolling_mean(&[], 3, 1).unwrap().is_empty());
        assert!(diff(&[]).is_empty());
        assert!(cumsum(&[]).is_empty());
    }

    #[test]
    fn diff_leaves_first_row_undefined() {
        assert_close(&diff(&[1.0, 4.0, 2.0]), &[f64::NAN, 3.0, -2.0]);
    }

    #[test]
    fn sign_is_ternary_and_keeps_nan() {
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0).to_bits(), 0.0_f64.to_bits());
        assert!(sign(f64::NAN).is_nan());
        assert_eq!(sign(f64::INFINITY), 1.0);
    }

    #[test]
    fn fill_nan_leaves_infinities() {
        let out = fill_nan(&[f64::NAN, f64::INFINITY, 2.0], 0.0);
        assert_eq!(out[0], 0.0);
        assert!(out[1].is_infinite());
        assert_eq!(out[2], 2.0);
    }

    #[test]
    fn trend_of_starts_flat() {
        assert_close(&trend_of(&[3.0, 5.0, 5.0, 1.0]), &[0.0, 1.0, 0.0, -1.0]);
        assert_close(&trend_of(&[f64::NAN, 1.0, 2.0]), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn band_signal_thresholds_then_slope() {
        let values = [f64::NAN, 250.0, -250.0, 100.0, 150.0, 150.0, f64::NAN];
        assert_eq!(
            band_signal(&values, -200.0, 200.0),
            vec![1.0, -1.0, 1.0, -1.0, -1.0, 0.0, 0.0]
        );
        // thresholds win over the first-row default
        assert_eq!(band_signal(&[80.0], 30.0, 70.0), vec![-1.0]);
        assert_eq!(band_signal(&[30.0], 30.0, 70.0), vec![1.0]);
    }

    #[test]
    fn cumsum_skips_nan_rows() {
        assert_close(
            &cumsum(&[1.0, f64::NAN, 2.0, 3.0]),
            &[1.0, f64::NAN, 3.0, 6.0],
        );
    }
}
