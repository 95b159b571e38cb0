// =============================================================================
// Momentum and Up/Down Movement
// =============================================================================
//
// Momentum:  close[i] - close[i-n], where rows before the start of the series
//            count as 0 (shift with zero fill).  So the first `n` rows simply
//            echo the close.
// Trend:     ternary sign of the same difference.
//
// Movement:  sign(close[i] - close[i-1]), row 0 is 0.  Mode independent.
// =============================================================================

use super::rolling::{diff, fill_nan, sign, sign_all};
use crate::types::IndicatorMode;

pub fn momentum(closes: &[f64], n: usize, mode: IndicatorMode) -> Vec<f64> {
    let raw = closes.iter().enumerate().map(|(i, &c)| {
        let past = if i >= n { closes[i - n] } else { 0.0 };
        c - past
    });

    match mode {
        IndicatorMode::Raw => raw.collect(),
        IndicatorMode::Trend => raw
            .map(|d| match sign(d) {
                s if s.is_nan() => 0.0,
                s => s,
            })
            .collect(),
    }
}

pub fn movement(closes: &[f64]) -> Vec<f64> {
    sign_all(&fill_nan(&diff(closes), 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSES: [f64; 5] = [10.0, 12.0, 11.0, 15.0, 15.0];

    #[test]
    fn movement_scenario() {
        assert_eq!(movement(&CLOSES), vec![0.0, 1.0, -1.0, 1.0, 0.0]);
    }

    #[test]
    fn movement_first_row_is_flat() {
        assert_eq!(movement(&[42.0]), vec![0.0]);
        assert!(movement(&[]).is_empty());
    }

    #[test]
    fn momentum_zero_fills_missing_history() {
        assert_eq!(
            momentum(&CLOSES, 2, IndicatorMode::Raw),
            vec![10.0, 12.0, 1.0, 3.0, 4.0]
        );
    }

    #[test]
    fn momentum_exact_after_warmup() {
        let closes: Vec<f64> = (0..20).map(|i| (i as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        let out = momentum(&closes, 7, IndicatorMode::Raw);
        for i in 0..closes.len() {
            let expected = if i >= 7 { closes[i] - closes[i - 7] } else { closes[i] };
            assert_eq!(out[i], expected);
        }
    }

    #[test]
    fn momentum_trend_is_ternary() {
        assert_eq!(
            momentum(&CLOSES, 1, IndicatorMode::Trend),
            vec![1.0, 1.0, -1.0, 1.0, 0.0]
        );
        let out = momentum(&[f64::NAN, 1.0], 1, IndicatorMode::Trend);
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn momentum_zero_period_is_flat() {
        assert_eq!(momentum(&CLOSES, 0, IndicatorMode::Raw), vec![0.0; 5]);
    }
}
