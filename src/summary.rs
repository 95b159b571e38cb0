// =============================================================================
// Column Summaries: descriptive statistics for the finished table
// =============================================================================
//
// Numeric columns: counts, mean, sample std (ddof = 1), min / quartiles / max
// (linear interpolation), bias-corrected skewness and excess kurtosis.
// NaN counts as null; infinities are ordinary values.
//
// Label columns (period dates): counts plus the most frequent label, its
// frequency and its share of all rows.
// =============================================================================

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::indicators::IndicatorTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub top: Option<String>,
    pub top_freq: usize,
    pub top_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stats {
    Numeric(NumericSummary),
    Label(LabelSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub non_null: usize,
    pub null: usize,
    pub unique: usize,
    #[serde(flatten)]
    pub stats: Stats,
}

/// Summary of the date column followed by every numeric column.
pub fn summarize_table(table: &IndicatorTable) -> Vec<ColumnSummary> {
    let mut out = Vec::with_capacity(table.columns().len() + 1);
    out.push(summarize_labels("date", table.dates()));
    out.extend(
        table
            .columns()
            .iter()
            .map(|c| summarize_numeric(&c.name, &c.values)),
    );
    out
}

pub fn summarize_numeric(name: &str, values: &[f64]) -> ColumnSummary {
    let mut present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    present.sort_by(f64::total_cmp);

    let unique: HashSet<u64> = present
        .iter()
        // -0.0 and 0.0 are the same value
        .map(|v| if *v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() })
        .collect();

    let stats = NumericSummary {
        mean: mean(&present),
        std_dev: std_dev(&present),
        min: present.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&present, 0.25),
        median: quantile(&present, 0.5),
        q75: quantile(&present, 0.75),
        max: present.last().copied().unwrap_or(f64::NAN),
        skewness: skewness(&present),
        kurtosis: kurtosis(&present),
    };

    ColumnSummary {
        name: name.to_string(),
        non_null: present.len(),
        null: values.len() - present.len(),
        unique: unique.len(),
        stats: Stats::Numeric(stats),
    }
}

/// Empty labels count as null.
pub fn summarize_labels(name: &str, labels: &[String]) -> ColumnSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.iter().filter(|l| !l.is_empty()) {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    let non_null: usize = counts.values().sum();

    // Most frequent; ties go to the smallest label.
    let top = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(label, count)| (label.to_string(), *count));

    let stats = match top {
        Some((label, freq)) => LabelSummary {
            top: Some(label),
            top_freq: freq,
            top_pct: freq as f64 / labels.len() as f64 * 100.0,
        },
        None => LabelSummary {
            top: None,
            top_freq: 0,
            top_pct: f64::NAN,
        },
    };

    ColumnSummary {
        name: name.to_string(),
        non_null,
        null: labels.len() - non_null,
        unique: counts.len(),
        stats: Stats::Label(stats),
    }
}

// =============================================================================
// Moments (inputs are the non-NaN values)
// =============================================================================

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of (x - mean)^p.
fn central_sum(values: &[f64], p: i32) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(p)).sum()
}

fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    (central_sum(values, 2) / (n - 1) as f64).sqrt()
}

/// Linear interpolation between closest ranks; `sorted` must be ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Adjusted Fisher–Pearson skewness.
fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 3 {
        return f64::NAN;
    }
    let m2 = central_sum(values, 2) / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = central_sum(values, 3) / n;
    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Bias-corrected excess kurtosis.
fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 4 {
        return f64::NAN;
    }
    let s2 = central_sum(values, 2);
    if s2 == 0.0 {
        return 0.0;
    }
    let s4 = central_sum(values, 4);
    let numer = n * (n + 1.0) * (n - 1.0) * s4;
    let denom = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adj = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
    numer / denom - adj
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{PriceRecord, PriceSeries};

    fn numeric(summary: &ColumnSummary) -> &NumericSummary {
        match &summary.stats {
            Stats::Numeric(n) => n,
            Stats::Label(_) => panic!("expected numeric stats"),
        }
    }

    fn near(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn numeric_basic_statistics() {
        let s = summarize_numeric("x", &[1.0, 2.0, 3.0, 4.0, f64::NAN]);
        assert_eq!(s.non_null, 4);
        assert_eq!(s.null, 1);
        assert_eq!(s.unique, 4);

        let n = numeric(&s);
        assert!(near(n.mean, 2.5));
        assert!(near(n.std_dev, (5.0_f64 / 3.0).sqrt()));
        assert_eq!(n.min, 1.0);
        assert!(near(n.q25, 1.75));
        assert!(near(n.median, 2.5));
        assert!(near(n.q75, 3.25));
        assert_eq!(n.max, 4.0);
        assert!(near(n.skewness, 0.0));
        assert!(near(n.kurtosis, -1.2));
    }

    #[test]
    fn skewness_sign_follows_tail() {
        let right = summarize_numeric("r", &[1.0, 1.0, 1.0, 2.0, 10.0]);
        assert!(numeric(&right).skewness > 0.0);
        let left = summarize_numeric("l", &[-10.0, -2.0, -1.0, -1.0, -1.0]);
        assert!(numeric(&left).skewness < 0.0);
    }

    #[test]
    fn ternary_signal_column() {
        let s = summarize_numeric("sma_5_td", &[1.0, -1.0, 0.0, -0.0, 1.0]);
        assert_eq!(s.unique, 3);
        assert_eq!(numeric(&s).median, 0.0);
    }

    #[test]
    fn constant_and_tiny_columns() {
        let s = summarize_numeric("c", &[2.0; 5]);
        let n = numeric(&s);
        assert_eq!(n.std_dev, 0.0);
        assert_eq!(n.skewness, 0.0);
        assert_eq!(n.kurtosis, 0.0);

        let s = summarize_numeric("one", &[7.0]);
        let n = numeric(&s);
        assert_eq!(n.median, 7.0);
        assert!(n.std_dev.is_nan());
        assert!(n.skewness.is_nan());

        let s = summarize_numeric("empty", &[f64::NAN, f64::NAN]);
        assert_eq!(s.non_null, 0);
        assert_eq!(s.null, 2);
        assert!(numeric(&s).mean.is_nan());
    }

    #[test]
    fn labels_report_most_frequent() {
        let labels: Vec<String> = ["b", "a", "b", "", "a", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let s = summarize_labels("date", &labels);
        assert_eq!(s.non_null, 5);
        assert_eq!(s.null, 1);
        assert_eq!(s.unique, 3);
        match s.stats {
            Stats::Label(l) => {
                // a and b tie; the smaller label wins
                assert_eq!(l.top.as_deref(), Some("a"));
                assert_eq!(l.top_freq, 2);
                assert!(near(l.top_pct, 2.0 / 6.0 * 100.0));
            }
            Stats::Numeric(_) => panic!("expected label stats"),
        }
    }

    #[test]
    fn table_summary_covers_dates_and_columns() {
        let records = (1..=3)
            .map(|d| PriceRecord {
                date: format!("2024-02-0{d}"),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: d as f64,
                volume: 10.0,
            })
            .collect();
        let series = PriceSeries::new("S", records).unwrap();
        let table = IndicatorTable::from_series(&series);

        let summaries = summarize_table(&table);
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["date", "open", "high", "low", "close", "volume"]);
        assert_eq!(summaries[0].unique, 3);
        assert!(near(numeric(&summaries[4]).mean, 2.0));

        let json = serde_json::to_value(&summaries[4]).unwrap();
        assert_eq!(json["name"], "close");
        assert_eq!(json["non_null"], 3);
        assert!(json.get("median").is_some());
    }
}
