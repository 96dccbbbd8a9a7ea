//! Descriptive statistics over the numeric columns of valid rows.

use std::fmt::Write as _;

use crate::table::{NUMERIC_COLUMNS, ValidRow};

/// Summary of one numeric column. All fields except `count` are `None` when
/// the column has no values; `std` also needs at least two.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Computes statistics over `values`, ignoring NaN.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            q25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            q75: Some(quantile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

/// Linear-interpolated quantile of non-empty sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Statistics for each of [`NUMERIC_COLUMNS`], in column order.
pub fn describe(rows: &[ValidRow]) -> Vec<(&'static str, ColumnStats)> {
    NUMERIC_COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let stats = ColumnStats::from_values(rows.iter().filter_map(|row| row.values[idx]));
            (*column, stats)
        })
        .collect()
}

/// Renders [`describe`] output as a fixed-width table, one line per
/// statistic and one column per metric.
pub fn render_describe(stats: &[(&'static str, ColumnStats)]) -> String {
    let label_width = 6;
    let width = stats
        .iter()
        .map(|(column, _)| column.len())
        .max()
        .unwrap_or(0)
        .max(12);

    let mut out = String::new();
    let _ = write!(out, "{:<label_width$}", "");
    for (column, _) in stats {
        let _ = write!(out, " {column:>width$}");
    }
    out.push('\n');

    let lines: [(&str, fn(&ColumnStats) -> Option<f64>); 7] = [
        ("mean", |s: &ColumnStats| s.mean),
        ("std", |s: &ColumnStats| s.std),
        ("min", |s: &ColumnStats| s.min),
        ("25%", |s: &ColumnStats| s.q25),
        ("50%", |s: &ColumnStats| s.median),
        ("75%", |s: &ColumnStats| s.q75),
        ("max", |s: &ColumnStats| s.max),
    ];

    let _ = write!(out, "{:<label_width$}", "count");
    for (_, column_stats) in stats {
        let _ = write!(out, " {:>width$}", column_stats.count);
    }
    out.push('\n');

    for (label, pick) in lines {
        let _ = write!(out, "{label:<label_width$}");
        for (_, column_stats) in stats {
            match pick(column_stats) {
                Some(value) => {
                    let _ = write!(out, " {value:>width$.6}");
                }
                None => {
                    let _ = write!(out, " {:>width$}", "NaN");
                }
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(access: Option<f64>, area: Option<f64>) -> ValidRow {
        let mut values = [None; 7];
        values[0] = access;
        values[5] = area;
        ValidRow {
            filename: "r.out".into(),
            block_size: "64".into(),
            associativity: "8".into(),
            values,
        }
    }

    #[test]
    fn test_column_stats_quartiles_interpolate() {
        let stats = ColumnStats::from_values([4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.q25, Some(1.75));
        assert_eq!(stats.median, Some(2.5));
        assert_eq!(stats.q75, Some(3.25));
        assert_eq!(stats.max, Some(4.0));
        let std = stats.std.unwrap();
        assert!((std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = ColumnStats::from_values([2.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(stats.median, Some(2.0));
    }

    #[test]
    fn test_empty_column() {
        assert_eq!(
            ColumnStats::from_values(std::iter::empty()),
            ColumnStats::default()
        );
    }

    #[test]
    fn test_describe_skips_missing_cells() {
        let rows = vec![row(Some(1.0), None), row(Some(3.0), Some(0.5)), row(None, None)];
        let stats = describe(&rows);

        assert_eq!(stats.len(), NUMERIC_COLUMNS.len());
        assert_eq!(stats[0].0, "access_time");
        assert_eq!(stats[0].1.count, 2);
        assert_eq!(stats[0].1.mean, Some(2.0));
        assert_eq!(stats[5].0, "area_mm2");
        assert_eq!(stats[5].1.count, 1);
        assert_eq!(stats[1].1.count, 0);
    }

    #[test]
    fn test_render_describe_has_header_and_rows() {
        let rendered = render_describe(&describe(&[row(Some(1.0), Some(2.0))]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("access_time"));
        assert!(lines[0].contains("efficiency"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[2].contains("1.000000"));
        assert!(lines[3].contains("NaN"));
    }
}
