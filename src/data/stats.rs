//! Scalar summaries, pairwise correlation and histogram binning.

use super::aggregate::distinct_count;
use super::model::{CarSale, CategoryColumn, NumericColumn};

/// Bin count used by the sales distribution chart.
pub const HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// The four headline numbers shown under the charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    /// NaN when the subset is empty.
    pub mean_sales: f64,
    pub total_sales: f64,
    pub distinct_models: usize,
    pub distinct_manufacturers: usize,
}

impl SummaryMetrics {
    pub fn compute(subset: &[&CarSale]) -> Self {
        let total_sales = subset
            .iter()
            .fold(0.0, |acc, s| acc + s.sales_in_thousands);
        let mean_sales = if subset.is_empty() {
            f64::NAN
        } else {
            total_sales / subset.len() as f64
        };
        Self {
            mean_sales,
            total_sales,
            distinct_models: distinct_count(subset, CategoryColumn::Model),
            distinct_manufacturers: distinct_count(subset, CategoryColumn::Manufacturer),
        }
    }
}

/// Round to two decimals for display; NaN renders as "n/a".
pub fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Symmetric 2×2 Pearson correlation matrix between two numeric columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: [NumericColumn; 2],
    pub values: [[f64; 2]; 2],
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Off-diagonal coefficient.
    pub fn coefficient(&self) -> f64 {
        self.values[0][1]
    }
}

/// Pairwise-complete Pearson correlation between `col_a` and `col_b`.
///
/// Each cell uses only the records where both of its columns are present, so
/// a record with an unparsable launch date still counts towards the sales
/// diagonal. Cells with fewer than two observations or zero variance are NaN.
pub fn correlate(
    subset: &[&CarSale],
    col_a: NumericColumn,
    col_b: NumericColumn,
) -> CorrelationMatrix {
    let columns = [col_a, col_b];
    let mut values = [[f64::NAN; 2]; 2];

    for i in 0..2 {
        for j in i..2 {
            let pairs: Vec<(f64, f64)> = subset
                .iter()
                .filter_map(|sale| Some((columns[i].value(sale)?, columns[j].value(sale)?)))
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

/// Pearson coefficient of complete pairs, clamped to [-1, 1].
fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 {
        f64::NAN
    } else {
        (sxy / divisor).clamp(-1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// `bins` equal-width bins spanning the data. The last bin is closed.
    ///
    /// When every value is equal the range is widened to `[v - 0.5, v + 0.5]`.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self::default();
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| HistogramBin {
                    start: lo + width * i as f64,
                    end: lo + width * (i + 1) as f64,
                    count,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
