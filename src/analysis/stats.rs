use std::cmp::Ordering;

use crate::need::{CountyNeed, NeedCategory};

/// Descriptive statistics of the need index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl NeedSummary {
    /// Summary over all counties, or None if there are none.
    pub fn of(needs: &[CountyNeed]) -> Option<Self> {
        if needs.is_empty() { return None }

        let mut values = needs.iter().map(|n| n.need_index).collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);

        let n = values.len();
        let median = if n % 2 == 1 {
            values[n / 2]
        } else {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        };

        Some(Self {
            min: values[0],
            max: values[n - 1],
            mean: values.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

/// County count per category, largest first (ties keep category order).
/// Categories with no counties are included with a zero count.
pub fn category_counts(needs: &[CountyNeed]) -> Vec<(NeedCategory, usize)> {
    let mut counts = NeedCategory::ALL
        .map(|category| (category, needs.iter().filter(|n| n.category == category).count()))
        .to_vec();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` counties with the highest need index, highest first.
/// Ties keep input order.
pub fn top_n(needs: &[CountyNeed], n: usize) -> Vec<&CountyNeed> {
    let mut ranked = needs.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.need_index.partial_cmp(&a.need_index).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    #[inline] pub fn at(&self, x: f64) -> f64 { self.slope * x + self.intercept }
}

/// Ordinary least-squares fit; None for fewer than two points or constant x.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 { return None }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum::<f64>();
    let sxy = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum::<f64>();
    if sxx == 0.0 { return None }

    let slope = sxy / sxx;
    Some(LinearFit { slope, intercept: mean_y - slope * mean_x })
}
