// anova.rs - One-way analysis of variance with method as the factor

use crate::stats::special::f_sf;
use serde::Serialize;

/// One line of the variance decomposition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaRow {
    pub sum_sq: f64,
    pub df: f64,
}

impl AnovaRow {
    pub fn mean_sq(&self) -> f64 {
        self.sum_sq / self.df
    }
}

/// Variance decomposition of a single categorical factor.
/// With one factor, Type II sums of squares equal the sequential ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaTable {
    pub factor: AnovaRow,
    pub residual: AnovaRow,
    pub f_statistic: f64,
    pub p_value: f64,
}

/// Fit `value ~ C(group)`; empty groups are ignored
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<AnovaTable, String> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 {
        return Err(format!("ANOVA needs at least 2 non-empty groups, got {}", k));
    }
    if n <= k {
        return Err(format!("ANOVA needs more observations ({}) than groups ({})", n, k));
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let mean = group.iter().sum::<f64>() / group.len() as f64;
        ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    let factor = AnovaRow { sum_sq: ss_between, df: (k - 1) as f64 };
    let residual = AnovaRow { sum_sq: ss_within, df: (n - k) as f64 };

    let (f_statistic, p_value) = if ss_within > 0.0 {
        let f = factor.mean_sq() / residual.mean_sq();
        (f, f_sf(f, factor.df, residual.df))
    } else if ss_between > 0.0 {
        (f64::INFINITY, 0.0)
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(AnovaTable { factor, residual, f_statistic, p_value })
}
