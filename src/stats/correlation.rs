// correlation.rs - Pairwise-complete correlation matrix over the numeric columns

use crate::data::{Column, Dataset};
use crate::stats::ranks::rank_average;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    /// Kendall's tau-b
    Kendall,
}

impl CorrelationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
            CorrelationMethod::Kendall => "kendall",
        }
    }

    /// Correlation of two equally long samples, `None` when undefined
    pub fn correlate(&self, x: &[f64], y: &[f64]) -> Option<f64> {
        match self {
            CorrelationMethod::Pearson => pearson(x, y),
            CorrelationMethod::Spearman => pearson(&rank_average(x).ranks, &rank_average(y).ranks),
            CorrelationMethod::Kendall => kendall_tau_b(x, y),
        }
    }
}

impl Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            "kendall" => Ok(CorrelationMethod::Kendall),
            _ => Err(format!(
                "Unsupported correlation coefficient '{}'. Use: pearson, spearman, kendall",
                s
            )),
        }
    }
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut ties_x, mut ties_y) = (0i64, 0i64);
    for i in 0..n {
        for j in i + 1..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 && dy == 0.0 {
                continue;
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }
    let denominator = (((concordant + discordant + ties_x) * (concordant + discordant + ties_y)) as f64).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((concordant - discordant) as f64 / denominator)
}

/// Symmetric correlation matrix; `values[i][j]` correlates `columns[i]` with `columns[j]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub columns: Vec<Column>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

/// Correlate every pair of numeric columns over the rows where both are present
pub fn correlation_matrix(dataset: &Dataset, method: CorrelationMethod) -> CorrelationMatrix {
    let columns = Column::NUMERIC.to_vec();
    let k = columns.len();

    let cells: Vec<(usize, usize)> = (0..k).flat_map(|i| (i..k).map(move |j| (i, j))).collect();
    let computed: Vec<((usize, usize), Option<f64>)> = cells
        .par_iter()
        .map(|&(i, j)| {
            let (x, y): (Vec<f64>, Vec<f64>) = dataset
                .rows()
                .iter()
                .filter_map(|row| Some((row.value(columns[i])?, row.value(columns[j])?)))
                .unzip();
            ((i, j), method.correlate(&x, &y))
        })
        .collect();

    let mut values = vec![vec![None; k]; k];
    for ((i, j), value) in computed {
        values[i][j] = value;
        values[j][i] = value;
    }
    CorrelationMatrix { method, columns, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::QualityScores;
    use crate::core::Method;
    use crate::data::record::{CanonicalRecord, Measurement};
    use crate::data::SampleDescription;

    #[test]
    fn test_coefficients() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);

        // monotone but not linear
        let cubes: Vec<f64> = x.iter().map(|v| v * v * v).collect();
        assert!(pearson(&x, &cubes).unwrap() < 1.0);
        assert_eq!(CorrelationMethod::Spearman.correlate(&x, &cubes), Some(1.0));
        assert_eq!(kendall_tau_b(&x, &[5.0, 4.0, 3.0, 2.0, 1.0]), Some(-1.0));

        // tau-b with ties: 4 concordant, 0 discordant, 1 tie in y, 1 joint tie
        let tau = kendall_tau_b(&[1.0, 1.0, 2.0, 3.0], &[1.0, 1.0, 2.0, 2.0]).unwrap();
        assert!((tau - 4.0 / (5.0f64 * 4.0).sqrt()).abs() < 1e-12);

        assert_eq!(pearson(&[1.0, 1.0], &[2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_names() {
        assert_eq!("kendall".parse::<CorrelationMethod>().unwrap(), CorrelationMethod::Kendall);
        assert!("cosine".parse::<CorrelationMethod>().unwrap_err().contains("cosine"));
    }

    #[test]
    fn test_matrix_uses_complete_pairs() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let m = SampleDescription::new("2BBB", "b", "g", "s", "B");
        let mut records: Vec<CanonicalRecord> = (1..=5u64)
            .map(|i| {
                let rmsd = i as f64;
                let meas = Measurement { rmsd, coverage: 100, reference_size: 100, mobile_size: 100, time: 2.0 * rmsd };
                CanonicalRecord::measured(Method::Mda, &r, &m, meas, QualityScores::compute(rmsd, 100, 100, 100, 1.5))
            })
            .collect();
        records.push(CanonicalRecord::failed(Method::Mda, &r, &m));
        let dataset = Dataset::assemble(vec![records]);

        let matrix = correlation_matrix(&dataset, CorrelationMethod::Pearson);
        assert_eq!(matrix.columns.len(), 9);
        assert!((matrix.get(Column::Rmsd, Column::Time).unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get(Column::Time, Column::Sas).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get(Column::Rmsd, Column::Time), matrix.get(Column::Time, Column::Rmsd));
        // constant column
        assert_eq!(matrix.get(Column::Coverage, Column::Rmsd), None);
    }
}
