// pairwise.rs - Pairwise method comparisons with the Mann-Whitney U test

use crate::core::Method;
use crate::data::{Column, Dataset};
use crate::stats::mann_whitney::mann_whitney_u;
use crate::stats::TestResult;
use serde::{Deserialize, Serialize};

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Which column is compared for each metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairwiseColumns {
    /// Compare the column named by the metric label
    #[default]
    Labelled,
    /// Compare rmsd under every label (earlier reports were produced this way)
    AlwaysRmsd,
}

impl PairwiseColumns {
    pub fn compared(&self, metric: Column) -> Column {
        match self {
            PairwiseColumns::Labelled => metric,
            PairwiseColumns::AlwaysRmsd => Column::Rmsd,
        }
    }
}

/// One method pair under one metric label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub metric: Column,
    pub first: Method,
    pub second: Method,
    /// Column whose values were actually tested
    pub compared: Column,
    pub result: TestResult,
}

/// A pair that could not be tested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedComparison {
    pub metric: Column,
    pub first: Method,
    pub second: Method,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairwiseReport {
    pub alpha: f64,
    pub significant: Vec<PairwiseComparison>,
    pub not_significant: Vec<PairwiseComparison>,
    pub skipped: Vec<SkippedComparison>,
}

/// Test every unordered method pair (in method order) for every compared metric
pub fn pairwise_significance(dataset: &Dataset, alpha: f64, columns: PairwiseColumns) -> PairwiseReport {
    let mut report = PairwiseReport {
        alpha,
        ..Default::default()
    };

    for metric in Column::COMPARED {
        let compared = columns.compared(metric);
        let by_method = dataset.column_by_method(compared);
        let empty = Vec::new();

        for (i, &first) in Method::ALL.iter().enumerate() {
            for &second in &Method::ALL[i + 1..] {
                let x = by_method.get(&first).unwrap_or(&empty);
                let y = by_method.get(&second).unwrap_or(&empty);
                match mann_whitney_u(x, y) {
                    Ok(result) => {
                        let comparison = PairwiseComparison { metric, first, second, compared, result };
                        if result.p_value < alpha {
                            report.significant.push(comparison);
                        } else {
                            report.not_significant.push(comparison);
                        }
                    }
                    Err(reason) => report.skipped.push(SkippedComparison { metric, first, second, reason }),
                }
            }
        }
    }

    report
}
