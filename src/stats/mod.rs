// mod.rs - Statistical comparison of alignment methods

pub mod analysis;
pub mod anova;
pub mod correlation;
pub mod kruskal;
pub mod mann_whitney;
pub mod normality;
pub mod pairwise;
pub mod ranks;
pub mod special;
pub mod summary;
pub mod tally;

use serde::Serialize;

/// Statistic and p-value of a hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

pub use analysis::{run_analysis, AnalysisOptions, AnalysisReport, MetricTest};
pub use anova::{one_way_anova, AnovaTable};
pub use correlation::{correlation_matrix, CorrelationMatrix, CorrelationMethod};
pub use kruskal::kruskal_wallis;
pub use mann_whitney::mann_whitney_u;
pub use normality::NormalityTest;
pub use pairwise::{pairwise_significance, PairwiseColumns, PairwiseReport, DEFAULT_ALPHA};
pub use summary::{central_tendency, summarize, CentralTendency, MethodSummary};
pub use tally::{best_method_tally, TallyReport, DEFAULT_TALLY_EXCLUSION};
