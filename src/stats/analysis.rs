// analysis.rs - The full statistical battery over an assembled dataset

use crate::core::Method;
use crate::data::{Column, Dataset};
use crate::stats::anova::{one_way_anova, AnovaTable};
use crate::stats::correlation::{correlation_matrix, CorrelationMatrix, CorrelationMethod};
use crate::stats::kruskal::kruskal_wallis;
use crate::stats::normality::NormalityTest;
use crate::stats::pairwise::{pairwise_significance, PairwiseColumns, PairwiseReport, DEFAULT_ALPHA};
use crate::stats::summary::{central_tendency, summarize, CentralTendency, MethodSummary};
use crate::stats::tally::{best_method_tally, TallyReport, DEFAULT_TALLY_EXCLUSION};
use crate::stats::TestResult;
use rayon::prelude::*;
use serde::Serialize;

/// Choices that shape the battery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub normality: NormalityTest,
    pub correlation: CorrelationMethod,
    pub alpha: f64,
    pub pairwise_columns: PairwiseColumns,
    pub tally_exclusion: Method,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            normality: NormalityTest::default(),
            correlation: CorrelationMethod::default(),
            alpha: DEFAULT_ALPHA,
            pairwise_columns: PairwiseColumns::default(),
            tally_exclusion: DEFAULT_TALLY_EXCLUSION,
        }
    }
}

/// Outcome of one test on one metric column. Tests that are undefined
/// for the data at hand carry the reason instead of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTest<T> {
    pub metric: Column,
    pub outcome: Result<T, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub rows: usize,
    pub summary: Vec<MethodSummary>,
    pub normality_test: NormalityTest,
    pub normality: Vec<MetricTest<TestResult>>,
    pub anova: Vec<MetricTest<AnovaTable>>,
    pub kruskal: Vec<MetricTest<TestResult>>,
    pub pairwise: PairwiseReport,
    pub tally: TallyReport,
    pub central_tendency: Vec<CentralTendency>,
    pub correlation: CorrelationMatrix,
}

fn per_metric<T, F>(test: F) -> Vec<MetricTest<T>>
where
    T: Send,
    F: Fn(Column) -> Result<T, String> + Sync,
{
    Column::COMPARED
        .par_iter()
        .map(|&metric| MetricTest {
            metric,
            outcome: test(metric),
        })
        .collect()
}

fn method_groups(dataset: &Dataset, column: Column) -> Vec<Vec<f64>> {
    dataset.column_by_method(column).into_values().collect()
}

/// Run every analysis. The dataset is only read.
pub fn run_analysis(dataset: &Dataset, options: &AnalysisOptions) -> AnalysisReport {
    println!("🔍 Analyzing {} rows ({} methods)", dataset.len(), dataset.methods().len());

    let normality = per_metric(|metric| options.normality.run(&dataset.column(metric)));
    let anova = per_metric(|metric| one_way_anova(&method_groups(dataset, metric)));
    let kruskal = per_metric(|metric| kruskal_wallis(&method_groups(dataset, metric)));
    let pairwise = pairwise_significance(dataset, options.alpha, options.pairwise_columns);
    let tally = best_method_tally(dataset, options.tally_exclusion);

    let report = AnalysisReport {
        rows: dataset.len(),
        summary: summarize(dataset),
        normality_test: options.normality,
        normality,
        anova,
        kruskal,
        pairwise,
        tally,
        central_tendency: central_tendency(dataset),
        correlation: correlation_matrix(dataset, options.correlation),
    };

    println!(
        "✅ Analysis complete: {} significant and {} non significant method pairs",
        report.pairwise.significant.len(),
        report.pairwise.not_significant.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::QualityScores;
    use crate::data::record::{CanonicalRecord, Measurement};
    use crate::data::SampleDescription;

    fn dataset() -> Dataset {
        let samples: Vec<SampleDescription> = (0..5)
            .map(|i| SampleDescription::new(&format!("S{}", i), "n", "g", "s", "A"))
            .collect();
        let mut sources = Vec::new();
        for (k, method) in [Method::Mda, Method::Theseus, Method::Mmligner].into_iter().enumerate() {
            let mut records = Vec::new();
            for i in 0..samples.len() {
                for j in i + 1..samples.len() {
                    let rmsd = 1.0 + k as f64 + (i * 5 + j) as f64 / 50.0;
                    let meas = Measurement { rmsd, coverage: 100, reference_size: 120, mobile_size: 110, time: 0.5 };
                    let scores = QualityScores::compute(rmsd, 100, 120, 110, 1.5);
                    records.push(CanonicalRecord::measured(method, &samples[i], &samples[j], meas, scores));
                }
            }
            sources.push(records);
        }
        Dataset::assemble(sources)
    }

    #[test]
    fn test_full_battery() {
        let dataset = dataset();
        let report = run_analysis(&dataset, &AnalysisOptions::default());

        assert_eq!(report.rows, 30);
        assert_eq!(report.summary.len(), 3);
        let metrics: Vec<Column> = report.anova.iter().map(|t| t.metric).collect();
        assert_eq!(metrics, Column::COMPARED.to_vec());

        // the methods are shifted by whole units, so they separate clearly
        for test in &report.kruskal {
            assert!(test.outcome.as_ref().unwrap().p_value < 0.001);
        }
        for test in &report.anova {
            assert!(test.outcome.as_ref().unwrap().p_value < 0.001);
        }
        assert_eq!(report.pairwise.significant.len(), 4 * 3);
        assert_eq!(report.normality.len(), 4);

        // mda always has the lowest values
        let si = &report.tally.all_methods[0];
        assert_eq!(si.counts.get(&Method::Mda), Some(&10));
        assert_eq!(si.counts.len(), 1);
    }

    #[test]
    fn test_undefined_tests_are_reported() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let dataset = Dataset::assemble(vec![vec![CanonicalRecord::failed(Method::Mda, &r, &r)]]);
        let options = AnalysisOptions {
            normality: NormalityTest::ShapiroWilk,
            ..Default::default()
        };
        let report = run_analysis(&dataset, &options);
        assert!(report.normality.iter().all(|t| t.outcome.is_err()));
        assert!(report.kruskal.iter().all(|t| t.outcome.is_err()));
        assert!(report.tally.all_methods.iter().all(|t| t.counts.is_empty()));
    }
}
