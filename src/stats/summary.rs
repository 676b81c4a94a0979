// summary.rs - Per-method counts, elapsed time and central tendency

use crate::core::metrics::{round2, round4};
use crate::core::Method;
use crate::data::{Column, Dataset, DatasetRow};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Row and missing-value counts of one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub method: Method,
    pub rows: usize,
    /// Non-missing values per numeric column
    pub non_missing: BTreeMap<Column, usize>,
    /// Rows whose SI is missing
    pub missing_si_rows: usize,
    /// Non-missing values per numeric column, over the rows whose SI is missing
    pub missing_si_columns: BTreeMap<Column, usize>,
    /// Total alignment time in minutes, rounded to 2 decimals
    pub total_minutes: f64,
}

/// Mean and median of every numeric column for one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralTendency {
    pub method: Method,
    pub means: BTreeMap<Column, Option<f64>>,
    pub medians: BTreeMap<Column, Option<f64>>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn count_present(rows: &[&DatasetRow]) -> BTreeMap<Column, usize> {
    Column::NUMERIC
        .iter()
        .map(|&column| (column, rows.iter().filter(|r| r.value(column).is_some()).count()))
        .collect()
}

/// Counts and elapsed time for every method present
pub fn summarize(dataset: &Dataset) -> Vec<MethodSummary> {
    dataset
        .by_method()
        .into_iter()
        .map(|(method, rows)| {
            let missing_si: Vec<_> = rows.iter().copied().filter(|r| r.value(Column::Si).is_none()).collect();
            let seconds: f64 = rows.iter().filter_map(|r| r.value(Column::Time)).sum();
            MethodSummary {
                method,
                rows: rows.len(),
                non_missing: count_present(&rows),
                missing_si_rows: missing_si.len(),
                missing_si_columns: count_present(&missing_si),
                total_minutes: round2(seconds / 60.0),
            }
        })
        .collect()
}

/// Per-method mean and median of every numeric column, rounded to 4 decimals
pub fn central_tendency(dataset: &Dataset) -> Vec<CentralTendency> {
    dataset
        .by_method()
        .into_iter()
        .map(|(method, rows)| {
            let mut means = BTreeMap::new();
            let mut medians = BTreeMap::new();
            for column in Column::NUMERIC {
                let values: Vec<f64> = rows.iter().filter_map(|r| r.value(column)).collect();
                means.insert(column, mean(&values).map(round4));
                medians.insert(column, median(&values).map(round4));
            }
            CentralTendency { method, means, medians }
        })
        .collect()
}
