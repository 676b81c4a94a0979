// dataset.rs - Assembly of canonical records from all sources into one dataset

use crate::core::metrics::round4;
use crate::core::Method;
use crate::data::loaders::csv::read_records_from_path;
use crate::data::record::CanonicalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

/// Numeric columns of the assembled dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "rmsd")]
    Rmsd,
    #[serde(rename = "coverage")]
    Coverage,
    #[serde(rename = "reference_size")]
    ReferenceSize,
    #[serde(rename = "mobile_size")]
    MobileSize,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "SI")]
    Si,
    #[serde(rename = "MI")]
    Mi,
    #[serde(rename = "SAS")]
    Sas,
    #[serde(rename = "rel_cov")]
    RelCov,
}

impl Column {
    pub const NUMERIC: [Column; 9] = [
        Column::Rmsd,
        Column::Coverage,
        Column::ReferenceSize,
        Column::MobileSize,
        Column::Time,
        Column::Si,
        Column::Mi,
        Column::Sas,
        Column::RelCov,
    ];

    /// Metrics compared across methods
    pub const COMPARED: [Column; 4] = [Column::Rmsd, Column::Si, Column::Mi, Column::Sas];

    /// Derived quality measures
    pub const QUALITY: [Column; 3] = [Column::Si, Column::Mi, Column::Sas];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Rmsd => "rmsd",
            Column::Coverage => "coverage",
            Column::ReferenceSize => "reference_size",
            Column::MobileSize => "mobile_size",
            Column::Time => "time",
            Column::Si => "SI",
            Column::Mi => "MI",
            Column::Sas => "SAS",
            Column::RelCov => "rel_cov",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A canonical record annotated with dataset-level columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRow {
    pub record: CanonicalRecord,
    pub rel_cov: Option<f64>,
}

impl DatasetRow {
    pub fn value(&self, column: Column) -> Option<f64> {
        let r = &self.record;
        let value = match column {
            Column::Rmsd => r.rmsd,
            Column::Coverage => r.coverage.map(|v| v as f64),
            Column::ReferenceSize => r.reference_size.map(|v| v as f64),
            Column::MobileSize => r.mobile_size.map(|v| v as f64),
            Column::Time => r.time,
            Column::Si => r.si,
            Column::Mi => r.mi,
            Column::Sas => r.sas,
            Column::RelCov => self.rel_cov,
        };
        value.filter(|v| !v.is_nan())
    }

    pub fn method(&self) -> Method {
        self.record.method
    }
}

/// All records of a benchmark, from every producer
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

/// coverage / min(reference_size, mobile_size), rounded to 4 decimals
pub fn relative_coverage(record: &CanonicalRecord) -> Option<f64> {
    let coverage = record.coverage?;
    let min_size = record.min_size()?;
    if min_size == 0 {
        return None;
    }
    Some(round4(coverage as f64 / min_size as f64))
}

impl Dataset {
    /// Concatenate the records of every source, then derive `rel_cov` over the merged set
    pub fn assemble<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<CanonicalRecord>>,
    {
        let records: Vec<CanonicalRecord> = sources.into_iter().flatten().collect();
        let rows = records
            .into_iter()
            .map(|record| DatasetRow {
                rel_cov: relative_coverage(&record),
                record,
            })
            .collect();
        Self { rows }
    }

    /// Load and assemble several canonical CSV files
    pub fn from_csv_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, String> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(read_records_from_path(path)?);
        }
        let dataset = Self::assemble(sources);
        println!(
            "📊 Dataset assembled: {} rows, {} methods",
            dataset.len(),
            dataset.methods().len()
        );
        Ok(dataset)
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Methods present, in method order
    pub fn methods(&self) -> Vec<Method> {
        self.by_method().into_keys().collect()
    }

    /// Rows grouped by method
    pub fn by_method(&self) -> BTreeMap<Method, Vec<&DatasetRow>> {
        let mut groups: BTreeMap<Method, Vec<&DatasetRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.method()).or_default().push(row);
        }
        groups
    }

    /// Non-missing values of a column for each method
    pub fn column_by_method(&self, column: Column) -> BTreeMap<Method, Vec<f64>> {
        self.by_method()
            .into_iter()
            .map(|(method, rows)| (method, rows.iter().filter_map(|r| r.value(column)).collect()))
            .collect()
    }

    /// Non-missing values of a column over the whole dataset
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.value(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::QualityScores;
    use crate::data::record::Measurement;
    use crate::data::SampleDescription;

    fn record(method: Method, coverage: u64, reference_size: u64, mobile_size: u64) -> CanonicalRecord {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let m = SampleDescription::new("2BBB", "b", "g", "s", "A");
        let meas = Measurement { rmsd: 1.0, coverage, reference_size, mobile_size, time: 0.1 };
        CanonicalRecord::measured(method, &r, &m, meas, QualityScores::compute(1.0, coverage, reference_size, mobile_size, 1.5))
    }

    #[test]
    fn test_relative_coverage() {
        let dataset = Dataset::assemble(vec![
            vec![record(Method::Mda, 90, 100, 120)],
            vec![record(Method::Pymol, 2, 3, 7)],
        ]);
        assert_eq!(dataset.rows()[0].rel_cov, Some(0.9));
        assert_eq!(dataset.rows()[1].rel_cov, Some(0.6667));
    }

    #[test]
    fn test_relative_coverage_missing_inputs() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let failed = CanonicalRecord::failed(Method::Mda, &r, &r);
        let dataset = Dataset::assemble(vec![vec![failed, record(Method::Mda, 0, 0, 10)]]);
        assert_eq!(dataset.rows()[0].rel_cov, None);
        assert_eq!(dataset.rows()[1].rel_cov, None);
    }

    #[test]
    fn test_rel_cov_independent_of_order() {
        let a = vec![record(Method::Mda, 10, 20, 30), record(Method::Theseus, 15, 40, 30)];
        let mut b = a.clone();
        b.reverse();
        let forward = Dataset::assemble(vec![a]);
        let backward = Dataset::assemble(vec![b]);
        let mut f: Vec<f64> = forward.column(Column::RelCov);
        let mut g: Vec<f64> = backward.column(Column::RelCov);
        f.sort_by(|x, y| x.partial_cmp(y).unwrap());
        g.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(f, g);
        assert_eq!(f, vec![0.5, 0.5]);
    }

    #[test]
    fn test_grouping() {
        let dataset = Dataset::assemble(vec![
            vec![record(Method::Mda, 10, 20, 30), record(Method::Mda, 12, 20, 30)],
            vec![record(Method::Theseus, 15, 40, 30)],
        ]);
        let groups = dataset.by_method();
        assert_eq!(groups[&Method::Mda].len(), 2);
        assert_eq!(groups[&Method::Theseus].len(), 1);
        assert_eq!(dataset.methods(), vec![Method::Theseus, Method::Mda]);
        assert_eq!(dataset.column_by_method(Column::Coverage)[&Method::Mda], vec![10.0, 12.0]);
    }
}
