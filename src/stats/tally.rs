// tally.rs - Counts of how often each method gives the best quality measure

use crate::core::Method;
use crate::data::{Column, Dataset, DatasetRow};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Method left out of the second tally by default, the one with most failed alignments
pub const DEFAULT_TALLY_EXCLUSION: Method = Method::Mmligner;

/// Best-method counts for one quality measure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMethodCounts {
    pub metric: Column,
    pub counts: BTreeMap<Method, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyReport {
    pub all_methods: Vec<BestMethodCounts>,
    pub excluded: Method,
    pub without_excluded: Vec<BestMethodCounts>,
}

/// Structure ids in encounter order: every reference id, then every mobile id
pub fn structure_order(dataset: &Dataset) -> HashMap<&str, usize> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let references = dataset.rows().iter().map(|r| r.record.reference_id.as_str());
    let mobiles = dataset.rows().iter().map(|r| r.record.mobile_id.as_str());
    for id in references.chain(mobiles) {
        let next = order.len();
        order.entry(id).or_insert(next);
    }
    order
}

/// Rows of every structure pair, keyed in (earlier, later) orientation.
/// Rows stored the other way round, or aligning a structure with itself,
/// are not part of any pair.
fn rows_by_pair(dataset: &Dataset) -> BTreeMap<(usize, usize), Vec<&DatasetRow>> {
    let order = structure_order(dataset);
    let mut pairs: BTreeMap<(usize, usize), Vec<&DatasetRow>> = BTreeMap::new();
    for row in dataset.rows() {
        let reference = order[row.record.reference_id.as_str()];
        let mobile = order[row.record.mobile_id.as_str()];
        if reference < mobile {
            pairs.entry((reference, mobile)).or_default().push(row);
        }
    }
    pairs
}

fn count_best(
    pairs: &BTreeMap<(usize, usize), Vec<&DatasetRow>>,
    metric: Column,
    excluded: Option<Method>,
) -> BestMethodCounts {
    let mut counts: BTreeMap<Method, usize> = BTreeMap::new();
    for rows in pairs.values() {
        let candidates: Vec<(Method, f64)> = rows
            .iter()
            .filter(|r| Some(r.method()) != excluded)
            .filter_map(|r| r.value(metric).map(|v| (r.method(), v)))
            .collect();
        let best = candidates.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        // every tied row counts
        for (method, value) in candidates {
            if value == best {
                *counts.entry(method).or_insert(0) += 1;
            }
        }
    }
    BestMethodCounts { metric, counts }
}

/// Count best methods per structure pair for SI, MI and SAS, once with all
/// methods and once without `excluded`
pub fn best_method_tally(dataset: &Dataset, excluded: Method) -> TallyReport {
    let pairs = rows_by_pair(dataset);

    let jobs: Vec<(Column, Option<Method>)> = [None, Some(excluded)]
        .into_iter()
        .flat_map(|view| Column::QUALITY.into_iter().map(move |metric| (metric, view)))
        .collect();
    let mut results: Vec<BestMethodCounts> = jobs
        .par_iter()
        .map(|&(metric, view)| count_best(&pairs, metric, view))
        .collect();

    let without_excluded = results.split_off(Column::QUALITY.len());
    TallyReport {
        all_methods: results,
        excluded,
        without_excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::CanonicalRecord;
    use crate::data::SampleDescription;

    fn row(method: Method, reference: &str, mobile: &str, si: Option<f64>) -> CanonicalRecord {
        let r = SampleDescription::new(reference, "a", "g", "s", "A");
        let m = SampleDescription::new(mobile, "b", "g", "s", "B");
        let mut record = CanonicalRecord::failed(method, &r, &m);
        record.si = si;
        record.mi = si.map(|v| v / 10.0);
        record.sas = si;
        record
    }

    fn counts(tally: &BestMethodCounts) -> Vec<(Method, usize)> {
        tally.counts.iter().map(|(m, c)| (*m, *c)).collect()
    }

    #[test]
    fn test_ties_count_for_every_method() {
        let dataset = Dataset::assemble(vec![vec![
            row(Method::Mda, "S1", "S2", Some(1.0)),
            row(Method::Theseus, "S1", "S2", Some(2.0)),
            row(Method::Pymol, "S1", "S2", Some(3.0)),
            row(Method::Mda, "S1", "S3", Some(5.0)),
            row(Method::Theseus, "S1", "S3", Some(1.0)),
            row(Method::Pymol, "S1", "S3", Some(1.0)),
        ]]);
        let report = best_method_tally(&dataset, DEFAULT_TALLY_EXCLUSION);

        assert_eq!(report.all_methods[0].metric, Column::Si);
        assert_eq!(
            counts(&report.all_methods[0]),
            vec![(Method::Theseus, 1), (Method::Pymol, 1), (Method::Mda, 1)]
        );
        // MI and SAS follow SI in these rows
        assert_eq!(report.all_methods[1].metric, Column::Mi);
        assert_eq!(counts(&report.all_methods[1]), counts(&report.all_methods[2]));
        assert_eq!(report.without_excluded, report.all_methods);
    }

    #[test]
    fn test_excluded_method_view() {
        let dataset = Dataset::assemble(vec![vec![
            row(Method::Mmligner, "S1", "S2", Some(0.5)),
            row(Method::Mda, "S1", "S2", Some(1.0)),
            row(Method::Theseus, "S1", "S2", Some(2.0)),
            row(Method::Mmligner, "S1", "S3", None),
            row(Method::Theseus, "S1", "S3", Some(1.0)),
        ]]);
        let report = best_method_tally(&dataset, Method::Mmligner);

        assert_eq!(counts(&report.all_methods[0]), vec![(Method::Theseus, 1), (Method::Mmligner, 1)]);
        assert_eq!(report.excluded, Method::Mmligner);
        assert_eq!(counts(&report.without_excluded[0]), vec![(Method::Theseus, 1), (Method::Mda, 1)]);
    }

    #[test]
    fn test_orientation_and_missing_pairs() {
        let dataset = Dataset::assemble(vec![vec![
            row(Method::Mda, "S1", "S2", Some(1.0)),
            // reversed orientation is not part of the (S1, S2) pair
            row(Method::Theseus, "S2", "S1", Some(0.1)),
            row(Method::Pymol, "S2", "S3", None),
        ]]);
        let order = structure_order(&dataset);
        assert_eq!((order["S1"], order["S2"], order["S3"]), (0, 1, 2));

        let report = best_method_tally(&dataset, DEFAULT_TALLY_EXCLUSION);
        assert_eq!(counts(&report.all_methods[0]), vec![(Method::Mda, 1)]);
    }
}
