// record.rs - Canonical per-(pair, method) result row

use crate::core::metrics::QualityScores;
use crate::core::Method;
use crate::data::SampleDescription;
use serde::{Deserialize, Serialize};

/// Canonical column order of the 19-column dataset
pub const CANONICAL_COLUMNS: [&str; 19] = [
    "reference_id",
    "mobile_id",
    "method",
    "rmsd",
    "coverage",
    "reference_size",
    "mobile_size",
    "time",
    "SI",
    "MI",
    "SAS",
    "ref_name",
    "ref_group",
    "ref_species",
    "ref_chain",
    "mob_name",
    "mob_group",
    "mob_species",
    "mob_chain",
];

/// Descriptive metadata of one structure, copied from its sample description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMeta {
    pub name: String,
    pub group: String,
    pub species: String,
    pub chain: String,
}

impl From<&SampleDescription> for StructureMeta {
    fn from(sample: &SampleDescription) -> Self {
        Self {
            name: sample.name.clone(),
            group: sample.group.clone(),
            species: sample.species.clone(),
            chain: sample.chain.clone(),
        }
    }
}

/// Raw measurements of one alignment attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub rmsd: f64,
    pub coverage: u64,
    pub reference_size: u64,
    pub mobile_size: u64,
    /// Elapsed wall time in seconds
    pub time: f64,
}

/// One completed, zero-coverage or failed alignment attempt.
/// Missing numeric values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub reference_id: String,
    pub mobile_id: String,
    pub method: Method,
    pub rmsd: Option<f64>,
    pub coverage: Option<u64>,
    pub reference_size: Option<u64>,
    pub mobile_size: Option<u64>,
    pub time: Option<f64>,
    pub si: Option<f64>,
    pub mi: Option<f64>,
    pub sas: Option<f64>,
    pub reference_meta: Option<StructureMeta>,
    pub mobile_meta: Option<StructureMeta>,
}

impl CanonicalRecord {
    /// Attempt that raised: every numeric field missing, metadata kept
    pub fn failed(method: Method, reference: &SampleDescription, mobile: &SampleDescription) -> Self {
        Self {
            reference_id: reference.id.clone(),
            mobile_id: mobile.id.clone(),
            method,
            rmsd: None,
            coverage: None,
            reference_size: None,
            mobile_size: None,
            time: None,
            si: None,
            mi: None,
            sas: None,
            reference_meta: Some(reference.into()),
            mobile_meta: Some(mobile.into()),
        }
    }

    /// Attempt that returned no aligned pairs. Raw scores are kept, derived
    /// measures and metadata are left empty.
    pub fn zero_coverage(
        method: Method,
        reference: &SampleDescription,
        mobile: &SampleDescription,
        measurement: Measurement,
    ) -> Self {
        Self {
            reference_id: reference.id.clone(),
            mobile_id: mobile.id.clone(),
            method,
            rmsd: Some(measurement.rmsd),
            coverage: Some(measurement.coverage),
            reference_size: Some(measurement.reference_size),
            mobile_size: Some(measurement.mobile_size),
            time: Some(measurement.time),
            si: None,
            mi: None,
            sas: None,
            reference_meta: None,
            mobile_meta: None,
        }
    }

    /// Fully populated row; `scores` is `None` when the derived measures are undefined
    pub fn measured(
        method: Method,
        reference: &SampleDescription,
        mobile: &SampleDescription,
        measurement: Measurement,
        scores: Option<QualityScores>,
    ) -> Self {
        Self {
            reference_id: reference.id.clone(),
            mobile_id: mobile.id.clone(),
            method,
            rmsd: Some(measurement.rmsd),
            coverage: Some(measurement.coverage),
            reference_size: Some(measurement.reference_size),
            mobile_size: Some(measurement.mobile_size),
            time: Some(measurement.time),
            si: scores.map(|s| s.si),
            mi: scores.map(|s| s.mi),
            sas: scores.map(|s| s.sas),
            reference_meta: Some(reference.into()),
            mobile_meta: Some(mobile.into()),
        }
    }

    /// Whether the derived quality measures are missing
    pub fn has_missing_scores(&self) -> bool {
        self.si.is_none()
    }

    /// Smaller of the two structure sizes, when both are known
    pub fn min_size(&self) -> Option<u64> {
        Some(self.reference_size?.min(self.mobile_size?))
    }
}
