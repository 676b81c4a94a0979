// metrics.rs - Quality measures derived from raw alignment scores

use serde::{Deserialize, Serialize};

/// Default normalization factor for the match index
pub const DEFAULT_W0: f64 = 1.5;

/// The three derived quality measures of one alignment.
/// Lower is better for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub si: f64,
    pub mi: f64,
    pub sas: f64,
}

impl QualityScores {
    /// Compute SI, MI and SAS. Returns `None` when the coverage is zero,
    /// where none of the measures is defined.
    pub fn compute(
        rmsd: f64,
        coverage: u64,
        reference_size: u64,
        mobile_size: u64,
        w0: f64,
    ) -> Option<Self> {
        let min_size = reference_size.min(mobile_size);
        Some(Self {
            si: similarity_index(rmsd, coverage, min_size)?,
            mi: match_index(rmsd, coverage, min_size, w0)?,
            sas: structural_alignment_score(rmsd, coverage)?,
        })
    }

    /// Round every measure to 4 decimals
    pub fn rounded(self) -> Self {
        Self {
            si: round4(self.si),
            mi: round4(self.mi),
            sas: round4(self.sas),
        }
    }
}

/// SI = (rmsd * min_size) / coverage
pub fn similarity_index(rmsd: f64, coverage: u64, min_size: u64) -> Option<f64> {
    if coverage == 0 {
        return None;
    }
    Some((rmsd * min_size as f64) / coverage as f64)
}

/// MI = 1 - ((1 + coverage) / ((1 + rmsd / w0) * (1 + min_size)))
pub fn match_index(rmsd: f64, coverage: u64, min_size: u64, w0: f64) -> Option<f64> {
    if coverage == 0 {
        return None;
    }
    Some(1.0 - ((1.0 + coverage as f64) / ((1.0 + rmsd / w0) * (1.0 + min_size as f64))))
}

/// SAS = (rmsd * 100) / coverage
pub fn structural_alignment_score(rmsd: f64, coverage: u64) -> Option<f64> {
    if coverage == 0 {
        return None;
    }
    Some((rmsd * 100.0) / coverage as f64)
}

/// Round to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_forms() {
        let scores = QualityScores::compute(2.0, 100, 150, 120, DEFAULT_W0).unwrap();
        assert_eq!(scores.si, (2.0 * 120.0) / 100.0);
        assert_eq!(scores.sas, (2.0 * 100.0) / 100.0);
        let expected_mi = 1.0 - ((1.0 + 100.0) / ((1.0 + 2.0 / 1.5) * (1.0 + 120.0)));
        assert_eq!(scores.mi, expected_mi);
    }

    #[test]
    fn test_sizes_are_symmetric() {
        let a = QualityScores::compute(1.3, 80, 90, 200, DEFAULT_W0).unwrap();
        let b = QualityScores::compute(1.3, 80, 200, 90, DEFAULT_W0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_w0_is_honoured() {
        let default = match_index(3.0, 50, 60, DEFAULT_W0).unwrap();
        let custom = match_index(3.0, 50, 60, 3.0).unwrap();
        assert_ne!(default, custom);
        assert_eq!(custom, 1.0 - (51.0 / ((1.0 + 1.0) * 61.0)));
    }

    #[test]
    fn test_zero_coverage_is_undefined() {
        assert!(QualityScores::compute(1.0, 0, 10, 10, DEFAULT_W0).is_none());
        assert!(QualityScores::compute(0.0, 0, 10, 10, DEFAULT_W0).is_none());
        assert!(similarity_index(1.0, 0, 10).is_none());
        assert!(match_index(1.0, 0, 10, DEFAULT_W0).is_none());
        assert!(structural_alignment_score(1.0, 0).is_none());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round4(1.234_56), 1.2346);
        assert_eq!(round4(-0.000_04), -0.0);
        assert_eq!(round2(12.345_6), 12.35);

        let scores = QualityScores { si: 1.000_049, mi: 0.123_456, sas: 2.5 }.rounded();
        assert_eq!(scores, QualityScores { si: 1.0, mi: 0.1235, sas: 2.5 });
    }
}
