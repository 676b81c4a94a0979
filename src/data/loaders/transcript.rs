// transcript.rs - Pieces shared by the line-oriented transcript parsers

use crate::core::metrics::QualityScores;
use crate::core::Method;
use crate::data::record::{CanonicalRecord, Measurement};
use crate::data::SampleDescription;
use std::fs;
use std::path::Path;

/// Make sure every positional column holds one entry per alignment.
/// Returns the shared length.
pub fn ensure_equal_lengths(dialect: &str, columns: &[(&str, usize)]) -> Result<usize, String> {
    let expected = columns.first().map(|(_, len)| *len).unwrap_or(0);
    if columns.iter().all(|(_, len)| *len == expected) {
        return Ok(expected);
    }
    let summary: Vec<String> = columns
        .iter()
        .map(|(name, len)| format!("{}={}", name, len))
        .collect();
    Err(format!(
        "{} transcript is inconsistent, extracted columns differ in length ({})",
        dialect,
        summary.join(", ")
    ))
}

/// Build a transcript row. Derived measures are rounded to 4 decimals
/// here, at the point of record creation.
pub fn transcript_record(
    method: Method,
    reference: &SampleDescription,
    mobile: &SampleDescription,
    measurement: Measurement,
    metrics_missing: bool,
    w0: f64,
) -> CanonicalRecord {
    let scores = if metrics_missing {
        None
    } else {
        QualityScores::compute(
            measurement.rmsd,
            measurement.coverage,
            measurement.reference_size,
            measurement.mobile_size,
            w0,
        )
        .map(QualityScores::rounded)
    };
    CanonicalRecord::measured(method, reference, mobile, measurement, scores)
}

/// Read a transcript file into lines
pub fn read_transcript_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read transcript '{}': {}", path.display(), e))?;
    let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    println!("✅ Transcript loaded: {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_lengths() {
        assert_eq!(ensure_equal_lengths("B", &[("reference", 3), ("time", 3)]).unwrap(), 3);
        assert_eq!(ensure_equal_lengths("B", &[]).unwrap(), 0);

        let err = ensure_equal_lengths("B", &[("reference", 3), ("result", 3), ("time", 2)]).unwrap_err();
        assert!(err.contains("time=2"));
        assert!(err.contains("reference=3"));
    }

    #[test]
    fn test_rounded_scores() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let m = SampleDescription::new("2BBB", "b", "g", "s", "B");
        let meas = Measurement { rmsd: 1.0, coverage: 3, reference_size: 7, mobile_size: 9, time: 0.1 };

        let record = transcript_record(Method::Pymol, &r, &m, meas, false, 1.5);
        assert_eq!(record.si, Some(2.3333));
        assert_eq!(record.sas, Some(33.3333));

        let missing = transcript_record(Method::Pymol, &r, &m, meas, true, 1.5);
        assert!(missing.si.is_none() && missing.mi.is_none() && missing.sas.is_none());
        assert_eq!(missing.reference_meta.unwrap().name, "a");
    }
}
