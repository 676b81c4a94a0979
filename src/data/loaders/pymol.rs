// pymol.rs - Parser for batch-tool (per-step stdout) pymol transcripts

use crate::core::metrics::round4;
use crate::core::Method;
use crate::data::loaders::literal::{parse_sequence, Literal};
use crate::data::loaders::transcript::{ensure_equal_lengths, transcript_record};
use crate::data::record::{CanonicalRecord, Measurement};
use crate::data::SampleDescription;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Which score pair of the printed result tuple is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinementStage {
    /// RMSD and atom count before outlier rejection
    #[default]
    Unrefined,
    /// RMSD and atom count after outlier rejection
    Refined,
}

impl RefinementStage {
    /// Tuple positions of (rmsd, coverage)
    pub fn indices(&self) -> (usize, usize) {
        match self {
            RefinementStage::Unrefined => (3, 4),
            RefinementStage::Refined => (0, 1),
        }
    }
}

impl Display for RefinementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefinementStage::Unrefined => write!(f, "unrefined"),
            RefinementStage::Refined => write!(f, "refined"),
        }
    }
}

impl FromStr for RefinementStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unrefined" => Ok(RefinementStage::Unrefined),
            "refined" => Ok(RefinementStage::Refined),
            _ => Err(format!("Unknown refinement stage '{}'. Use: unrefined, refined", s)),
        }
    }
}

#[derive(Debug, Default)]
struct Columns {
    references: Vec<SampleDescription>,
    mobiles: Vec<SampleDescription>,
    reference_sizes: Vec<u64>,
    mobile_sizes: Vec<u64>,
    results: Vec<(f64, u64)>,
    times: Vec<f64>,
}

fn sample_literal(text: &str) -> Result<SampleDescription, String> {
    let items = parse_sequence(text)?;
    let fields: Vec<&str> = items
        .iter()
        .map(|item| item.as_str().ok_or_else(|| format!("non-string field {:?}", item)))
        .collect::<Result<_, _>>()?;
    SampleDescription::from_fields(&fields)
}

fn size_value(line: &str) -> Result<u64, String> {
    line.split(' ')
        .nth(1)
        .and_then(|t| t.trim().parse::<u64>().ok())
        .ok_or_else(|| format!("no size in '{}'", line.trim()))
}

fn result_literal(text: &str, stage: RefinementStage) -> Result<(f64, u64), String> {
    let items = parse_sequence(text)?;
    let (rmsd_at, coverage_at) = stage.indices();
    let rmsd = items
        .get(rmsd_at)
        .and_then(Literal::as_f64)
        .ok_or_else(|| format!("result tuple has no RMSD at position {}", rmsd_at))?;
    let coverage = items
        .get(coverage_at)
        .and_then(Literal::as_u64)
        .ok_or_else(|| format!("result tuple has no atom count at position {}", coverage_at))?;
    Ok((round4(rmsd), coverage))
}

impl Columns {
    fn scan(&mut self, line: &str, stage: RefinementStage) -> Result<(), String> {
        if let Some(rest) = line.strip_prefix("reference: ") {
            self.references.push(sample_literal(rest)?);
        } else if line.starts_with("reference_size: ") {
            self.reference_sizes.push(size_value(line)?);
        } else if let Some(rest) = line.strip_prefix("mobile: ") {
            self.mobiles.push(sample_literal(rest)?);
        } else if line.starts_with("mobile_size: ") {
            self.mobile_sizes.push(size_value(line)?);
        } else if let Some(rest) = line.strip_prefix("result: ") {
            self.results.push(result_literal(rest, stage)?);
        } else if line.starts_with("time: ") {
            let seconds = line
                .split(' ')
                .nth(1)
                .and_then(|t| t.trim().parse::<f64>().ok())
                .ok_or_else(|| format!("no duration in '{}'", line.trim()))?;
            self.times.push(seconds);
        }
        Ok(())
    }
}

/// Parse a pymol transcript into canonical records, one per reference/mobile block
pub fn parse_pymol_transcript<S: AsRef<str>>(
    lines: &[S],
    w0: f64,
    stage: RefinementStage,
) -> Result<Vec<CanonicalRecord>, String> {
    let mut columns = Columns::default();
    for (line_num, line) in lines.iter().enumerate() {
        columns
            .scan(line.as_ref(), stage)
            .map_err(|e| format!("PyMOL transcript line {}: {}", line_num + 1, e))?;
    }

    let count = ensure_equal_lengths(
        "PyMOL",
        &[
            ("reference", columns.references.len()),
            ("mobile", columns.mobiles.len()),
            ("reference_size", columns.reference_sizes.len()),
            ("mobile_size", columns.mobile_sizes.len()),
            ("result", columns.results.len()),
            ("time", columns.times.len()),
        ],
    )?;

    let records = (0..count)
        .map(|i| {
            let (rmsd, coverage) = columns.results[i];
            let measurement = Measurement {
                rmsd,
                coverage,
                reference_size: columns.reference_sizes[i],
                mobile_size: columns.mobile_sizes[i],
                time: columns.times[i],
            };
            transcript_record(
                Method::Pymol,
                &columns.references[i],
                &columns.mobiles[i],
                measurement,
                false,
                w0,
            )
        })
        .collect();
    Ok(records)
}
