// matchmaker.rs - Parser for interactive-app (HTML log) matchmaker transcripts

use crate::core::metrics::round4;
use crate::core::Method;
use crate::data::loaders::transcript::{ensure_equal_lengths, transcript_record};
use crate::data::record::{CanonicalRecord, Measurement};
use crate::data::SampleDescription;

/// Entity suffix left on every field after splitting a metadata line on ';'
const QUOTE_ENTITY: &str = "&#x27";

/// Positions of the five sample fields in a ';'-split metadata line
const META_FIELDS: [usize; 5] = [1, 3, 5, 7, 9];

/// Token holding the residue count on a selection line
const RESIDUE_TOKEN: usize = 10;

/// What one transcript line contributes
#[derive(Debug, Clone, PartialEq)]
enum LogLine {
    Reference(SampleDescription),
    Mobile(SampleDescription),
    Residues(u64),
    Alignment,
    Result { coverage: u64, rmsd: f64 },
    Time(f64),
    Other,
}

/// Parallel columns accumulated over one pass
#[derive(Debug, Default)]
struct Columns {
    references: Vec<SampleDescription>,
    mobiles: Vec<SampleDescription>,
    residues: Vec<u64>,
    alignments: usize,
    results: Vec<(u64, f64)>,
    times: Vec<f64>,
}

fn metadata(line: &str) -> Result<SampleDescription, String> {
    let parts: Vec<&str> = line.split(';').collect();
    let mut fields = Vec::with_capacity(META_FIELDS.len());
    for &i in &META_FIELDS {
        let raw = parts
            .get(i)
            .ok_or_else(|| format!("metadata line has {} ';' fields, expected at least 10", parts.len()))?;
        fields.push(raw.strip_suffix(QUOTE_ENTITY).unwrap_or(raw));
    }
    SampleDescription::from_fields(&fields)
}

fn classify(line: &str) -> Result<LogLine, String> {
    if line.contains("reference: ") {
        return metadata(line).map(LogLine::Reference);
    }
    if line.contains("mobile: ") {
        return metadata(line).map(LogLine::Mobile);
    }
    if line.contains("residues,") {
        // selection lines without a readable count are ignored
        let count = line
            .split(' ')
            .nth(RESIDUE_TOKEN)
            .and_then(|t| t.trim().parse::<u64>().ok());
        return Ok(count.map(LogLine::Residues).unwrap_or(LogLine::Other));
    }
    if line.starts_with("alignment: ") {
        return Ok(LogLine::Alignment);
    }
    if line.starts_with("RMSD") {
        let tokens: Vec<&str> = line.split(' ').collect();
        let coverage = tokens
            .get(2)
            .and_then(|t| t.parse::<u64>().ok())
            .ok_or_else(|| format!("no atom pair count in '{}'", line.trim()))?;
        let rmsd = tokens
            .get(6)
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| format!("no RMSD value in '{}'", line.trim()))?;
        return Ok(LogLine::Result { coverage, rmsd });
    }
    if line.contains("Fewer") {
        return Ok(LogLine::Result { coverage: 0, rmsd: 0.0 });
    }
    if line.contains("time: ") {
        let seconds = line
            .split(' ')
            .nth(1)
            .and_then(|t| t.trim().parse::<f64>().ok())
            .ok_or_else(|| format!("no duration in '{}'", line.trim()))?;
        return Ok(LogLine::Time(seconds));
    }
    Ok(LogLine::Other)
}

/// Missing-metric trigger of this dialect: nothing aligned and nothing measured
pub fn metrics_missing(coverage: u64, rmsd: f64) -> bool {
    coverage == 0 && rmsd == 0.0
}

/// Parse a matchmaker transcript into canonical records, one per `alignment:` marker
pub fn parse_matchmaker_transcript<S: AsRef<str>>(lines: &[S], w0: f64) -> Result<Vec<CanonicalRecord>, String> {
    let mut columns = Columns::default();

    for (line_num, line) in lines.iter().enumerate() {
        let entry = classify(line.as_ref())
            .map_err(|e| format!("Matchmaker transcript line {}: {}", line_num + 1, e))?;
        match entry {
            LogLine::Reference(sample) => columns.references.push(sample),
            LogLine::Mobile(sample) => columns.mobiles.push(sample),
            LogLine::Residues(count) => columns.residues.push(count),
            LogLine::Alignment => columns.alignments += 1,
            LogLine::Result { coverage, rmsd } => columns.results.push((coverage, rmsd)),
            LogLine::Time(seconds) => columns.times.push(seconds),
            LogLine::Other => {}
        }
    }

    let count = ensure_equal_lengths(
        "Matchmaker",
        &[
            ("alignment", columns.alignments),
            ("reference", columns.references.len()),
            ("mobile", columns.mobiles.len()),
            ("result", columns.results.len()),
            ("time", columns.times.len()),
        ],
    )?;
    if columns.residues.len() != 2 * count {
        return Err(format!(
            "Matchmaker transcript is inconsistent, {} residue counts for {} alignments",
            columns.residues.len(),
            count
        ));
    }

    // two residue counts per pair: reference then mobile
    let mut offset = 0;
    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let (coverage, rmsd) = columns.results[i];
        let measurement = Measurement {
            rmsd: round4(rmsd),
            coverage,
            reference_size: columns.residues[offset],
            mobile_size: columns.residues[offset + 1],
            time: round4(columns.times[i]),
        };
        offset += 2;
        records.push(transcript_record(
            Method::Matchmaker,
            &columns.references[i],
            &columns.mobiles[i],
            measurement,
            metrics_missing(coverage, measurement.rmsd),
            w0,
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::DEFAULT_W0;

    fn meta_line(tag: &str, fields: [&str; 5]) -> String {
        format!(
            "<div>{}: [&#x27;{}&#x27;, &#x27;{}&#x27;, &#x27;{}&#x27;, &#x27;{}&#x27;, &#x27;{}&#x27;] </div>",
            tag, fields[0], fields[1], fields[2], fields[3], fields[4]
        )
    }

    fn residue_line(count: u64) -> String {
        format!("select #1/A@ca: 1 model, 1 chain, {} atoms, 0 bonds, {} residues, selected", count, count)
    }

    fn pair_block(reference: &str, mobile: &str, sizes: (u64, u64), result: &str, time: Option<&str>) -> Vec<String> {
        let mut lines = vec![
            meta_line("reference", [reference, "Kinase A", "TK", "Human", "A"]),
            residue_line(sizes.0),
            meta_line("mobile", [mobile, "Kinase B", "TK", "Mouse", "B"]),
            residue_line(sizes.1),
            String::new(),
            "alignment: 0 ".to_string(),
            "Matchmaker 1aaa, chain A (#1) with 2bbb, chain B (#2), sequence alignment score = 812.3".to_string(),
            result.to_string(),
        ];
        if let Some(t) = time {
            lines.push(format!("time: {} ", t));
        }
        lines
    }

    #[test]
    fn test_metadata_fields() {
        let sample = metadata(&meta_line("reference", ["1AAA", "Kinase A", "TK", "Human", "A"])).unwrap();
        assert_eq!(sample, SampleDescription::new("1AAA", "Kinase A", "TK", "Human", "A"));
        assert!(metadata("reference: 1AAA").is_err());
    }

    #[test]
    fn test_two_pairs() {
        let mut lines = pair_block("1AAA", "2BBB", (300, 250), "RMSD between 240 atom pairs is 1.23456 angstroms", Some("2.000049"));
        lines.extend(pair_block("1AAA", "3CCC", (300, 280), "RMSD between 200 atom pairs is 2.5 angstroms", Some("1.5")));
        let records = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.method, Method::Matchmaker);
        assert_eq!((first.reference_id.as_str(), first.mobile_id.as_str()), ("1AAA", "2BBB"));
        assert_eq!(first.rmsd, Some(1.2346));
        assert_eq!(first.coverage, Some(240));
        assert_eq!((first.reference_size, first.mobile_size), (Some(300), Some(250)));
        assert_eq!(first.time, Some(2.0));
        assert_eq!(first.si, Some(1.286));
        assert_eq!(first.sas, Some(0.5144));
        assert_eq!(first.mobile_meta.as_ref().unwrap().species, "Mouse");

        // sizes follow the running offset, not the pair index
        assert_eq!((records[1].reference_size, records[1].mobile_size), (Some(300), Some(280)));
        assert_eq!(records[1].si, Some(3.5));
    }

    #[test]
    fn test_low_coverage_fallback() {
        let lines = pair_block("1AAA", "2BBB", (300, 250), "Fewer than 3 residues aligned; cannot match", Some("0.5"));
        let records = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap();
        assert_eq!(records[0].coverage, Some(0));
        assert_eq!(records[0].rmsd, Some(0.0));
        assert!(records[0].si.is_none() && records[0].mi.is_none() && records[0].sas.is_none());
        assert!(records[0].reference_meta.is_some());
    }

    #[test]
    fn test_missing_rule_is_stricter_than_orchestrator() {
        // this dialect only flags rows where coverage AND rmsd are zero
        assert!(metrics_missing(0, 0.0));
        assert!(!metrics_missing(0, 1.2));
        assert!(!metrics_missing(10, 0.0));

        // zero coverage alone still leaves the measures undefined
        let lines = pair_block("1AAA", "2BBB", (300, 250), "RMSD between 0 atom pairs is 1.2 angstroms", Some("0.5"));
        let records = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap();
        assert!(records[0].si.is_none());

        // zero rmsd with coverage keeps the measures
        let lines = pair_block("1AAA", "2BBB", (300, 250), "RMSD between 50 atom pairs is 0.0 angstroms", Some("0.5"));
        let records = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap();
        assert_eq!(records[0].si, Some(0.0));
    }

    #[test]
    fn test_missing_time_is_detected() {
        let mut lines = pair_block("1AAA", "2BBB", (300, 250), "RMSD between 240 atom pairs is 1.2 angstroms", None);
        lines.extend(pair_block("1AAA", "3CCC", (300, 280), "RMSD between 200 atom pairs is 2.5 angstroms", Some("1.5")));
        let err = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap_err();
        assert!(err.contains("time=1"));
    }

    #[test]
    fn test_unknown_lines_are_skipped() {
        let mut lines = vec!["<html><body>".to_string(), "UCSF ChimeraX version 1.6".to_string()];
        lines.extend(pair_block("1AAA", "2BBB", (300, 250), "RMSD between 240 atom pairs is 1.2 angstroms", Some("0.5")));
        lines.push("residues, none selected".to_string());
        lines.push("</body></html>".to_string());
        assert_eq!(parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap().len(), 1);
        assert!(parse_matchmaker_transcript::<&str>(&[], DEFAULT_W0).unwrap().is_empty());
    }

    #[test]
    fn test_bad_result_line() {
        let lines = pair_block("1AAA", "2BBB", (300, 250), "RMSD between many atom pairs", Some("0.5"));
        let err = parse_matchmaker_transcript(&lines, DEFAULT_W0).unwrap_err();
        assert!(err.contains("line 8"));
    }
}
