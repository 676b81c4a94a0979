// sample.rs - Sample descriptions and sample-set loading

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One structure of a sample set.
///
/// Sample files store the fields positionally as
/// `id,name,group,species,chain`; the constructor keeps that order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleDescription {
    pub id: String,
    pub name: String,
    pub group: String,
    pub species: String,
    pub chain: String,
}

impl SampleDescription {
    pub fn new(id: &str, name: &str, group: &str, species: &str, chain: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            group: group.to_string(),
            species: species.to_string(),
            chain: chain.to_string(),
        }
    }

    /// Build from positional fields; fields past the fifth are ignored
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, String> {
        if fields.len() < 5 {
            return Err(format!(
                "sample description needs 5 fields (id, name, group, species, chain), got {}",
                fields.len()
            ));
        }
        Ok(Self::new(
            fields[0].as_ref(),
            fields[1].as_ref(),
            fields[2].as_ref(),
            fields[3].as_ref(),
            fields[4].as_ref(),
        ))
    }

    /// Parse one comma-separated sample-file line
    pub fn from_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(',').collect();
        Self::from_fields(&fields)
    }

    /// Backbone alpha-carbon selection for the declared chain
    pub fn ca_selection(&self) -> String {
        format!("backbone and name CA and segid {}", self.chain)
    }
}

/// Load a sample-set file (one structure per line, no header)
pub fn load_sample_set<P: AsRef<Path>>(path: P) -> Result<Vec<SampleDescription>, String> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read sample set '{}': {}", path.display(), e))?;
    let samples = parse_sample_set(&content)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    println!("✅ Sample set loaded: {} structures from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse sample-set text; blank lines are skipped
pub fn parse_sample_set(content: &str) -> Result<Vec<SampleDescription>, String> {
    let mut samples = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let sample = SampleDescription::from_line(line)
            .map_err(|e| format!("line {}: {}", line_num + 1, e))?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Keep samples whose id matches `include` (if given) and not `exclude` (if given)
pub fn filter_samples(
    samples: Vec<SampleDescription>,
    include: Option<&Regex>,
    exclude: Option<&Regex>,
) -> Vec<SampleDescription> {
    let before = samples.len();
    let kept: Vec<SampleDescription> = samples
        .into_iter()
        .filter(|s| include.map_or(true, |re| re.is_match(&s.id)))
        .filter(|s| exclude.map_or(true, |re| !re.is_match(&s.id)))
        .collect();

    if kept.len() != before {
        println!("🔍 Sample filter: kept {} of {} structures", kept.len(), before);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_set() {
        let content = "3ANR,DYRK1A,CMGC,Human,A\n\n1W98,CDK2,CMGC,Human,B\n";
        let samples = parse_sample_set(content).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], SampleDescription::new("3ANR", "DYRK1A", "CMGC", "Human", "A"));
        assert_eq!(samples[1].chain, "B");
        assert_eq!(samples[1].ca_selection(), "backbone and name CA and segid B");
    }

    #[test]
    fn test_short_line_is_fatal() {
        let err = parse_sample_set("3ANR,DYRK1A,CMGC,Human,A\n1W98,CDK2\n").unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let sample = SampleDescription::from_line("1ABC,n,g,s,A,extra").unwrap();
        assert_eq!(sample.chain, "A");
    }

    #[test]
    fn test_filter_samples() {
        let samples = parse_sample_set("1AAA,a,g,s,A\n2BBB,b,g,s,A\n3CCC,c,g,s,A\n").unwrap();
        let include = Regex::new("^[12]").unwrap();
        let exclude = Regex::new("BBB").unwrap();
        let kept = filter_samples(samples, Some(&include), Some(&exclude));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1AAA");
    }
}
