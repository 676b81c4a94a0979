// aligner.rs - Collaborator alignment call contract and its command-line implementation

use crate::core::method::{Method, MethodOptions};
use crate::data::SampleDescription;
use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::Instant;

/// Raw scores reported by an aligner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentScores {
    pub rmsd: f64,
    pub coverage: u64,
}

/// Sizes of the two structures as seen by the aligner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentMetadata {
    pub reference_size: u64,
    pub mobile_size: u64,
}

/// Successful result of one alignment call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub scores: AlignmentScores,
    pub metadata: AlignmentMetadata,
}

/// Everything an aligner needs for one structure pair
#[derive(Debug, Clone)]
pub struct AlignmentRequest<'a> {
    pub method: Method,
    pub reference: &'a SampleDescription,
    pub mobile: &'a SampleDescription,
    pub options: &'a MethodOptions,
    /// Atom selection for reference and mobile, in that order
    pub selections: [String; 2],
}

impl<'a> AlignmentRequest<'a> {
    pub fn new(
        method: Method,
        reference: &'a SampleDescription,
        mobile: &'a SampleDescription,
        options: &'a MethodOptions,
    ) -> Self {
        Self {
            method,
            reference,
            mobile,
            options,
            selections: [reference.ca_selection(), mobile.ca_selection()],
        }
    }
}

/// Collaborator that aligns two structures.
///
/// Implementations may keep session state; calls are never issued concurrently.
pub trait StructureAligner {
    fn align(&mut self, request: &AlignmentRequest<'_>) -> Result<AlignmentResult, String>;
}

impl<F> StructureAligner for F
where
    F: FnMut(&AlignmentRequest<'_>) -> Result<AlignmentResult, String>,
{
    fn align(&mut self, request: &AlignmentRequest<'_>) -> Result<AlignmentResult, String> {
        self(request)
    }
}

/// What a single timed alignment call produced
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentOutcome {
    /// At least one aligned pair
    Aligned { result: AlignmentResult, seconds: f64 },
    /// The call succeeded but aligned nothing
    ZeroCoverage { result: AlignmentResult, seconds: f64 },
    /// The call raised
    Failed { reason: String },
}

/// Run one aligner call, timing it and classifying the result
pub fn timed_align<A: StructureAligner + ?Sized>(
    aligner: &mut A,
    request: &AlignmentRequest<'_>,
) -> AlignmentOutcome {
    let start = Instant::now();
    let result = aligner.align(request);
    let seconds = start.elapsed().as_secs_f64();

    match result {
        Ok(result) if result.scores.coverage == 0 => AlignmentOutcome::ZeroCoverage { result, seconds },
        Ok(result) => AlignmentOutcome::Aligned { result, seconds },
        Err(reason) => AlignmentOutcome::Failed { reason },
    }
}

/// Aligner backed by an external program that prints an
/// `AlignmentResult` as JSON on stdout
#[derive(Debug, Clone)]
pub struct CommandAligner {
    program: String,
    base_args: Vec<String>,
}

impl CommandAligner {
    /// Build from a command line such as `python3 align.py --quiet`
    pub fn from_command_line(command_line: &str) -> Result<Self, String> {
        let mut parts = command_line.split_whitespace().map(|s| s.to_string());
        let program = parts
            .next()
            .ok_or("Aligner command is empty")?;
        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }

    /// Arguments passed for one request, after the base arguments
    pub fn request_args(request: &AlignmentRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "--method".to_string(),
            request.method.to_string(),
            "--reference".to_string(),
            request.reference.id.clone(),
            "--mobile".to_string(),
            request.mobile.id.clone(),
            "--reference-selection".to_string(),
            request.selections[0].clone(),
            "--mobile-selection".to_string(),
            request.selections[1].clone(),
        ];
        for (key, value) in request.options {
            args.push("--option".to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }
}

impl StructureAligner for CommandAligner {
    fn align(&mut self, request: &AlignmentRequest<'_>) -> Result<AlignmentResult, String> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(Self::request_args(request))
            .output()
            .map_err(|e| format!("Failed to run aligner '{}': {}", self.program, e))?;

        if !output.status.success() {
            return Err(format!(
                "Aligner exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        parse_result_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Decode the JSON result printed by an external aligner
pub fn parse_result_json(text: &str) -> Result<AlignmentResult, String> {
    serde_json::from_str(text.trim())
        .map_err(|e| format!("Failed to decode aligner output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(coverage: u64) -> AlignmentResult {
        AlignmentResult {
            scores: AlignmentScores { rmsd: 1.1, coverage },
            metadata: AlignmentMetadata { reference_size: 100, mobile_size: 110 },
        }
    }

    #[test]
    fn test_request_selections() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let m = SampleDescription::new("2BBB", "b", "g", "s", "C");
        let options = MethodOptions::new();
        let request = AlignmentRequest::new(Method::Mda, &r, &m, &options);
        assert_eq!(request.selections[0], "backbone and name CA and segid A");
        assert_eq!(request.selections[1], "backbone and name CA and segid C");
    }

    #[test]
    fn test_outcome_classification() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let options = MethodOptions::new();
        let request = AlignmentRequest::new(Method::Mda, &r, &r, &options);

        fn ok(_: &AlignmentRequest<'_>) -> Result<AlignmentResult, String> {
            Ok(result(90))
        }
        fn empty(_: &AlignmentRequest<'_>) -> Result<AlignmentResult, String> {
            Ok(result(0))
        }
        fn broken(_: &AlignmentRequest<'_>) -> Result<AlignmentResult, String> {
            Err("no chain".to_string())
        }

        let (mut ok, mut empty, mut broken) = (ok, empty, broken);
        assert!(matches!(timed_align(&mut ok, &request), AlignmentOutcome::Aligned { .. }));
        assert!(matches!(timed_align(&mut empty, &request), AlignmentOutcome::ZeroCoverage { .. }));
        assert_eq!(
            timed_align(&mut broken, &request),
            AlignmentOutcome::Failed { reason: "no chain".to_string() }
        );
    }

    #[test]
    fn test_command_args() {
        let r = SampleDescription::new("1AAA", "a", "g", "s", "A");
        let m = SampleDescription::new("2BBB", "b", "g", "s", "B");
        let mut options = MethodOptions::new();
        options.insert("alignment_strategy".to_string(), "clustalo".to_string());
        let request = AlignmentRequest::new(Method::Mda, &r, &m, &options);

        let args = CommandAligner::request_args(&request);
        assert_eq!(&args[..6], &["--method", "mda", "--reference", "1AAA", "--mobile", "2BBB"]);
        assert_eq!(&args[args.len() - 2..], &["--option", "alignment_strategy=clustalo"]);

        let aligner = CommandAligner::from_command_line("python3 align.py --quiet").unwrap();
        assert_eq!(aligner.program, "python3");
        assert_eq!(aligner.base_args, vec!["align.py", "--quiet"]);
        assert!(CommandAligner::from_command_line("   ").is_err());
    }

    #[test]
    fn test_parse_result_json() {
        let json = r#"{"scores": {"rmsd": 1.1, "coverage": 90},
                       "metadata": {"reference_size": 100, "mobile_size": 110}}"#;
        assert_eq!(parse_result_json(json).unwrap(), result(90));
        assert!(parse_result_json("{\"scores\": {}}").is_err());
    }
}
