// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::{Method, MethodTable};
use crate::stats::{AnalysisOptions, CorrelationMethod, NormalityTest, PairwiseColumns};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub struct ValidationResult {
    pub methods: MethodTable,
    pub sample_include_regex: Option<Regex>,
    pub sample_exclude_regex: Option<Regex>,
    pub analysis: AnalysisOptions,
}

/// Parse a comma separated method list; only programmatic methods can be run
pub fn parse_method_list(list: &str) -> Result<Vec<Method>, String> {
    let mut methods = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let method = Method::from_str(name)?;
        if !method.is_programmatic() {
            return Err(format!(
                "Method '{}' cannot be run through the aligner; parse its transcript with transcript_parser",
                method
            ));
        }
        methods.push(method);
    }
    if methods.is_empty() {
        return Err("No methods selected".to_string());
    }
    Ok(methods)
}

fn compile(pattern: &Option<String>, name: &str) -> Result<Option<Regex>, String> {
    pattern
        .as_deref()
        .map(|p| Regex::new(p).map_err(|e| format!("Invalid {} regex: {}", name, e)))
        .transpose()
}

fn require_file(path: &str, what: &str) -> Result<(), String> {
    if !Path::new(path).is_file() {
        return Err(format!("{} '{}' does not exist", what, path));
    }
    Ok(())
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Validate analysis settings (fatal on unsupported names)
    let normality = NormalityTest::from_str(&args.normality_test)?;
    let correlation = CorrelationMethod::from_str(&args.correlation)?;
    let tally_exclusion = Method::from_str(&args.tally_exclude)?;
    if !(args.alpha > 0.0 && args.alpha < 1.0) {
        return Err(format!("Significance level must be between 0 and 1, got {}", args.alpha));
    }
    if !(args.w0.is_finite() && args.w0 > 0.0) {
        return Err(format!("w0 must be a positive number, got {}", args.w0));
    }

    let analysis = AnalysisOptions {
        normality,
        correlation,
        alpha: args.alpha,
        pairwise_columns: if args.pairwise_legacy_rmsd {
            PairwiseColumns::AlwaysRmsd
        } else {
            PairwiseColumns::Labelled
        },
        tally_exclusion,
    };

    // Method table with per-method options
    let mut methods = match &args.methods {
        Some(list) => MethodTable::for_methods(&parse_method_list(list)?),
        None => MethodTable::default(),
    };
    for option in &args.method_option {
        methods.apply_option(option)?;
    }

    // Mode specific requirements
    if args.is_analysis() {
        for path in &args.analyze {
            require_file(path, "Analysis input")?;
        }
    } else {
        let sample_set = args
            .sample_set
            .as_deref()
            .ok_or("--sample-set is required (or use --analyze to analyze existing results)")?;
        require_file(sample_set, "Sample set")?;
        if let Some(second) = &args.second_sample_set {
            require_file(second, "Second sample set")?;
        }
        if args.output.is_none() {
            return Err("--output is required for an alignment run".to_string());
        }
        if args.aligner.as_deref().map_or(true, |a| a.trim().is_empty()) {
            return Err("--aligner is required for an alignment run".to_string());
        }
    }

    // Compile regex patterns
    let sample_include_regex = compile(&args.include, "include")?;
    let sample_exclude_regex = compile(&args.exclude, "exclude")?;

    Ok(ValidationResult {
        methods,
        sample_include_regex,
        sample_exclude_regex,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn args(extra: &[&str]) -> Args {
        Args::from_args(&["alignbench"], extra).unwrap()
    }

    fn csv_file() -> String {
        let path = std::env::temp_dir().join(format!("alignbench_validation_{}.csv", std::process::id()));
        std::fs::write(&path, "").unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_analysis_defaults() {
        let input = csv_file();
        let result = validate_args(&args(&["--analyze", &input])).unwrap();
        assert_eq!(result.analysis, AnalysisOptions::default());
        assert_eq!(result.methods.len(), 3);
        assert!(result.sample_include_regex.is_none());
    }

    #[test]
    fn test_unsupported_names_are_fatal() {
        let input = csv_file();
        let err = validate_args(&args(&["--analyze", &input, "--normality-test", "anderson"])).err().unwrap();
        assert!(err.contains("anderson"));
        let err = validate_args(&args(&["--analyze", &input, "--correlation", "cosine"])).err().unwrap();
        assert!(err.contains("cosine"));
        assert!(validate_args(&args(&["--analyze", &input, "--alpha", "1.5"])).is_err());
        assert!(validate_args(&args(&["--analyze", &input, "--include", "("])).is_err());
        let err = validate_args(&args(&["--analyze", &input, "--w0", "0"])).err().unwrap();
        assert!(err.contains("w0 must be a positive number"));
    }

    #[test]
    fn test_method_selection() {
        let input = csv_file();
        let result = validate_args(&args(&[
            "--analyze", &input,
            "--methods", "mmligner,mda",
            "--method-option", "mmligner:ivalue=0.1",
            "--pairwise-legacy-rmsd",
        ]))
        .unwrap();
        assert_eq!(result.methods.methods().collect::<Vec<_>>(), vec![Method::Mmligner, Method::Mda]);
        assert_eq!(result.analysis.pairwise_columns, PairwiseColumns::AlwaysRmsd);

        assert!(parse_method_list("pymol").unwrap_err().contains("transcript_parser"));
        assert!(parse_method_list(" , ").is_err());
    }

    #[test]
    fn test_alignment_run_requirements() {
        assert!(validate_args(&args(&[])).unwrap_err().contains("--sample-set"));

        let samples = csv_file();
        assert!(validate_args(&args(&["--sample-set", &samples])).unwrap_err().contains("--output"));
        assert!(validate_args(&args(&["--sample-set", &samples, "--output", "out.csv"]))
            .unwrap_err()
            .contains("--aligner"));
        assert!(validate_args(&args(&["--sample-set", &samples, "--output", "out.csv", "--aligner", "align"])).is_ok());
        assert!(validate_args(&args(&["--sample-set", "/nonexistent/set.txt"])).is_err());
    }
}
