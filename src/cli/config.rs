// config.rs - Configuration file support

use crate::core::method::MethodOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub sample_set: Option<String>,
    pub second_sample_set: Option<String>,
    pub output: Option<String>,
    pub analyze: Option<Vec<String>>,
    pub report: Option<String>,
    pub report_json: Option<String>,

    // Alignment run
    pub methods: Option<Vec<String>>,
    pub w0: Option<f64>,
    pub aligner: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,

    // Analysis
    pub normality_test: Option<String>,
    pub correlation: Option<String>,
    pub alpha: Option<f64>,
    pub tally_exclude: Option<String>,
    pub pairwise_legacy_rmsd: Option<bool>,

    // Flags
    pub progress: Option<bool>,
    pub dry_run: Option<bool>,

    /// Extra call options per method, `[method_options.<method>]`
    pub method_options: Option<BTreeMap<String, MethodOptions>>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Option arguments (`method:key=value`) for every configured method option
    pub fn method_option_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(tables) = &self.method_options {
            for (method, options) in tables {
                for (key, value) in options {
                    args.push(format!("{}:{}={}", method, key, value));
                }
            }
        }
        args
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# alignbench.toml - Configuration file for alignbench
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Sample set: one structure per line as id,name,group,species,chain
sample_set = "/path/to/structures.txt"

# Optional second sample set (every structure of the first set vs every one of this)
# second_sample_set = "/path/to/other_structures.txt"

# Canonical CSV written by the alignment run
output = "results/alignments.csv"

# Canonical CSV files to analyze instead of aligning
# analyze = ["results/programmatic.csv", "results/matchmaker.csv", "results/pymol.csv"]

# Analysis report files
# report = "results/report.txt"
# report_json = "results/report.json"

# =============================================================================
# ALIGNMENT RUN
# =============================================================================

# Methods driven through the aligner: mda, theseus, mmligner
methods = ["mda", "theseus", "mmligner"]

# Weighting constant of the MI metric
w0 = 1.5

# External aligner program; receives --method, --reference, --mobile,
# --reference-selection, --mobile-selection and --option key=value arguments
aligner = "align-structures"

# Include only structures whose id matches the regex pattern
# include = "^1.*"

# Exclude structures whose id matches the regex pattern
# exclude = "obsolete.*"

# =============================================================================
# ANALYSIS
# =============================================================================

# Distribution test: kstest, shapiro
normality_test = "kstest"

# Correlation coefficient: pearson, spearman, kendall
correlation = "pearson"

# Significance level of the pairwise Mann-Whitney tests
alpha = 0.05

# Method left out of the second best-method tally
tally_exclude = "mmligner"

# Compare the rmsd column for every metric label in the pairwise tests
pairwise_legacy_rmsd = false

# =============================================================================
# FLAGS
# =============================================================================

# Show a progress bar during the alignment run
progress = true

# Validate inputs without aligning or analyzing (dry run)
dry_run = false

# =============================================================================
# METHOD OPTIONS (extend or override the defaults)
# =============================================================================

[method_options.mda]
alignment_strategy = "clustalo"

[method_options.theseus]
sequence_alignment = "CLUSTALO"

# [method_options.mmligner]
# ivalue = "0.1"
"#
        .to_string()
    }
}
