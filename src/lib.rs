// lib.rs - alignbench library root

//! # alignbench - Benchmark harness for protein structural alignment methods
//!
//! This library runs pairwise structural alignments with several methods,
//! normalizes their results into one canonical record format, derives the
//! SI, MI and SAS quality metrics, and compares the methods statistically.
//!
//! ## Features
//!
//! - **Alignment orchestration**: every structure pair with every selected method, failures recorded, never fatal
//! - **Transcript parsers**: ingest logs of interactive matchmaker and pymol sessions
//! - **Canonical CSV**: fixed 19 column format, no header, empty field for missing values
//! - **Statistics**: distribution tests, ANOVA, Kruskal-Wallis, pairwise Mann-Whitney U, best-method tallies, correlations
//! - **Reports**: plain text and JSON with a provenance header
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use alignbench::prelude::*;
//!
//! let dataset = Dataset::from_csv_files(&["programmatic.csv", "matchmaker.csv", "pymol.csv"])?;
//! let report = run_analysis(&dataset, &AnalysisOptions::default());
//! println!("{}", render_report(&report));
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod output;
pub mod stats;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{AlignmentOutcome, AlignmentRequest, AlignmentResult, CommandAligner, StructureAligner};
    pub use crate::core::{Method, MethodTable, Orchestrator, QualityScores, DEFAULT_W0};
    pub use crate::data::{filter_samples, load_sample_set, CanonicalRecord, Column, Dataset, SampleDescription};
    pub use crate::output::{render_report, write_json_report, write_text_report};
    pub use crate::stats::{run_analysis, AnalysisOptions, AnalysisReport};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{Method, Orchestrator, QualityScores};
pub use data::{CanonicalRecord, Dataset, SampleDescription};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "alignbench v{} - Structural alignment benchmark toolkit",
        VERSION
    )
}
