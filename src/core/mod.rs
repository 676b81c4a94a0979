// mod.rs - Core logic module

pub mod aligner;
pub mod metrics;
pub mod method;
pub mod orchestrator;

// Re-export main types for convenience
pub use aligner::{AlignmentOutcome, AlignmentRequest, AlignmentResult, CommandAligner, StructureAligner};
pub use metrics::{QualityScores, DEFAULT_W0};
pub use method::{Method, MethodOptions, MethodTable};
pub use orchestrator::{plan_pairs, BenchmarkRun, Orchestrator, RunCounters};
