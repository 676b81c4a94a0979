// orchestrator.rs - Drives the programmatic aligners over every structure pair

use crate::core::aligner::{timed_align, AlignmentOutcome, AlignmentRequest, StructureAligner};
use crate::core::metrics::{round4, QualityScores};
use crate::core::method::{Method, MethodOptions, MethodTable};
use crate::data::record::{CanonicalRecord, Measurement};
use crate::data::SampleDescription;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress counters of a benchmark run (diagnostic only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub attempted: usize,
    pub failed: usize,
}

/// Output of one benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub records: Vec<CanonicalRecord>,
    pub counters: RunCounters,
}

/// Structure pairs to align.
///
/// One sample set: every unordered combination, reference before mobile in
/// list order. Two sample sets: the full cross product.
pub fn plan_pairs<'a>(
    first: &'a [SampleDescription],
    second: Option<&'a [SampleDescription]>,
) -> Vec<(&'a SampleDescription, &'a SampleDescription)> {
    match second {
        Some(second) => first
            .iter()
            .flat_map(|reference| second.iter().map(move |mobile| (reference, mobile)))
            .collect(),
        None => first
            .iter()
            .enumerate()
            .flat_map(|(i, reference)| first[i + 1..].iter().map(move |mobile| (reference, mobile)))
            .collect(),
    }
}

/// Turn one alignment outcome into its canonical record and advance the counters
pub fn record_for_outcome(
    method: Method,
    reference: &SampleDescription,
    mobile: &SampleDescription,
    outcome: &AlignmentOutcome,
    w0: f64,
    counters: RunCounters,
) -> (CanonicalRecord, RunCounters) {
    let mut counters = RunCounters {
        attempted: counters.attempted + 1,
        ..counters
    };

    let record = match outcome {
        AlignmentOutcome::Failed { .. } => {
            counters.failed += 1;
            CanonicalRecord::failed(method, reference, mobile)
        }
        AlignmentOutcome::ZeroCoverage { result, seconds } => {
            let measurement = Measurement {
                rmsd: result.scores.rmsd,
                coverage: result.scores.coverage,
                reference_size: result.metadata.reference_size,
                mobile_size: result.metadata.mobile_size,
                time: round4(*seconds),
            };
            CanonicalRecord::zero_coverage(method, reference, mobile, measurement)
        }
        AlignmentOutcome::Aligned { result, seconds } => {
            let measurement = Measurement {
                rmsd: result.scores.rmsd,
                coverage: result.scores.coverage,
                reference_size: result.metadata.reference_size,
                mobile_size: result.metadata.mobile_size,
                time: round4(*seconds),
            };
            // Full precision on this path; transcript parsers round.
            let scores = QualityScores::compute(
                measurement.rmsd,
                measurement.coverage,
                measurement.reference_size,
                measurement.mobile_size,
                w0,
            );
            CanonicalRecord::measured(method, reference, mobile, measurement, scores)
        }
    };

    (record, counters)
}

/// Sequential driver of one aligner over all methods and pairs
pub struct Orchestrator<A> {
    aligner: A,
    methods: MethodTable,
    w0: f64,
    show_progress: bool,
}

impl<A: StructureAligner> Orchestrator<A> {
    pub fn new(aligner: A, methods: MethodTable, w0: f64) -> Self {
        Self {
            aligner,
            methods,
            w0,
            show_progress: false,
        }
    }

    /// Show an interactive progress bar while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn into_aligner(self) -> A {
        self.aligner
    }

    /// Align every pair with every method, one call at a time.
    /// Failed calls become all-missing rows; the run always completes.
    pub fn run(
        &mut self,
        first: &[SampleDescription],
        second: Option<&[SampleDescription]>,
    ) -> BenchmarkRun {
        let pairs = plan_pairs(first, second);
        let total = (pairs.len() * self.methods.len()) as u64;
        let progress = self.progress_bar(total);

        let mut records = Vec::with_capacity(total as usize);
        let mut counters = RunCounters::default();

        let Self { aligner, methods, w0, .. } = self;
        for (method, options) in methods.iter() {
            for &(reference, mobile) in &pairs {
                progress.set_message(format!("{} {} {}", method, reference.id, mobile.id));
                let request = AlignmentRequest::new(method, reference, mobile, options);
                let (record, updated) = attempt(aligner, &request, *w0, counters, &progress);
                records.push(record);
                counters = updated;
                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        println!(
            "✅ Alignments attempted: {}, failed: {}",
            counters.attempted, counters.failed
        );

        BenchmarkRun { records, counters }
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}

fn attempt<A: StructureAligner>(
    aligner: &mut A,
    request: &AlignmentRequest,
    w0: f64,
    counters: RunCounters,
    progress: &ProgressBar,
) -> (CanonicalRecord, RunCounters) {
    let outcome = timed_align(aligner, request);

    if let AlignmentOutcome::Failed { reason } = &outcome {
        progress.println(format!(
            "⚠️  {} failed for {} vs {}: {}",
            request.method, request.reference.id, request.mobile.id, reason
        ));
    }

    record_for_outcome(request.method, request.reference, request.mobile, &outcome, w0, counters)
}
