// main.rs - CLI entry point

use alignbench::cli::Config;
use alignbench::core::plan_pairs;
use alignbench::data::loaders::write_records_to_path;
use alignbench::prelude::*;
use std::time::Instant;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    println!("🚀 alignbench v{}", env!("CARGO_PKG_VERSION"));

    // Validate all arguments
    let validation_result = validate_args(&args)?;

    if args.is_analysis() {
        run_analysis_mode(&args, &validation_result, &command_line)
    } else {
        run_alignment_mode(&args, validation_result)
    }
}

fn run_alignment_mode(args: &Args, validation_result: ValidationResult) -> Result<(), String> {
    let total_start = Instant::now();

    let load = |path: &str| -> Result<Vec<SampleDescription>, String> {
        let samples = load_sample_set(path)?;
        Ok(filter_samples(
            samples,
            validation_result.sample_include_regex.as_ref(),
            validation_result.sample_exclude_regex.as_ref(),
        ))
    };

    let first = load(args.sample_set.as_deref().ok_or("--sample-set is required")?)?;
    let second = args.second_sample_set.as_deref().map(load).transpose()?;
    let output = args.output.as_deref().ok_or("--output is required")?;
    let aligner_command = args.aligner.as_deref().ok_or("--aligner is required")?;

    let pair_count = plan_pairs(&first, second.as_deref()).len();
    let methods: Vec<String> = validation_result.methods.methods().map(|m| m.to_string()).collect();
    println!(
        "📊 {} structure pairs × {} methods ({})",
        pair_count,
        methods.len(),
        methods.join(", ")
    );
    for (method, options) in validation_result.methods.iter() {
        if !options.is_empty() {
            let rendered: Vec<String> = options.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            println!("⚙️  {} options: {}", method, rendered.join(", "));
        }
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let aligner = CommandAligner::from_command_line(aligner_command)?;
    let mut orchestrator = Orchestrator::new(aligner, validation_result.methods, args.w0)
        .with_progress(args.progress);
    let run = orchestrator.run(&first, second.as_deref());

    write_records_to_path(output, &run.records)?;

    if run.counters.failed > 0 {
        println!(
            "⚠️  {} of {} alignments failed; their rows carry missing metrics",
            run.counters.failed, run.counters.attempted
        );
    }
    println!("⏱️  Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn run_analysis_mode(args: &Args, validation_result: &ValidationResult, command_line: &str) -> Result<(), String> {
    let total_start = Instant::now();

    let dataset = Dataset::from_csv_files(&args.analyze)?;
    if dataset.is_empty() {
        return Err("No records to analyze".to_string());
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let report = run_analysis(&dataset, &validation_result.analysis);
    println!("\n{}", render_report(&report));

    if let Some(path) = &args.report {
        write_text_report(path, &report, command_line)?;
    }
    if let Some(path) = &args.report_json {
        write_json_report(path, &report, command_line)?;
    }

    println!("⏱️  Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
