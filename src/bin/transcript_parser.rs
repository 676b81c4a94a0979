// transcript_parser.rs - Convert interactive alignment session transcripts into canonical CSV

use alignbench::core::DEFAULT_W0;
use alignbench::data::loaders::{
    parse_matchmaker_transcript, parse_pymol_transcript, read_transcript_lines, write_records_to_path,
    RefinementStage,
};
use clap::{Arg, Command};
use std::str::FromStr;

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> Result<&'a String, String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| format!("--{} is required", name))
}

fn run() -> Result<(), String> {
    let matches = Command::new("Transcript Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts alignment results from matchmaker or pymol session transcripts")
        .arg(Arg::new("dialect")
            .long("dialect")
            .value_name("DIALECT")
            .help("Transcript dialect: matchmaker (HTML session log) or pymol")
            .value_parser(["matchmaker", "pymol"])
            .required(true))
        .arg(Arg::new("input")
            .long("input")
            .value_name("FILE")
            .help("Transcript file to parse")
            .required(true))
        .arg(Arg::new("output")
            .long("output")
            .value_name("FILE")
            .help("Canonical CSV file to write")
            .required(true))
        .arg(Arg::new("w0")
            .long("w0")
            .value_name("FLOAT")
            .help("Weighting constant of the MI metric")
            .default_value("1.5"))
        .arg(Arg::new("stage")
            .long("stage")
            .value_name("STAGE")
            .help("Result pair read from pymol transcripts: unrefined or refined")
            .default_value("unrefined"))
        .get_matches();

    let dialect = required(&matches, "dialect")?;
    let input = required(&matches, "input")?;
    let output = required(&matches, "output")?;
    let w0 = match matches.get_one::<String>("w0") {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|e| format!("Invalid w0 '{}': {}", raw, e))?,
        None => DEFAULT_W0,
    };
    if !(w0.is_finite() && w0 > 0.0) {
        return Err(format!("w0 must be a positive number, got {}", w0));
    }
    let stage = match matches.get_one::<String>("stage") {
        Some(raw) => RefinementStage::from_str(raw)?,
        None => RefinementStage::default(),
    };

    println!("🔍 Parsing {} transcript {}", dialect, input);
    let lines = read_transcript_lines(input)?;
    let records = match dialect.as_str() {
        "matchmaker" => parse_matchmaker_transcript(&lines, w0)?,
        _ => {
            println!("📊 Reading {} result pair", stage);
            parse_pymol_transcript(&lines, w0, stage)?
        }
    };

    let missing = records.iter().filter(|r| r.has_missing_scores()).count();
    println!("📊 Parsed {} alignments ({} with missing metrics)", records.len(), missing);
    write_records_to_path(output, &records)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}
