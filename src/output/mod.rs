// mod.rs - Report formatters module

use crate::data::Column;
use crate::stats::analysis::{AnalysisReport, MetricTest};
use crate::stats::anova::AnovaTable;
use crate::stats::pairwise::PairwiseComparison;
use crate::stats::tally::BestMethodCounts;
use crate::stats::TestResult;
use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

fn value(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.4}", v),
        None => "NaN".to_string(),
    }
}

fn test_line(result: &TestResult) -> String {
    format!("statistic={:.6} pvalue={:.6e}", result.statistic, result.p_value)
}

fn render_tests(out: &mut String, title: &str, tests: &[MetricTest<TestResult>]) {
    let _ = writeln!(out, "\n== {} ==", title);
    for test in tests {
        match &test.outcome {
            Ok(result) => {
                let _ = writeln!(out, "{:<6} {}", test.metric.name(), test_line(result));
            }
            Err(reason) => {
                let _ = writeln!(out, "{:<6} not computed: {}", test.metric.name(), reason);
            }
        }
    }
}

fn render_anova(out: &mut String, tests: &[MetricTest<AnovaTable>]) {
    let _ = writeln!(out, "\n== One-way ANOVA (method) ==");
    for test in tests {
        let _ = writeln!(out, "-- {} --", test.metric.name());
        match &test.outcome {
            Ok(table) => {
                let _ = writeln!(out, "{:<10} {:>14} {:>6} {:>12} {:>12}", "", "sum_sq", "df", "F", "PR(>F)");
                let _ = writeln!(
                    out,
                    "{:<10} {:>14.6} {:>6} {:>12.6} {:>12.6e}",
                    "C(method)", table.factor.sum_sq, table.factor.df, table.f_statistic, table.p_value
                );
                let _ = writeln!(
                    out,
                    "{:<10} {:>14.6} {:>6} {:>12} {:>12}",
                    "Residual", table.residual.sum_sq, table.residual.df, "NaN", "NaN"
                );
            }
            Err(reason) => {
                let _ = writeln!(out, "not computed: {}", reason);
            }
        }
    }
}

fn render_comparisons(out: &mut String, title: &str, comparisons: &[PairwiseComparison]) {
    let _ = writeln!(out, "{}:", title);
    for c in comparisons {
        let compared = if c.compared != c.metric {
            format!(" (tested on {})", c.compared.name())
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {} {} vs {}{}: U={} pvalue={:.6e}",
            c.metric.name(),
            c.first,
            c.second,
            compared,
            c.result.statistic,
            c.result.p_value
        );
    }
}

fn render_counts(out: &mut String, counts: &[BestMethodCounts], suffix: &str) {
    for tally in counts {
        let _ = writeln!(out, "Counts of best values for {}{}:", tally.metric.name(), suffix);
        let mut ranked: Vec<_> = tally.counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (method, count) in ranked {
            let _ = writeln!(out, "  {:<11} {}", method.as_str(), count);
        }
    }
}

/// Render every section of the analysis as plain text
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Summary ({} rows) ==", report.rows);
    let _ = writeln!(
        out,
        "{:<11} {:>6} {:>8} {:>12} {:>16} {:>10}",
        "method", "rows", "rmsd", "missing SI", "rmsd without SI", "minutes"
    );
    for s in &report.summary {
        let rmsd = s.non_missing.get(&Column::Rmsd).copied().unwrap_or(0);
        let rmsd_without_si = s.missing_si_columns.get(&Column::Rmsd).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "{:<11} {:>6} {:>8} {:>12} {:>16} {:>10.2}",
            s.method.as_str(),
            s.rows,
            rmsd,
            s.missing_si_rows,
            rmsd_without_si,
            s.total_minutes
        );
    }

    render_tests(&mut out, &format!("Distribution ({})", report.normality_test.label()), &report.normality);
    render_anova(&mut out, &report.anova);
    render_tests(&mut out, "Kruskal-Wallis", &report.kruskal);

    let _ = writeln!(out, "\n== Mann-Whitney U (alpha {}) ==", report.pairwise.alpha);
    render_comparisons(&mut out, "Significant", &report.pairwise.significant);
    render_comparisons(&mut out, "Not significant", &report.pairwise.not_significant);
    if !report.pairwise.skipped.is_empty() {
        let _ = writeln!(out, "Skipped: {} method pairs without data", report.pairwise.skipped.len());
    }

    let _ = writeln!(out, "\n== Best method per structure pair ==");
    render_counts(&mut out, &report.tally.all_methods, "");
    render_counts(
        &mut out,
        &report.tally.without_excluded,
        &format!(" without {}", report.tally.excluded),
    );

    let _ = writeln!(out, "\n== Mean / median ==");
    for ct in &report.central_tendency {
        let _ = writeln!(out, "-- {} --", ct.method);
        for (column, mean) in &ct.means {
            let median = ct.medians.get(column).copied().flatten();
            let _ = writeln!(out, "  {:<15} mean={:>12} median={:>12}", column.name(), value(*mean), value(median));
        }
    }

    let matrix = &report.correlation;
    let _ = writeln!(out, "\n== {} correlation ==", matrix.method);
    let _ = write!(out, "{:<15}", "");
    for column in &matrix.columns {
        let _ = write!(out, " {:>15}", column.name());
    }
    let _ = writeln!(out);
    for (i, column) in matrix.columns.iter().enumerate() {
        let _ = write!(out, "{:<15}", column.name());
        for cell in &matrix.values[i] {
            let text = cell.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "NaN".to_string());
            let _ = write!(out, " {:>15}", text);
        }
        let _ = writeln!(out);
    }

    out
}

/// Write the text report with a command and timestamp header
pub fn write_text_report(file_path: &str, report: &AnalysisReport, command_line: &str) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# alignbench v{}", env!("CARGO_PKG_VERSION")).map_err(|e| format!("Write error: {}", e))?;
    write!(writer, "{}", render_report(report)).map_err(|e| format!("Write error: {}", e))?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Analysis report written to: {}", file_path);
    Ok(())
}

/// Write the report as JSON, wrapped with the same provenance fields
pub fn write_json_report(file_path: &str, report: &AnalysisReport, command_line: &str) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let document = serde_json::json!({
        "command": command_line,
        "generated": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        "version": env!("CARGO_PKG_VERSION"),
        "report": report,
    });
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|e| format!("Failed to encode JSON report: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ JSON report written to: {}", file_path);
    Ok(())
}
