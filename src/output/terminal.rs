// Colored terminal output for analysis reports.
//
// This module handles all terminal-specific formatting: colors and tables.
// main.rs delegates here when JSON output isn't requested.

use colored::Colorize;

use super::{single_line, truncate_chars};
use crate::report::{Report, SourceResult};
use crate::scoring::aggregate::Verdict;

/// Width of the source preview column.
const PREVIEW_CHARS: usize = 48;

/// Display a full report: input preview, one row per source, verdict.
pub fn display_report(report: &Report) {
    println!(
        "\n{}",
        format!("=== Plagiarism Report ({} sources) ===", report.results.len()).bold()
    );
    println!(
        "  Input: {}",
        truncate_chars(&single_line(&report.input), 72).dimmed()
    );

    if report.results.is_empty() {
        println!("\n  No sources supplied, nothing to compare against.");
        println!("\n  Verdict: {}", colorize_verdict(report.verdict));
        return;
    }

    let strategy_names: Vec<&str> = report.results[0].scores.names().collect();

    println!();
    let mut header = format!("  {:>3}  {:<width$}", "#", "Source", width = PREVIEW_CHARS + 3);
    for name in &strategy_names {
        header.push_str(&format!("  {:>8}", name));
    }
    header.push_str(&format!("  {:>9}  {}", "Aggregate", "Flag"));
    println!("{}", header.dimmed());
    println!("  {}", "-".repeat(header.len().saturating_sub(2)).dimmed());

    for (i, result) in report.results.iter().enumerate() {
        println!("{}", format_row(i + 1, result, &strategy_names));
    }

    println!();
    println!(
        "  Threshold: {:.2}  |  Flagged: {}/{}  |  Verdict: {}",
        report.threshold,
        report.flagged_count,
        report.results.len(),
        colorize_verdict(report.verdict)
    );

    if let Some(top) = report.highest().filter(|r| r.flagged) {
        println!(
            "  {} Closest match: {} ({:.2})",
            "!!".red().bold(),
            truncate_chars(&single_line(&top.source), PREVIEW_CHARS),
            top.aggregate_score
        );
    }
}

/// Display a one-line verdict for a batch entry.
pub fn display_verdict_line(label: &str, report: &Report) {
    let top = report
        .highest()
        .map(|r| format!("{:.2}", r.aggregate_score))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {:<40} {:<8}  flagged {}/{}  max {}",
        truncate_chars(label, 40),
        colorize_verdict(report.verdict),
        report.flagged_count,
        report.results.len(),
        top
    );
}

fn format_row(position: usize, result: &SourceResult, strategy_names: &[&str]) -> String {
    let preview = truncate_chars(&single_line(&result.source), PREVIEW_CHARS);
    let mut row = format!("  {:>3}. {:<width$}", position, preview, width = PREVIEW_CHARS + 3);
    for name in strategy_names {
        let score = result.score(name).unwrap_or(0.0);
        row.push_str(&format!("  {:>8.2}", score));
    }
    let aggregate = format!("{:>9.2}", result.aggregate_score);
    let (aggregate, flag) = if result.flagged {
        (aggregate.red().bold().to_string(), "!!".red().bold().to_string())
    } else {
        (aggregate.green().to_string(), "".to_string())
    };
    row.push_str(&format!("  {}  {}", aggregate, flag));
    row
}

/// Apply color to a verdict.
pub fn colorize_verdict(verdict: Verdict) -> String {
    match verdict {
        Verdict::Flagged => "FLAGGED".red().bold().to_string(),
        Verdict::Clear => "CLEAR".green().to_string(),
    }
}
