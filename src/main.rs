use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use copycat::config::{Config, ConfigOverrides};
use copycat::error::ConfigError;
use copycat::engine::PlagiarismEngine;
use copycat::output::terminal;
use copycat::report::Report;
use copycat::strategies::StrategyKind;

/// Copycat: pluggable text-similarity analysis for plagiarism detection.
///
/// Scores an input text against candidate sources with several independent
/// strategies (n-gram overlap, term-frequency cosine) and flags sources
/// whose combined score crosses a threshold.
#[derive(Parser)]
#[command(name = "copycat", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Engine settings shared by every subcommand. Unset flags fall back to the
/// COPYCAT_* environment variables, then to built-in defaults.
#[derive(clap::Args)]
struct EngineArgs {
    /// Flag sources whose aggregate score is at or above this (0.0-1.0)
    #[arg(long)]
    threshold: Option<f64>,

    /// Shingle width for the n-gram strategy
    #[arg(long)]
    ngram: Option<usize>,

    /// Comma-separated strategies to run, in order (ngram, cosine)
    #[arg(long)]
    strategies: Option<String>,

    /// Sources scored in parallel within one analysis
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in demo corpus
    Demo {
        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Analyze one input file against one or more source files
    Analyze {
        /// Input file to check (use - to read from stdin)
        input: PathBuf,

        /// Candidate source files, compared in the order given
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Analyze several input files against every file in a directory
    Batch {
        /// Directory of candidate source files
        sources_dir: PathBuf,

        /// Input files to check
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Input files analyzed in parallel. Each one also scores up to
        /// --concurrency sources at once, so total parallelism is jobs x concurrency
        #[arg(long, default_value = "2")]
        jobs: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

const DEMO_INPUT: &str = "The quick brown fox jumps over the lazy dog. Plagiarism is the act of \
    taking someone else's work or ideas and passing them off as one's own.";

const DEMO_SOURCES: [&str; 3] = [
    "The quick brown fox jumps over the lazy dog in the forest.",
    "Plagiarism involves taking some other person's work or idea and passing it off as yours.",
    "This is a completely unrelated sentence that should have zero score.",
];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("copycat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { engine: args } => {
            let config = resolve_config(&args)?;
            let engine = config.build_engine()?;

            info!(strategies = ?engine.strategy_names(), "Running demo analysis");
            if !args.json {
                println!("{}", "--- Plagiarism Analysis Demo ---".bold());
            }

            let report = engine.analyze(DEMO_INPUT, &DEMO_SOURCES).await?;
            print_report(&report, args.json)?;
        }

        Commands::Analyze {
            input,
            sources,
            engine: args,
        } => {
            let config = resolve_config(&args)?;
            let engine = config.build_engine()?;

            let input_text = read_input(&input)?;
            let source_texts = sources
                .iter()
                .map(|path| read_text(path))
                .collect::<Result<Vec<String>>>()?;

            info!(
                input = %input.display(),
                sources = source_texts.len(),
                "Analyzing input"
            );

            let report = engine.analyze(&input_text, &source_texts).await?;
            print_report(&report, args.json)?;
        }

        Commands::Batch {
            sources_dir,
            inputs,
            jobs,
            engine: args,
        } => {
            if jobs == 0 {
                return Err(ConfigError::InvalidConcurrency.into());
            }
            let config = resolve_config(&args)?;
            let engine = config.build_engine()?;

            let source_paths = list_source_files(&sources_dir)?;
            if source_paths.is_empty() {
                warn!(dir = %sources_dir.display(), "Source directory has no files");
            }
            let source_texts = source_paths
                .iter()
                .map(|path| read_text(path))
                .collect::<Result<Vec<String>>>()?;

            info!(
                inputs = inputs.len(),
                sources = source_texts.len(),
                jobs,
                concurrency = config.concurrency,
                "Starting batch analysis"
            );

            let reports = run_batch(&engine, &inputs, &source_texts, jobs, args.json)
                .await?;

            if args.json {
                let entries: Vec<serde_json::Value> = inputs
                    .iter()
                    .zip(&reports)
                    .map(|(path, report)| {
                        serde_json::json!({
                            "file": path.display().to_string(),
                            "report": report,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!(
                    "\n{}",
                    format!(
                        "=== Batch Results ({} inputs x {} sources) ===",
                        inputs.len(),
                        source_texts.len()
                    )
                    .bold()
                );
                for (path, report) in inputs.iter().zip(&reports) {
                    terminal::display_verdict_line(&path.display().to_string(), report);
                }
                let flagged = reports.iter().filter(|r| r.is_flagged()).count();
                println!("\n  {} of {} inputs flagged", flagged, reports.len());
            }
        }
    }

    Ok(())
}

/// Merge CLI flags over the environment configuration, validating once.
fn resolve_config(args: &EngineArgs) -> Result<Config> {
    let strategies = args
        .strategies
        .as_deref()
        .map(StrategyKind::parse_list)
        .transpose()?;

    Config::from_env()?.with_overrides(ConfigOverrides {
        threshold: args.threshold,
        ngram_size: args.ngram,
        strategies,
        concurrency: args.concurrency,
    })
}

/// Analyze every input against the shared sources, showing progress.
///
/// Inputs are read and analyzed concurrently; reports come back in the
/// order the inputs were given.
async fn run_batch(
    engine: &PlagiarismEngine,
    inputs: &[PathBuf],
    sources: &[String],
    jobs: usize,
    quiet: bool,
) -> Result<Vec<Report>> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(inputs.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress bar template")?
            .progress_chars("=> "),
    );

    let results: Vec<Result<Report>> = stream::iter(inputs.iter().map(|path| {
        let progress = progress.clone();
        async move {
            let text = read_text(path)?;
            let report = engine.analyze(&text, sources).await?;
            progress.set_message(path.display().to_string());
            progress.inc(1);
            Ok::<Report, anyhow::Error>(report)
        }
    }))
    .buffered(jobs)
    .collect()
    .await;

    progress.finish_and_clear();
    results.into_iter().collect()
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json_pretty()?);
    } else {
        terminal::display_report(report);
    }
    Ok(())
}

/// Read the input text, with `-` meaning stdin.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read input from stdin")?;
        return Ok(text);
    }
    read_text(path)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Regular files in `dir`, sorted by name so source order is stable.
fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to list source directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_jobs_and_concurrency_are_separate() {
        let cli = Cli::try_parse_from([
            "copycat",
            "batch",
            "sources",
            "a.txt",
            "b.txt",
            "--jobs",
            "3",
            "--concurrency",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Batch {
                inputs,
                jobs,
                engine,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(jobs, 3);
                assert_eq!(engine.concurrency, Some(5));
            }
            _ => panic!("expected batch subcommand"),
        }
    }

    #[test]
    fn test_batch_jobs_default() {
        let cli = Cli::try_parse_from(["copycat", "batch", "sources", "a.txt"]).unwrap();
        match cli.command {
            Commands::Batch { jobs, engine, .. } => {
                assert_eq!(jobs, 2);
                assert_eq!(engine.concurrency, None);
            }
            _ => panic!("expected batch subcommand"),
        }
    }
}
