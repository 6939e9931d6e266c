// Copycat: pluggable text-similarity analysis for plagiarism detection.
//
// This is the library root. Each module corresponds to one stage of the
// analysis: raw text is tokenized, scored by every registered strategy,
// aggregated per source and assembled into a report.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod report;
pub mod scoring;
pub mod strategies;
pub mod text;
