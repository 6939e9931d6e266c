// Scoring: combining per-strategy scores into a verdict.

pub mod aggregate;
