// Similarity strategy trait: the pluggable detection contract.
//
// The engine only ever sees this trait. New detection approaches (fuzzy
// matching, fingerprint winnowing, ...) plug in by implementing it and being
// registered on an engine; nothing else in the pipeline changes.

use anyhow::Result;

/// A detection strategy that scores one (input, source) pair.
///
/// Implementations are CPU-only and must be safe to call from several
/// threads at once; the engine scores sources in parallel.
pub trait SimilarityStrategy: Send + Sync {
    /// Stable identifier used as the key in per-source score mappings.
    /// Must be unique within one engine.
    fn name(&self) -> &str;

    /// Score how similar `source` is to `input`.
    ///
    /// Must return a value in [0.0, 1.0], never NaN. Degenerate input
    /// (empty text, too few tokens) scores 0.0 rather than failing. An `Err`
    /// aborts the whole analysis.
    fn score(&self, input: &str, source: &str) -> Result<f64>;
}
