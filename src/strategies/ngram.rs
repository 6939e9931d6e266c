// N-gram overlap strategy.
//
// Both texts are cut into shingles of `n` consecutive tokens and compared as
// sets:
//
//   score = |shingles_a ∩ shingles_b| / |shingles_a ∪ shingles_b|
//
// Shingles capture exact phrase reuse. Small `n` catches looser reuse at the
// cost of more false positives; large `n` only fires on verbatim copying.

use anyhow::Result;

use super::traits::SimilarityStrategy;
use crate::error::ConfigError;
use crate::text::tokenizer::{shingles, tokenize};

/// Default registry key for the n-gram strategy.
pub const NGRAM_STRATEGY_NAME: &str = "ngram";

/// Jaccard overlap of word shingles.
#[derive(Debug, Clone)]
pub struct NGramStrategy {
    n: usize,
    name: String,
}

impl NGramStrategy {
    /// Create an n-gram strategy with shingle width `n`.
    ///
    /// Fails with `ConfigError::InvalidNgramSize` when `n` is zero.
    pub fn new(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(ConfigError::InvalidNgramSize(n).into());
        }
        Ok(Self {
            n,
            name: NGRAM_STRATEGY_NAME.to_string(),
        })
    }

    /// Override the registry key, e.g. to register two widths on one engine.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Shingle width.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl SimilarityStrategy for NGramStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, input: &str, source: &str) -> Result<f64> {
        let input_shingles = shingles(&tokenize(input), self.n);
        let source_shingles = shingles(&tokenize(source), self.n);

        // Two texts too short to shingle are never claimed identical
        if input_shingles.is_empty() && source_shingles.is_empty() {
            return Ok(0.0);
        }

        let (smaller, larger) = if input_shingles.len() <= source_shingles.len() {
            (&input_shingles, &source_shingles)
        } else {
            (&source_shingles, &input_shingles)
        };
        let intersection = smaller.iter().filter(|s| larger.contains(*s)).count();
        let union = input_shingles.len() + source_shingles.len() - intersection;

        Ok(intersection as f64 / union as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_rejected() {
        let err = NGramStrategy::new(0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidNgramSize(0))
        );
    }

    #[test]
    fn test_identical_texts() {
        let strategy = NGramStrategy::new(2).unwrap();
        let score = strategy
            .score("the quick brown fox", "the quick brown fox")
            .unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON, "Expected 1.0, got {score}");
    }

    #[test]
    fn test_no_shared_shingles() {
        let strategy = NGramStrategy::new(2).unwrap();
        let score = strategy
            .score(
                "completely unrelated text here",
                "zero overlap whatsoever indeed",
            )
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // Bigrams: {a b, b c, c d} vs {a b, b c, c e} -> 2 shared / 4 total
        let strategy = NGramStrategy::new(2).unwrap();
        let score = strategy.score("a b c d", "a b c e").unwrap();
        assert!((score - 0.5).abs() < 1e-12, "Expected 0.5, got {score}");
    }

    #[test]
    fn test_both_too_short_scores_zero() {
        let strategy = NGramStrategy::new(5).unwrap();
        assert_eq!(strategy.score("short text", "short text").unwrap(), 0.0);
    }

    #[test]
    fn test_one_side_too_short_scores_zero() {
        let strategy = NGramStrategy::new(3).unwrap();
        assert_eq!(strategy.score("", "one two three four").unwrap(), 0.0);
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let strategy = NGramStrategy::new(3).unwrap();
        let score = strategy
            .score("The Quick, Brown Fox!", "the quick brown fox")
            .unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_name() {
        let strategy = NGramStrategy::new(4).unwrap().with_name("ngram-4");
        assert_eq!(strategy.name(), "ngram-4");
        assert_eq!(strategy.n(), 4);
    }
}
