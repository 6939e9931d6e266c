// Term-frequency cosine similarity strategy.
//
// Each text becomes a vector of word counts over the union vocabulary of the
// two texts. The score is the cosine of the angle between them:
//
//   score = (a · b) / (|a| * |b|)
//
// Word order is ignored and length differences are normalized away, so this
// complements the n-gram strategy: reordered or padded copies still score
// high here even when few exact phrases survive.

use std::collections::HashMap;

use anyhow::Result;

use super::traits::SimilarityStrategy;
use crate::text::tokenizer::{term_frequencies, tokenize};

/// Registry key for the cosine strategy.
pub const COSINE_STRATEGY_NAME: &str = "cosine";

/// Cosine similarity of term-frequency vectors. Stateless.
#[derive(Debug, Clone, Default)]
pub struct CosineStrategy;

impl CosineStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl SimilarityStrategy for CosineStrategy {
    fn name(&self) -> &str {
        COSINE_STRATEGY_NAME
    }

    fn score(&self, input: &str, source: &str) -> Result<f64> {
        let input_tokens = tokenize(input);
        let source_tokens = tokenize(source);

        Ok(cosine_from_counts(
            &term_frequencies(&input_tokens),
            &term_frequencies(&source_tokens),
        ))
    }
}

/// Cosine similarity between two sparse count vectors.
///
/// Keys missing from one map count as zero. Returns 0.0 when either vector
/// has zero norm, so an empty document is never "identical" to anything.
pub fn cosine_from_counts(counts_a: &HashMap<&str, usize>, counts_b: &HashMap<&str, usize>) -> f64 {
    // Sums stay in integers so the result is exact up to the final division;
    // identical vectors then come out as exactly 1.0 and a·b == b·a bit for bit.
    fn norm_sq(counts: &HashMap<&str, usize>) -> u128 {
        counts.values().map(|&c| (c as u128) * (c as u128)).sum()
    }

    let norm_a = norm_sq(counts_a);
    let norm_b = norm_sq(counts_b);

    if norm_a == 0 || norm_b == 0 {
        return 0.0;
    }

    let (smaller, larger) = if counts_a.len() <= counts_b.len() {
        (counts_a, counts_b)
    } else {
        (counts_b, counts_a)
    };
    let dot: u128 = smaller
        .iter()
        .filter_map(|(term, &count)| larger.get(term).map(|&other| (count as u128) * (other as u128)))
        .sum();

    let denom = ((norm_a as f64) * (norm_b as f64)).sqrt();
    (dot as f64 / denom).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        let score = CosineStrategy
            .score("the quick brown fox", "the quick brown fox")
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_reordered_text_is_identical() {
        let score = CosineStrategy
            .score("fox brown quick the", "the quick brown fox")
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_disjoint_vocabulary() {
        let score = CosineStrategy
            .score(
                "completely unrelated text here",
                "zero overlap whatsoever indeed",
            )
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(CosineStrategy.score("", "anything").unwrap(), 0.0);
        assert_eq!(CosineStrategy.score("anything", "").unwrap(), 0.0);
        assert_eq!(CosineStrategy.score("", "").unwrap(), 0.0);
    }

    #[test]
    fn test_known_value() {
        // a = {x:1, y:1}, b = {x:1} -> 1 / (sqrt(2) * 1)
        let score = CosineStrategy.score("x y", "x").unwrap();
        assert!(
            (score - 1.0 / 2f64.sqrt()).abs() < 1e-12,
            "Expected ~0.7071, got {score}"
        );
    }

    #[test]
    fn test_term_frequency_matters() {
        // Repeating a shared word pulls the vectors closer together
        let once = CosineStrategy.score("cat dog", "cat bird").unwrap();
        let repeated = CosineStrategy.score("cat cat cat dog", "cat cat cat bird").unwrap();
        assert!(repeated > once, "{repeated} should exceed {once}");
    }
}
