//! Property-based tests using proptest

use copycat::engine::PlagiarismEngine;
use copycat::strategies::cosine::CosineStrategy;
use copycat::strategies::ngram::NGramStrategy;
use copycat::strategies::traits::SimilarityStrategy;
use copycat::text::tokenizer::tokenize;
use proptest::prelude::*;

/// Short texts over a small vocabulary so random pairs actually overlap.
fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("the"),
            Just("cat"),
            Just("sat"),
            Just("on"),
            Just("mat"),
            Just("dog"),
            Just("ran"),
            Just(","),
            Just("!"),
            Just("  "),
        ],
        0..24,
    )
    .prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_ngram_score_in_range(a in text_strategy(), b in text_strategy(), n in 1usize..5) {
        let score = NGramStrategy::new(n).unwrap().score(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn test_cosine_score_in_range(a in text_strategy(), b in text_strategy()) {
        let score = CosineStrategy.score(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn test_arbitrary_unicode_never_panics(a in "\\PC{0,64}", b in "\\PC{0,64}") {
        let ngram = NGramStrategy::new(2).unwrap().score(&a, &b).unwrap();
        let cosine = CosineStrategy.score(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&ngram));
        prop_assert!((0.0..=1.0).contains(&cosine));
    }

    #[test]
    fn test_ngram_symmetric(a in text_strategy(), b in text_strategy(), n in 1usize..4) {
        let strategy = NGramStrategy::new(n).unwrap();
        prop_assert_eq!(strategy.score(&a, &b).unwrap(), strategy.score(&b, &a).unwrap());
    }

    #[test]
    fn test_cosine_symmetric(a in text_strategy(), b in text_strategy()) {
        prop_assert_eq!(CosineStrategy.score(&a, &b).unwrap(), CosineStrategy.score(&b, &a).unwrap());
    }

    #[test]
    fn test_ngram_self_similarity(t in text_strategy(), n in 1usize..5) {
        prop_assume!(tokenize(&t).len() >= n);
        let score = NGramStrategy::new(n).unwrap().score(&t, &t).unwrap();
        prop_assert_eq!(score, 1.0);
    }

    #[test]
    fn test_cosine_self_similarity(t in text_strategy()) {
        prop_assume!(!tokenize(&t).is_empty());
        prop_assert_eq!(CosineStrategy.score(&t, &t).unwrap(), 1.0);
    }

    #[test]
    fn test_report_order_and_shape(input in text_strategy(), sources in prop::collection::vec(text_strategy(), 0..6)) {
        let engine = PlagiarismEngine::new()
            .with_strategy(NGramStrategy::new(2).unwrap())
            .unwrap()
            .with_strategy(CosineStrategy)
            .unwrap();
        let report = engine.analyze_blocking(&input, &sources).unwrap();

        prop_assert_eq!(report.results.len(), sources.len());
        for (result, source) in report.results.iter().zip(&sources) {
            prop_assert_eq!(&result.source, source);
            prop_assert_eq!(result.scores.len(), 2);
            prop_assert!((0.0..=1.0).contains(&result.aggregate_score));
        }
        prop_assert_eq!(report.flagged_count, report.flagged_sources().count());
    }
}
