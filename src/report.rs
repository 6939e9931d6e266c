// Analysis report: the value returned by one `analyze` call.
//
// Serialized shape (camelCase keys):
//
//   { input, threshold,
//     results: [ { source, scores: { <strategy>: number, ... },
//                  aggregateScore, flagged }, ... ],
//     verdict: "flagged" | "clear", flaggedCount }
//
// `results` follows the order sources were supplied in, and each `scores`
// object follows strategy registration order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::scoring::aggregate::Verdict;

/// Per-strategy scores for one source, in strategy registration order.
///
/// Behaves like an ordered map from strategy name to score. Serializes as a
/// JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyScores(Vec<(String, f64)>);

impl StrategyScores {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, strategy: impl Into<String>, score: f64) {
        self.0.push((strategy.into(), score));
    }

    /// Score recorded for `strategy`, if any.
    pub fn get(&self, strategy: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == strategy)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for StrategyScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for StrategyScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, score) in &self.0 {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StrategyScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = StrategyScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of strategy name to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = StrategyScores::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, score)) = access.next_entry::<String, f64>()? {
                    scores.push(name, score);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// One candidate source with its scores and flag status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResult {
    pub source: String,
    pub scores: StrategyScores,
    pub aggregate_score: f64,
    pub flagged: bool,
}

impl SourceResult {
    /// Score a named strategy gave this source.
    pub fn score(&self, strategy: &str) -> Option<f64> {
        self.scores.get(strategy)
    }
}

/// The full result of analyzing one input against its candidate sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub input: String,
    pub threshold: f64,
    pub results: Vec<SourceResult>,
    pub verdict: Verdict,
    pub flagged_count: usize,
}

impl Report {
    /// Assemble a report; verdict and flagged count are derived from `results`.
    pub fn new(input: impl Into<String>, threshold: f64, results: Vec<SourceResult>) -> Self {
        let flagged_count = results.iter().filter(|r| r.flagged).count();
        Self {
            input: input.into(),
            threshold,
            results,
            verdict: Verdict::from_flagged_count(flagged_count),
            flagged_count,
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.verdict == Verdict::Flagged
    }

    /// Flagged sources, in source order.
    pub fn flagged_sources(&self) -> impl Iterator<Item = &SourceResult> {
        self.results.iter().filter(|r| r.flagged)
    }

    /// The source with the highest aggregate score (first one on ties).
    pub fn highest(&self) -> Option<&SourceResult> {
        self.results.iter().fold(None, |best: Option<&SourceResult>, r| match best {
            Some(b) if b.aggregate_score >= r.aggregate_score => Some(b),
            _ => Some(r),
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(source: &str, aggregate: f64, flagged: bool) -> SourceResult {
        let mut scores = StrategyScores::default();
        scores.push("ngram", aggregate);
        scores.push("cosine", aggregate);
        SourceResult {
            source: source.to_string(),
            scores,
            aggregate_score: aggregate,
            flagged,
        }
    }

    #[test]
    fn test_report_derives_verdict() {
        let report = Report::new(
            "input",
            0.5,
            vec![result("a", 0.9, true), result("b", 0.1, false)],
        );
        assert_eq!(report.verdict, Verdict::Flagged);
        assert_eq!(report.flagged_count, 1);
        assert!(report.is_flagged());
        assert_eq!(report.flagged_sources().count(), 1);
    }

    #[test]
    fn test_empty_report_is_clear() {
        let report = Report::new("input", 0.5, vec![]);
        assert_eq!(report.verdict, Verdict::Clear);
        assert_eq!(report.flagged_count, 0);
        assert!(report.highest().is_none());
    }

    #[test]
    fn test_highest_prefers_first_on_tie() {
        let report = Report::new(
            "input",
            0.5,
            vec![
                result("a", 0.3, false),
                result("b", 0.7, true),
                result("c", 0.7, true),
            ],
        );
        assert_eq!(report.highest().unwrap().source, "b");
    }

    #[test]
    fn test_json_shape_and_key_order() {
        let mut scores = StrategyScores::default();
        scores.push("ngram", 1.0);
        scores.push("cosine", 0.5);
        let report = Report::new(
            "in",
            0.5,
            vec![SourceResult {
                source: "src".to_string(),
                scores,
                aggregate_score: 0.75,
                flagged: true,
            }],
        );

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"input":"in","threshold":0.5,"results":[{"source":"src","scores":{"ngram":1.0,"cosine":0.5},"aggregateScore":0.75,"flagged":true}],"verdict":"flagged","flaggedCount":1}"#
        );
    }

    #[test]
    fn test_json_parses_back_in_order() {
        let json = r#"{"input":"x","threshold":0.5,"results":[{"source":"s","scores":{"zeta":0.1,"alpha":0.2},"aggregateScore":0.15,"flagged":false}],"verdict":"clear","flaggedCount":0}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = report.results[0].scores.names().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(report.results[0].score("alpha"), Some(0.2));
        assert_eq!(report.verdict, Verdict::Clear);
    }
}
