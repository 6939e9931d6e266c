// Aggregate score and flagging policy.
//
// The default policy is the arithmetic mean of every strategy's score, so no
// strategy is implicitly privileged. The aggregate is a pure function of the
// per-strategy scores and is never re-derived from raw text.
//
// A source is flagged when its aggregate meets or exceeds the engine's
// threshold; a report is flagged when at least one source is.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::report::StrategyScores;

/// Flagging threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// How per-strategy scores are combined into one aggregate per source.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AggregatePolicy {
    /// Equal-weight arithmetic mean.
    #[default]
    Mean,
    /// Highest single strategy score.
    Max,
    /// Weighted mean. Strategies without an entry get weight 1.0.
    Weighted(HashMap<String, f64>),
}

impl AggregatePolicy {
    /// Build a weighted policy, rejecting negative or non-finite weights.
    pub fn weighted(weights: HashMap<String, f64>) -> Result<Self> {
        let policy = AggregatePolicy::Weighted(weights);
        policy.validate()?;
        Ok(policy)
    }

    /// Check weights: each finite and non-negative, with a finite total.
    ///
    /// Scores lie in [0.0, 1.0], so a valid policy never aggregates to NaN.
    pub fn validate(&self) -> Result<()> {
        let AggregatePolicy::Weighted(weights) = self else {
            return Ok(());
        };

        let mut total = 0.0;
        for (strategy, &weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    strategy: strategy.clone(),
                    weight,
                }
                .into());
            }
            total += weight;
        }
        if !total.is_finite() {
            return Err(ConfigError::InvalidWeight {
                strategy: "<total>".to_string(),
                weight: total,
            }
            .into());
        }
        Ok(())
    }

    /// Combine one source's strategy scores. Empty input aggregates to 0.0.
    pub fn aggregate(&self, scores: &StrategyScores) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }

        let value = match self {
            AggregatePolicy::Mean => {
                scores.iter().map(|(_, s)| s).sum::<f64>() / scores.len() as f64
            }
            AggregatePolicy::Max => scores.iter().map(|(_, s)| s).fold(0.0, f64::max),
            AggregatePolicy::Weighted(weights) => {
                let mut weighted_sum = 0.0;
                let mut total_weight = 0.0;
                for (name, score) in scores.iter() {
                    let weight = weights.get(name).copied().unwrap_or(1.0);
                    weighted_sum += score * weight;
                    total_weight += weight;
                }
                if total_weight == 0.0 {
                    0.0
                } else {
                    weighted_sum / total_weight
                }
            }
        };

        // Summation drift must not push a mean of 1.0s past the bound
        value.clamp(0.0, 1.0)
    }
}

/// Overall outcome of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Flagged,
    Clear,
}

impl Verdict {
    /// "flagged" if any source was flagged, else "clear".
    pub fn from_flagged_count(flagged_count: usize) -> Self {
        if flagged_count > 0 {
            Verdict::Flagged
        } else {
            Verdict::Clear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Flagged => "flagged",
            Verdict::Clear => "clear",
        }
    }
}

/// Check that a threshold is usable: finite and within [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::InvalidThreshold(threshold).into());
    }
    Ok(threshold)
}

/// Whether an aggregate score meets the flagging threshold (inclusive).
pub fn is_flagged(aggregate_score: f64, threshold: f64) -> bool {
    aggregate_score >= threshold
}
