// Analysis engine: orchestrates scoring for one input against many sources.
//
// For every source (in the order supplied) and every registered strategy (in
// registration order) the engine computes one score, then:
// 1. Aggregates the source's scores with the configured policy
// 2. Flags the source when the aggregate meets the threshold
// 3. Assembles the report with an overall verdict
//
// Every (source, strategy) cell is independent and pure, so rows run in
// parallel on the blocking pool. Results are collected back in source order
// regardless of which row finishes first.

pub mod registry;

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::error::{ConfigError, ScoreOutOfRange};
use crate::report::{Report, SourceResult, StrategyScores};
use crate::scoring::aggregate::{self, AggregatePolicy, DEFAULT_THRESHOLD};
use crate::strategies::traits::SimilarityStrategy;
use registry::StrategyRegistry;

/// Sources scored in parallel by `analyze` unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Engine-level settings. Thresholds are not per-strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Aggregate score at or above which a source is flagged (default 0.5)
    pub threshold: f64,
    /// How many source rows `analyze` scores at once (default 4)
    pub concurrency: usize,
    /// How strategy scores combine into the aggregate (default: mean)
    pub policy: AggregatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            concurrency: DEFAULT_CONCURRENCY,
            policy: AggregatePolicy::Mean,
        }
    }
}

impl EngineConfig {
    /// Reject out-of-range thresholds, zero concurrency and invalid weights.
    pub fn validate(&self) -> Result<()> {
        aggregate::validate_threshold(self.threshold)?;
        self.policy.validate()?;
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency.into());
        }
        Ok(())
    }
}

/// A plagiarism analysis engine with its own strategy list.
///
/// Engines share nothing: two engines with different strategies or
/// thresholds can be used side by side.
#[derive(Clone)]
pub struct PlagiarismEngine {
    config: EngineConfig,
    registry: StrategyRegistry,
}

impl Default for PlagiarismEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlagiarismEngine {
    /// An engine with default settings and no strategies.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            registry: StrategyRegistry::new(),
        }
    }

    /// An engine with validated custom settings.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: StrategyRegistry::new(),
        })
    }

    /// Shorthand for default settings with a custom threshold.
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        Self::with_config(EngineConfig {
            threshold,
            ..EngineConfig::default()
        })
    }

    /// Register a strategy. Duplicate names are rejected.
    pub fn register<S: SimilarityStrategy + 'static>(&mut self, strategy: S) -> Result<()> {
        self.registry.register(Arc::new(strategy))
    }

    /// Register an already boxed strategy (as built by `StrategyKind::build`).
    pub fn register_boxed(&mut self, strategy: Box<dyn SimilarityStrategy>) -> Result<()> {
        self.registry.register(Arc::from(strategy))
    }

    /// Builder-style registration.
    pub fn with_strategy<S: SimilarityStrategy + 'static>(mut self, strategy: S) -> Result<Self> {
        self.register(strategy)?;
        Ok(self)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Analyze `input` against every source, scoring rows in parallel.
    ///
    /// CPU-only: rows run on tokio's blocking pool and the report is
    /// assembled in source order. Must be called inside a tokio runtime.
    pub async fn analyze<S: AsRef<str> + Sync>(&self, input: &str, sources: &[S]) -> Result<Report> {
        self.require_strategies()?;

        let strategies: Arc<[Arc<dyn SimilarityStrategy>]> = Arc::from(self.registry.strategies());
        let shared_input: Arc<str> = Arc::from(input);

        let owned_sources: Vec<(usize, String)> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| (index, source.as_ref().to_string()))
            .collect();

        let rows: Vec<Result<StrategyScores>> =
            stream::iter(owned_sources.into_iter().map(|(index, source)| {
                let strategies = Arc::clone(&strategies);
                let input = Arc::clone(&shared_input);
                async move {
                    tokio::task::spawn_blocking(move || {
                        score_row(&strategies, &input, &source, index)
                    })
                    .await
                    .with_context(|| format!("scoring task for source #{index} did not complete"))
                    .and_then(|row| row)
                }
            }))
            .buffered(self.config.concurrency)
            .collect()
            .await;

        let mut results = Vec::with_capacity(sources.len());
        for (source, row) in sources.iter().zip(rows) {
            results.push(self.source_result(source.as_ref(), row?));
        }

        Ok(self.finish(input, results))
    }

    /// The same analysis as `analyze`, computed on the calling thread.
    pub fn analyze_blocking<S: AsRef<str>>(&self, input: &str, sources: &[S]) -> Result<Report> {
        self.require_strategies()?;

        let mut results = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let scores = score_row(self.registry.strategies(), input, source.as_ref(), index)?;
            results.push(self.source_result(source.as_ref(), scores));
        }

        Ok(self.finish(input, results))
    }

    fn require_strategies(&self) -> Result<()> {
        if self.registry.is_empty() {
            return Err(ConfigError::NoStrategies.into());
        }
        Ok(())
    }

    fn source_result(&self, source: &str, scores: StrategyScores) -> SourceResult {
        let aggregate_score = self.config.policy.aggregate(&scores);
        let flagged = aggregate::is_flagged(aggregate_score, self.config.threshold);

        debug!(
            aggregate = aggregate_score,
            flagged,
            source_chars = source.chars().count(),
            "Scored source"
        );

        SourceResult {
            source: source.to_string(),
            scores,
            aggregate_score,
            flagged,
        }
    }

    fn finish(&self, input: &str, results: Vec<SourceResult>) -> Report {
        let report = Report::new(input, self.config.threshold, results);
        info!(
            sources = report.results.len(),
            strategies = self.registry.len(),
            flagged = report.flagged_count,
            verdict = report.verdict.as_str(),
            "Analysis complete"
        );
        report
    }
}

/// Score one source with every strategy, in registration order.
///
/// Any strategy error, or a score outside [0.0, 1.0], fails the whole row.
fn score_row(
    strategies: &[Arc<dyn SimilarityStrategy>],
    input: &str,
    source: &str,
    index: usize,
) -> Result<StrategyScores> {
    let mut scores = StrategyScores::with_capacity(strategies.len());

    for strategy in strategies {
        let name = strategy.name();
        let score = strategy
            .score(input, source)
            .with_context(|| format!("strategy '{name}' failed on source #{index}"))?;

        if !(0.0..=1.0).contains(&score) {
            return Err(anyhow::Error::new(ScoreOutOfRange {
                strategy: name.to_string(),
                value: score,
            })
            .context(format!("invalid score for source #{index}")));
        }

        scores.push(name, score);
    }

    Ok(scores)
}
