use std::env;
use std::str::FromStr;

use anyhow::Result;

use crate::engine::{EngineConfig, PlagiarismEngine, DEFAULT_CONCURRENCY};
use crate::error::ConfigError;
use crate::scoring::aggregate::{self, AggregatePolicy, DEFAULT_THRESHOLD};
use crate::strategies::StrategyKind;

/// Shingle width used when COPYCAT_NGRAM_SIZE is unset.
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Values given on the command line. Each `Some` replaces the environment's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub threshold: Option<f64>,
    pub ngram_size: Option<usize>,
    pub strategies: Option<Vec<StrategyKind>>,
    pub concurrency: Option<usize>,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override
/// whatever is read here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Aggregate score at or above which a source is flagged
    pub threshold: f64,
    /// Shingle width for the n-gram strategy
    pub ngram_size: usize,
    /// Strategies to register, in registration order
    pub strategies: Vec<StrategyKind>,
    /// Sources scored in parallel per analysis
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ngram_size: DEFAULT_NGRAM_SIZE,
            strategies: vec![StrategyKind::NGram, StrategyKind::Cosine],
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Every variable is optional, but a set variable that doesn't parse is
    /// an error rather than a silent fallback to the default.
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read environment variables without range-checking them.
    ///
    /// For callers that apply overrides (CLI flags) first and then call
    /// `validate` once on the merged result.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let strategies = match env::var("COPYCAT_STRATEGIES") {
            Ok(list) => StrategyKind::parse_list(&list)?,
            Err(_) => defaults.strategies,
        };

        Ok(Self {
            threshold: parse_var("COPYCAT_THRESHOLD")?.unwrap_or(defaults.threshold),
            ngram_size: parse_var("COPYCAT_NGRAM_SIZE")?.unwrap_or(defaults.ngram_size),
            strategies,
            concurrency: parse_var("COPYCAT_CONCURRENCY")?.unwrap_or(defaults.concurrency),
        })
    }

    /// Apply overrides, then validate the merged configuration once.
    ///
    /// An out-of-range environment value that an override replaces is
    /// never checked.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(threshold) = overrides.threshold {
            self.threshold = threshold;
        }
        if let Some(ngram_size) = overrides.ngram_size {
            self.ngram_size = ngram_size;
        }
        if let Some(strategies) = overrides.strategies {
            self.strategies = strategies;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check ranges and that at least one strategy is selected.
    pub fn validate(&self) -> Result<()> {
        aggregate::validate_threshold(self.threshold)?;
        if self.ngram_size == 0 {
            return Err(ConfigError::InvalidNgramSize(self.ngram_size).into());
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency.into());
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies.into());
        }
        Ok(())
    }

    /// Build an engine with every configured strategy registered.
    pub fn build_engine(&self) -> Result<PlagiarismEngine> {
        let mut engine = PlagiarismEngine::with_config(EngineConfig {
            threshold: self.threshold,
            concurrency: self.concurrency,
            policy: AggregatePolicy::Mean,
        })?;
        for kind in &self.strategies {
            engine.register_boxed(kind.build(self.ngram_size)?)?;
        }
        Ok(engine)
    }
}

/// Read and parse an optional environment variable.
fn parse_var<T: FromStr>(var: &str) -> Result<Option<T>> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::InvalidEnvValue {
                var: var.to_string(),
                value,
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
