// Similarity strategies: trait-based abstraction for swappable detectors.
//
// The SimilarityStrategy trait defines the interface. NGramStrategy and
// CosineStrategy are the built-in implementations; StrategyKind lets config
// and the CLI build them by name.

pub mod cosine;
pub mod ngram;
pub mod traits;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use crate::error::ConfigError;
use cosine::{CosineStrategy, COSINE_STRATEGY_NAME};
use ngram::{NGramStrategy, NGRAM_STRATEGY_NAME};
use traits::SimilarityStrategy;

/// The built-in strategies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    NGram,
    Cosine,
}

impl StrategyKind {
    /// Construct the strategy. `ngram_size` is only used by `NGram`.
    pub fn build(self, ngram_size: usize) -> Result<Box<dyn SimilarityStrategy>> {
        Ok(match self {
            StrategyKind::NGram => Box::new(NGramStrategy::new(ngram_size)?),
            StrategyKind::Cosine => Box::new(CosineStrategy::new()),
        })
    }

    /// Parse a comma-separated list such as `"ngram,cosine"`.
    pub fn parse_list(list: &str) -> Result<Vec<StrategyKind>> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| name.parse())
            .collect()
    }
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            NGRAM_STRATEGY_NAME | "n-gram" => Ok(StrategyKind::NGram),
            COSINE_STRATEGY_NAME => Ok(StrategyKind::Cosine),
            _ => Err(ConfigError::UnknownStrategy(s.to_string()).into()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::NGram => f.write_str(NGRAM_STRATEGY_NAME),
            StrategyKind::Cosine => f.write_str(COSINE_STRATEGY_NAME),
        }
    }
}
