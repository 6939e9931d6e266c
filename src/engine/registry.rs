// Ordered strategy registry owned by one engine.
//
// Registration order is iteration order, which fixes the key order of every
// per-source score mapping. Names must be unique: a duplicate would make two
// strategies write to the same score key.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::error::ConfigError;
use crate::strategies::traits::SimilarityStrategy;

#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn SimilarityStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy. Fails with `ConfigError::DuplicateStrategy` if its
    /// name is taken; the registry is left unchanged in that case.
    pub fn register(&mut self, strategy: Arc<dyn SimilarityStrategy>) -> Result<()> {
        let name = strategy.name();
        if self.contains(name) {
            return Err(ConfigError::DuplicateStrategy(name.to_string()).into());
        }
        debug!(strategy = name, position = self.strategies.len(), "Registered strategy");
        self.strategies.push(strategy);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn strategies(&self) -> &[Arc<dyn SimilarityStrategy>] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
