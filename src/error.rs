// Configuration errors.
//
// Misconfiguration is reported at the point it happens (strategy construction,
// registration, engine construction, env loading) and never corrected
// silently. Library functions return anyhow::Result, so callers that need to
// tell these apart use `err.downcast_ref::<ConfigError>()`.

use thiserror::Error;

/// Errors raised when the engine or one of its strategies is misconfigured.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("n-gram width must be at least 1, got {0}")]
    InvalidNgramSize(usize),
    #[error("a strategy named '{0}' is already registered")]
    DuplicateStrategy(String),
    #[error("no strategies registered: register at least one before calling analyze")]
    NoStrategies,
    #[error("flagging threshold must be a finite number in [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),
    #[error("aggregate weight for '{strategy}' must be finite and non-negative, got {weight}")]
    InvalidWeight { strategy: String, weight: f64 },
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
    #[error("unknown strategy '{0}' (expected one of: ngram, cosine)")]
    UnknownStrategy(String),
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnvValue { var: String, value: String },
}

/// A strategy produced a value outside the score contract.
///
/// Kept apart from `ConfigError` because it surfaces during analysis, not
/// during setup.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("strategy '{strategy}' returned {value}, outside [0.0, 1.0]")]
pub struct ScoreOutOfRange {
    pub strategy: String,
    pub value: f64,
}
