use crate::{ConfigurationError, Reps, SetType};

#[derive(thiserror::Error, Debug)]
pub enum StrategyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("execution is already completed")]
    AlreadyCompleted,
    #[error("{actual} configuration passed to {expected} strategy")]
    ConfigurationMismatch { expected: SetType, actual: SetType },
    #[error("strategy failure: {0}")]
    Infrastructure(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StrategyError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, StrategyError::Validation(_))
    }
}

/// Hard failures that block progression.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("counts must be positive")]
    NonPositiveCounts,
    #[error("counts must be lower than 1000 ({0})")]
    CountsOutOfRange(u32),
    #[error("weight must not be negative ({0})")]
    NegativeWeight(f32),
    #[error("weight must be a finite number")]
    NonFiniteWeight,
    #[error("RPE must be in the range 1 to 10 ({0})")]
    RpeOutOfRange(f32),
    #[error("activation set needs at least {minimum} reps ({actual} < {minimum})")]
    InsufficientActivationReps { actual: Reps, minimum: Reps },
}
