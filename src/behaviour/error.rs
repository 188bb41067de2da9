//! Error types for behaviour construction and lookup.

use thiserror::Error;

use super::index::OutcomeKey;

/// Result type for behaviour operations.
pub type BehaviourResult<T> = Result<T, BehaviourError>;

/// Errors raised when a key or vector does not fit the 2V variable model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviourError {
    #[error("outcome key {key} is not a variable of the scenario: {reason}")]
    UnknownKey {
        key: OutcomeKey,
        reason: &'static str,
    },

    #[error("expected {expected} entries, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("duplicate entry for {0}")]
    DuplicateKey(OutcomeKey),

    #[error("probability {value} for {key} is not finite")]
    NonFinite { key: OutcomeKey, value: f64 },
}
