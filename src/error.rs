//! Crate-level error type.

use thiserror::Error;

use crate::behaviour::BehaviourError;
use crate::config::ConfigError;
use crate::inequality::InequalityError;
use crate::optimize::OptimizeError;

/// Any failure of a library operation.
///
/// Infeasible or unbounded programs are not errors; they are reported
/// through [`LinProgStatus`](crate::optimize::LinProgStatus).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inequality error: {0}")]
    Inequality(#[from] InequalityError),

    #[error("Behaviour error: {0}")]
    Behaviour(#[from] BehaviourError),

    #[error("LP error: {0}")]
    Optimize(#[from] OptimizeError),
}

/// Result type alias for lndpoly.
pub type Result<T> = std::result::Result<T, Error>;
