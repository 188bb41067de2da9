//! Error types for linear programming operations.

use thiserror::Error;

/// Result type for optimization operations.
pub type OptimizeResult<T> = Result<T, OptimizeError>;

/// Errors that can occur while setting up or running an LP solve.
///
/// Infeasible and unbounded programs are not errors: they are reported through
/// [`LinProgStatus`](super::linprog::LinProgStatus) on a successful call.
#[derive(Debug, Clone, Error)]
pub enum OptimizeError {
    /// Invalid bounds for a variable.
    #[error("Invalid interval [{a}, {b}] in {context}: bounds must satisfy a <= b")]
    InvalidInterval { a: f64, b: f64, context: String },

    /// Invalid parameter value.
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Invalid input array size or dimensions.
    #[error("Invalid input in {context}")]
    InvalidInput { context: String },

    /// The requested backend was not compiled in.
    #[error("LP backend '{0}' is not available in this build")]
    BackendUnavailable(&'static str),

    /// Error reported by an external LP backend that is not a status.
    #[error("LP backend error: {0}")]
    Backend(String),
}
