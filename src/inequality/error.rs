//! Error types for inequality parsing and facet files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading inequalities in the `±p<abc>|A<i>B<j>B<k> ... <= <n>` format.
#[derive(Debug, Error)]
pub enum InequalityError {
    #[error("missing '<=' separator")]
    MissingBound,

    #[error("invalid bound '{0}': expected an integer")]
    InvalidBound(String),

    #[error("inequality has no terms")]
    Empty,

    #[error("malformed term '{term}': {reason}")]
    MalformedTerm { term: String, reason: &'static str },

    #[error("invalid coefficient '{0}' in term")]
    InvalidCoefficient(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<InequalityError>,
    },

    #[error("failed to read facet file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InequalityError {
    pub(crate) fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}
