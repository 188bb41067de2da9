//! Linear programming layer.
//!
//! Every behaviour program (the facet optimization and both polytope
//! decompositions) is reduced to the dense form accepted by [`linprog`] and
//! handed to one of its backends.
//!
//! # Modules
//!
//! - [`linprog`] - LP problem types, dimension validation and backend dispatch
//! - [`error`] - Error type for malformed LP input
//!
//! # Quick Start
//!
//! ```
//! use lndpoly::optimize::{linprog, LinearConstraints, LinProgOptions};
//!
//! // Find convex weights with 0.25 * w0 + 0.75 * w1 == 0.5
//! let constraints = LinearConstraints {
//!     a_eq: Some(vec![vec![1.0, 1.0], vec![0.25, 0.75]]),
//!     b_eq: Some(vec![1.0, 0.5]),
//!     ..Default::default()
//! };
//! let result = linprog(&[0.0, 0.0], &constraints, &LinProgOptions::default()).unwrap();
//! assert!(result.is_optimal());
//! assert!((result.x[0] - 0.5).abs() < 1e-9);
//! ```

pub mod error;
pub mod linprog;
pub(crate) mod utils;

pub use error::{OptimizeError, OptimizeResult};
pub use linprog::{
    LinProgOptions, LinProgResult, LinProgStatus, LinearConstraints, LpBackend, linprog,
};
