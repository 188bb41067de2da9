//! Behaviour programs built on the LP layer.
//!
//! - [`optimizer`] - maximize an inequality over the constrained behaviours
//! - [`verify`] - re-check a behaviour against every constraint row
//! - [`polish`] - clean LP round-off off an optimum before it is reported
//! - [`decompose`] - write a behaviour as a mixture of polytope vertices

pub mod decompose;
pub mod optimizer;
pub mod polish;
pub mod verify;

pub use decompose::{Component, DEFAULT_WEIGHT_THRESHOLD, Decomposition, decompose};
pub use optimizer::{OptimizationOutcome, maximize, maximize_str};
pub use polish::polish;
pub use verify::{Tolerances, VerificationReport, Violation, verify};
