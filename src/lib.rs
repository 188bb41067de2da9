//! lndpoly - Linear programs over behaviours of the 2V measurement scenario
//!
//! Alice measures one of two dichotomic settings; Bob measures one of two
//! contexts, `(0,1)` or `(1,2)`, that share measurement 1. lndpoly maximizes
//! linear inequalities over the non-signaling, non-disturbing behaviours
//! bounded by the facets of the local polytope L, verifies the optimum, and
//! decomposes behaviours into deterministic vertices of Lnd and L.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      pipeline                            │
//! │        (config, facet loading, report assembly)          │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ uses
//! ┌──────────────────────────▼──────────────────────────────┐
//! │                      analysis                            │
//! │        (optimizer, verifier, vertex decomposition)       │
//! └──────┬─────────────────────┬─────────────────────┬──────┘
//!        │                     │                     │
//! ┌──────▼──────┐   ┌──────────▼─────────┐   ┌───────▼──────┐
//! │ constraints │   │      optimize      │   │   polytope   │
//! │ inequality  │   │ (simplex, minilp)  │   │  (vertices)  │
//! └──────┬──────┘   └────────────────────┘   └───────┬──────┘
//!        └───────────────┬───────────────────────────┘
//!                 ┌──────▼──────┐
//!                 │  behaviour  │
//!                 │ (variables) │
//!                 └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`behaviour`] - Outcome keys, the 32-variable index mapping, behaviours
//! - [`inequality`] - Inequality text format and the facets of L
//! - [`constraints`] - Normalization, non-signaling, non-disturbing and facet rows
//! - [`optimize`] - Dense LP form and its backends
//! - [`polytope`] - Deterministic vertices of Lnd and L
//! - [`analysis`] - Optimizer, verifier and decomposition
//! - [`pipeline`] - Configured runs producing a [`Report`]
//!
//! # Feature Flags
//!
//! | Feature  | Description | Dependencies |
//! |----------|-------------|--------------|
//! | `minilp` | `good_lp` backend solved by `minilp` (default) | good_lp |
//!
//! # Example
//!
//! ```
//! use lndpoly::{Config, Pipeline};
//! use lndpoly::article::ARTICLE_INEQUALITY;
//!
//! let pipeline = Pipeline::new(Config::default()).unwrap();
//! let outcome = pipeline.optimize(ARTICLE_INEQUALITY).unwrap();
//! assert!((outcome.value.unwrap() - 1.5).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod article;
pub mod behaviour;
pub mod config;
pub mod constraints;
pub mod error;
pub mod inequality;
pub mod optimize;
pub mod pipeline;
pub mod polytope;
pub mod report;

// Re-export main types for convenience
pub use analysis::{
    Decomposition, OptimizationOutcome, Tolerances, VerificationReport, Violation, decompose,
    maximize, verify,
};
pub use behaviour::{Behaviour, BehaviourError, OutcomeKey};
pub use config::{Config, ConfigError};
pub use constraints::{ConstraintKind, ConstraintSystem};
pub use error::{Error, Result};
pub use inequality::{FacetSet, Inequality, InequalityError};
pub use optimize::{LinProgOptions, LinProgStatus, LpBackend, OptimizeError};
pub use pipeline::Pipeline;
pub use polytope::{Polytope, Vertex, VertexSet, l_vertices, lnd_vertices};
pub use report::Report;
