//! Linear Programming algorithms.
//!
//! This module provides the LP layer every behaviour program goes through:
//! - [`LpBackend::Simplex`] - dense two-phase simplex (always available)
//! - [`LpBackend::Minilp`] - `good_lp` model solved by `minilp` (feature `minilp`)
//!
//! # Linear Programming Problem
//!
//! Minimize: c^T * x
//! Subject to:
//!   A_ub * x <= b_ub  (inequality constraints)
//!   A_eq * x == b_eq  (equality constraints)
//!   lb <= x <= ub     (bounds)
//!
//! # Example
//!
//! ```
//! use lndpoly::optimize::linprog::{linprog, LinearConstraints, LinProgOptions, LinProgStatus};
//!
//! // Minimize -x - 2y subject to:
//! //   x + y <= 4
//! //   x <= 2
//! //   y <= 3
//! //   x, y >= 0
//! let c = vec![-1.0, -2.0];
//! let constraints = LinearConstraints {
//!     a_ub: Some(vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]),
//!     b_ub: Some(vec![4.0, 2.0, 3.0]),
//!     a_eq: None,
//!     b_eq: None,
//!     bounds: None,
//! };
//!
//! let result = linprog(&c, &constraints, &LinProgOptions::default()).unwrap();
//! assert_eq!(result.status, LinProgStatus::Optimal);
//! assert!((result.fun + 7.0).abs() < 1e-9);
//! ```

#[cfg(feature = "minilp")]
mod minilp;
mod simplex;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{OptimizeError, OptimizeResult};

/// Which solver runs a linear program.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LpBackend {
    /// Built-in dense two-phase simplex with Bland's rule.
    #[default]
    Simplex,
    /// `good_lp` with the pure-Rust `minilp` solver.
    Minilp,
}

impl fmt::Display for LpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simplex => f.write_str("simplex"),
            Self::Minilp => f.write_str("minilp"),
        }
    }
}

/// Options for linear programming solvers.
#[derive(Debug, Clone)]
pub struct LinProgOptions {
    /// Solver implementation.
    pub backend: LpBackend,
    /// Maximum number of pivots (simplex only).
    pub max_iter: usize,
    /// Pivot and reduced-cost tolerance.
    pub tol: f64,
    /// Largest phase-one residual still accepted as feasible.
    pub feasibility_tol: f64,
}

impl Default for LinProgOptions {
    fn default() -> Self {
        Self {
            backend: LpBackend::default(),
            max_iter: 20_000,
            tol: 1e-9,
            feasibility_tol: 1e-7,
        }
    }
}

/// Linear constraints for LP problems.
#[derive(Debug, Clone, Default)]
pub struct LinearConstraints {
    /// Inequality constraint matrix (A_ub * x <= b_ub).
    pub a_ub: Option<Vec<Vec<f64>>>,
    /// Inequality constraint bounds.
    pub b_ub: Option<Vec<f64>>,
    /// Equality constraint matrix (A_eq * x == b_eq).
    pub a_eq: Option<Vec<Vec<f64>>>,
    /// Equality constraint bounds.
    pub b_eq: Option<Vec<f64>>,
    /// Variable bounds as (lower, upper) pairs. Defaults to [0, inf) when absent.
    pub bounds: Option<Vec<(f64, f64)>>,
}

/// Termination status of an LP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinProgStatus {
    /// An optimal (for feasibility programs: a feasible) point was found.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// The objective is unbounded below on the feasible set.
    Unbounded,
    /// The pivot budget ran out before termination.
    IterationLimit,
}

impl fmt::Display for LinProgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => f.write_str("optimal"),
            Self::Infeasible => f.write_str("infeasible"),
            Self::Unbounded => f.write_str("unbounded"),
            Self::IterationLimit => f.write_str("iteration limit reached"),
        }
    }
}

/// Result of linear programming optimization.
#[derive(Debug, Clone)]
pub struct LinProgResult {
    /// Solution vector; all zeros unless `status` is optimal.
    pub x: Vec<f64>,
    /// Objective value at `x`; infinite unless `status` is optimal.
    pub fun: f64,
    /// Termination status. Check it before reading `x` or `fun`.
    pub status: LinProgStatus,
    /// Number of pivots performed (0 for external backends).
    pub nit: usize,
}

impl LinProgResult {
    /// Whether the solve terminated at an optimum.
    pub fn is_optimal(&self) -> bool {
        self.status == LinProgStatus::Optimal
    }

    pub(crate) fn without_solution(n: usize, status: LinProgStatus, nit: usize) -> Self {
        let fun = match status {
            LinProgStatus::Unbounded => f64::NEG_INFINITY,
            _ => f64::INFINITY,
        };
        Self {
            x: vec![0.0; n],
            fun,
            status,
            nit,
        }
    }
}

/// Solve a linear programming problem with the backend selected in `options`.
///
/// Minimize: c^T * x
/// Subject to:
///   A_ub * x <= b_ub
///   A_eq * x == b_eq
///   bounds.0 <= x <= bounds.1
///
/// Infeasibility and unboundedness are reported through
/// [`LinProgResult::status`]; only malformed input is an error.
pub fn linprog(
    c: &[f64],
    constraints: &LinearConstraints,
    options: &LinProgOptions,
) -> OptimizeResult<LinProgResult> {
    let n = c.len();
    if n == 0 {
        return Err(OptimizeError::InvalidInput {
            context: "linprog: empty objective vector".to_string(),
        });
    }

    validate_constraints(n, constraints)?;

    let result = match options.backend {
        LpBackend::Simplex => simplex::simplex(c, constraints, options)?,
        #[cfg(feature = "minilp")]
        LpBackend::Minilp => minilp::solve(c, constraints)?,
        #[cfg(not(feature = "minilp"))]
        LpBackend::Minilp => return Err(OptimizeError::BackendUnavailable("minilp")),
    };

    debug!(
        backend = %options.backend,
        vars = n,
        status = %result.status,
        nit = result.nit,
        "linprog finished"
    );
    Ok(result)
}

/// Validate constraint dimensions.
pub(crate) fn validate_constraints(
    n: usize,
    constraints: &LinearConstraints,
) -> OptimizeResult<()> {
    validate_block("A_ub", "b_ub", n, &constraints.a_ub, &constraints.b_ub)?;
    validate_block("A_eq", "b_eq", n, &constraints.a_eq, &constraints.b_eq)?;

    if let Some(ref bounds) = constraints.bounds {
        if bounds.len() != n {
            return Err(OptimizeError::InvalidInput {
                context: format!(
                    "linprog: bounds has {} elements, expected {}",
                    bounds.len(),
                    n
                ),
            });
        }
        for (i, &(lb, ub)) in bounds.iter().enumerate() {
            if lb > ub {
                return Err(OptimizeError::InvalidInterval {
                    a: lb,
                    b: ub,
                    context: format!("linprog: invalid bounds for variable {}", i),
                });
            }
        }
    }

    Ok(())
}

fn validate_block(
    a_name: &str,
    b_name: &str,
    n: usize,
    a: &Option<Vec<Vec<f64>>>,
    b: &Option<Vec<f64>>,
) -> OptimizeResult<()> {
    match (a, b) {
        (None, None) => Ok(()),
        (Some(a), Some(b)) => {
            for (i, row) in a.iter().enumerate() {
                if row.len() != n {
                    return Err(OptimizeError::InvalidInput {
                        context: format!(
                            "linprog: {} row {} has {} columns, expected {}",
                            a_name,
                            i,
                            row.len(),
                            n
                        ),
                    });
                }
            }
            if b.len() != a.len() {
                return Err(OptimizeError::InvalidInput {
                    context: format!(
                        "linprog: {} has {} elements, {} has {} rows",
                        b_name,
                        b.len(),
                        a_name,
                        a.len()
                    ),
                });
            }
            Ok(())
        }
        (Some(_), None) => Err(OptimizeError::InvalidInput {
            context: format!("linprog: {} provided but {} is missing", a_name, b_name),
        }),
        (None, Some(_)) => Err(OptimizeError::InvalidInput {
            context: format!("linprog: {} provided but {} is missing", b_name, a_name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linprog_canonical_form() {
        // max 3x + 2y s.t. x + y <= 4, x + 3y <= 6, x <= 3
        let c = vec![-3.0, -2.0];
        let constraints = LinearConstraints {
            a_ub: Some(vec![vec![1.0, 1.0], vec![1.0, 3.0]]),
            b_ub: Some(vec![4.0, 6.0]),
            bounds: Some(vec![(0.0, 3.0), (0.0, f64::INFINITY)]),
            ..Default::default()
        };

        let result = linprog(&c, &constraints, &LinProgOptions::default()).expect("linprog failed");
        assert!(result.is_optimal());
        assert!((result.fun - (-11.0)).abs() < 1e-9);
    }

    #[test]
    fn test_linprog_empty_objective() {
        let result = linprog(&[], &LinearConstraints::default(), &LinProgOptions::default());
        assert!(matches!(result, Err(OptimizeError::InvalidInput { .. })));
    }

    #[test]
    fn test_linprog_dimension_mismatch() {
        let c = vec![1.0, 2.0];
        let constraints = LinearConstraints {
            a_ub: Some(vec![vec![1.0]]),
            b_ub: Some(vec![1.0]),
            ..Default::default()
        };

        let result = linprog(&c, &constraints, &LinProgOptions::default());
        assert!(matches!(result, Err(OptimizeError::InvalidInput { .. })));
    }

    #[test]
    fn test_linprog_missing_rhs() {
        let constraints = LinearConstraints {
            a_eq: Some(vec![vec![1.0]]),
            ..Default::default()
        };
        let result = linprog(&[1.0], &constraints, &LinProgOptions::default());
        assert!(matches!(result, Err(OptimizeError::InvalidInput { .. })));
    }

    #[test]
    fn test_linprog_inverted_bounds() {
        let constraints = LinearConstraints {
            bounds: Some(vec![(2.0, 1.0)]),
            ..Default::default()
        };
        let result = linprog(&[1.0], &constraints, &LinProgOptions::default());
        assert!(matches!(result, Err(OptimizeError::InvalidInterval { .. })));
    }

    #[cfg(feature = "minilp")]
    #[test]
    fn test_backends_agree() {
        let c = vec![-1.0, -1.0, -1.0];
        let constraints = LinearConstraints {
            a_ub: Some(vec![vec![1.0, 2.0, 0.0], vec![0.0, 1.0, 3.0]]),
            b_ub: Some(vec![4.0, 6.0]),
            a_eq: Some(vec![vec![1.0, 0.0, 1.0]]),
            b_eq: Some(vec![3.0]),
            bounds: None,
        };

        let simplex = linprog(&c, &constraints, &LinProgOptions::default()).expect("simplex");
        let minilp = linprog(
            &c,
            &constraints,
            &LinProgOptions {
                backend: LpBackend::Minilp,
                ..Default::default()
            },
        )
        .expect("minilp");

        assert!(simplex.is_optimal());
        assert!(minilp.is_optimal());
        assert!((simplex.fun - minilp.fun).abs() < 1e-7);
    }

    #[test]
    fn test_backend_cli_names() {
        use clap::ValueEnum;

        assert_eq!(LpBackend::from_str("minilp", false), Ok(LpBackend::Minilp));
        assert_eq!(LpBackend::from_str("simplex", false), Ok(LpBackend::Simplex));
        assert!(LpBackend::from_str("glpk", false).is_err());
    }

    #[test]
    fn test_backend_serde_names() {
        let backend: LpBackend = serde_json::from_str("\"minilp\"").expect("deserialize");
        assert_eq!(backend, LpBackend::Minilp);
        assert_eq!(LpBackend::Simplex.to_string(), "simplex");
    }
}
