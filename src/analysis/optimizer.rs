//! Maximize an inequality over the non-disturbing, L-bounded behaviours.

use serde::Serialize;
use tracing::{debug, info};

use super::polish::polish;
use crate::behaviour::Behaviour;
use crate::constraints::ConstraintSystem;
use crate::error::Result;
use crate::inequality::Inequality;
use crate::optimize::utils::dot;
use crate::optimize::{LinProgOptions, LinProgStatus, linprog};

/// Result of maximizing an inequality's left-hand side.
///
/// `value` and `behaviour` are only present when `status` is optimal.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub inequality: String,
    pub status: LinProgStatus,
    /// Bound stated by the inequality.
    pub bound: i64,
    /// Maximum of the left-hand side.
    pub value: Option<f64>,
    /// A behaviour attaining `value`.
    pub behaviour: Option<Behaviour>,
    /// Simplex pivots (0 for external backends).
    pub nit: usize,
}

impl OptimizationOutcome {
    pub fn is_optimal(&self) -> bool {
        self.status == LinProgStatus::Optimal
    }

    /// Whether the optimum exceeds the stated bound.
    pub fn violates_bound(&self) -> bool {
        self.value.is_some_and(|v| v > self.bound as f64)
    }
}

/// Maximize the left-hand side of `inequality` subject to `system`.
///
/// Terms on context `(0,3)` are first moved to `(3,0)`; keys that still do
/// not address a variable are rejected.
pub fn maximize(
    inequality: &Inequality,
    system: &ConstraintSystem,
    options: &LinProgOptions,
) -> Result<OptimizationOutcome> {
    let objective = inequality.canonicalized().coefficients()?;
    // linprog minimizes
    let c: Vec<f64> = objective.iter().map(|&v| -v).collect();

    let constraints = system.to_linear_constraints();
    debug!(
        terms = inequality.terms.len(),
        equalities = system.equalities.len(),
        inequalities = system.inequalities.len(),
        "maximizing inequality"
    );
    let result = linprog(&c, &constraints, options)?;

    let (value, behaviour) = if result.is_optimal() {
        let behaviour = polish(&result.x, system, options.tol, options.feasibility_tol)?;
        (Some(dot(&objective, behaviour.as_slice())), Some(behaviour))
    } else {
        (None, None)
    };

    let outcome = OptimizationOutcome {
        inequality: inequality.to_string(),
        status: result.status,
        bound: inequality.bound,
        value,
        behaviour,
        nit: result.nit,
    };
    match outcome.value {
        Some(value) => info!(bound = outcome.bound, value, nit = outcome.nit, "optimum found"),
        None => info!(status = %outcome.status, "no optimum"),
    }
    Ok(outcome)
}

/// Parse `line` and maximize it, see [`maximize`].
pub fn maximize_str(
    line: &str,
    system: &ConstraintSystem,
    options: &LinProgOptions,
) -> Result<OptimizationOutcome> {
    let inequality = Inequality::parse(line)?;
    maximize(&inequality, system, options)
}
