//! Re-check a behaviour against every constraint of the program.
//!
//! Equalities are compared with an absolute tolerance, non-disturbance with
//! a looser one, and facets exactly (`value > bound`). All violations are
//! collected.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::behaviour::Behaviour;
use crate::constraints::{ConstraintKind, ConstraintSystem};

/// Absolute tolerances used by [`verify`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Normalization and non-signaling rows.
    pub equality: f64,
    /// Non-disturbing rows.
    pub disturbance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            equality: 1e-7,
            disturbance: 1e-5,
        }
    }
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ConstraintKind,
    pub label: String,
    /// Left-hand side on the behaviour.
    pub value: f64,
    /// Right-hand side of the row.
    pub bound: f64,
}

impl Violation {
    /// Distance from satisfying the row.
    pub fn excess(&self) -> f64 {
        match self.kind {
            ConstraintKind::Facet => self.value - self.bound,
            _ => (self.value - self.bound).abs(),
        }
    }
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    /// Number of rows checked.
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn has_error(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ConstraintKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}

/// Check `behaviour` against every row of `system`.
pub fn verify(
    behaviour: &Behaviour,
    system: &ConstraintSystem,
    tolerances: &Tolerances,
) -> VerificationReport {
    let mut report = VerificationReport::default();

    for constraint in system.iter() {
        report.checked += 1;
        let value = constraint.lhs(behaviour);
        let violated = match constraint.kind {
            ConstraintKind::Normalization | ConstraintKind::NonSignaling => {
                (value - constraint.rhs).abs() > tolerances.equality
            }
            ConstraintKind::NonDisturbing => {
                (value - constraint.rhs).abs() > tolerances.disturbance
            }
            ConstraintKind::Facet => value > constraint.rhs,
        };
        if violated {
            warn!(
                kind = %constraint.kind,
                constraint = %constraint.label,
                value,
                bound = constraint.rhs,
                "constraint violated"
            );
            report.violations.push(Violation {
                kind: constraint.kind,
                label: constraint.label.clone(),
                value,
                bound: constraint.rhs,
            });
        }
    }

    debug!(
        checked = report.checked,
        violations = report.violations.len(),
        "verification finished"
    );
    report
}
