//! Linear constraints on 2V behaviours.
//!
//! Rows are built over the 32 behaviour variables and grouped by kind. The
//! equality block has a fixed layout:
//!
//! | rows    | kind                        |
//! |---------|-----------------------------|
//! | 0..4    | normalization               |
//! | 4..8    | non-signaling, Alice side   |
//! | 8..16   | non-signaling, Bob side     |
//! | 16..20  | non-disturbing              |
//!
//! Facet inequalities follow as `<=` rows in facet-set order.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::behaviour::{
    ALICE_SETTINGS, BEHAVIOUR_LEN, BOB_CONTEXTS, Behaviour, BehaviourResult, JOINT_OUTCOMES,
    OUTCOMES, variable_index,
};
use crate::inequality::FacetSet;
use crate::optimize::LinearConstraints;
use crate::optimize::utils::dot;

/// Dense coefficient row over the behaviour variables.
pub type Row = [f64; BEHAVIOUR_LEN];

/// Rows of the normalization block.
pub const NORMALIZATION_ROWS: Range<usize> = 0..4;
/// Rows of the non-signaling block (Alice side, then Bob side).
pub const NON_SIGNALING_ROWS: Range<usize> = 4..16;
/// Rows of the non-disturbing block.
pub const NON_DISTURBING_ROWS: Range<usize> = 16..20;

/// Family a constraint row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Normalization,
    NonSignaling,
    NonDisturbing,
    Facet,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalization => f.write_str("normalization"),
            Self::NonSignaling => f.write_str("non-signaling"),
            Self::NonDisturbing => f.write_str("non-disturbing"),
            Self::Facet => f.write_str("facet"),
        }
    }
}

/// One linear row `row · p (= | <=) rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Human-readable identification, e.g. `A0 B0B1` or `facet 37`.
    pub label: String,
    pub row: Row,
    pub rhs: f64,
}

impl Constraint {
    fn new(kind: ConstraintKind, label: String, row: Row, rhs: f64) -> Self {
        Self {
            kind,
            label,
            row,
            rhs,
        }
    }

    /// Left-hand side evaluated on `behaviour`.
    #[inline]
    pub fn lhs(&self, behaviour: &Behaviour) -> f64 {
        dot(&self.row, behaviour.as_slice())
    }
}

/// `Σ_{a,b0,b1} p(a,b0,b1|A,ctx) = 1` for every setting and context.
pub fn normalization() -> Vec<Constraint> {
    let mut rows = Vec::with_capacity(NORMALIZATION_ROWS.len());
    for &setting in &ALICE_SETTINGS {
        for (ctx, context) in BOB_CONTEXTS.iter().enumerate() {
            let mut row = [0.0; BEHAVIOUR_LEN];
            for &a in &OUTCOMES {
                for &(b0, b1) in &JOINT_OUTCOMES {
                    row[variable_index(a, b0, b1, setting, ctx)] = 1.0;
                }
            }
            rows.push(Constraint::new(
                ConstraintKind::Normalization,
                format!("A{setting} {context}"),
                row,
                1.0,
            ));
        }
    }
    rows
}

/// Marginals that must not depend on the other party's setting.
///
/// Alice side: `p(a|A, B0B1) - p(a|A, B1B2) = 0` for every `A` and `a`.
/// Bob side: `p(b0b1|A0, ctx) - p(b0b1|A1, ctx) = 0` for every context and
/// joint outcome.
pub fn non_signaling() -> Vec<Constraint> {
    let mut rows = Vec::with_capacity(NON_SIGNALING_ROWS.len());

    for &setting in &ALICE_SETTINGS {
        for &a in &OUTCOMES {
            let mut row = [0.0; BEHAVIOUR_LEN];
            for &(b0, b1) in &JOINT_OUTCOMES {
                row[variable_index(a, b0, b1, setting, 0)] += 1.0;
                row[variable_index(a, b0, b1, setting, 1)] -= 1.0;
            }
            rows.push(Constraint::new(
                ConstraintKind::NonSignaling,
                format!("Alice A{setting} a={a} across {}/{}", BOB_CONTEXTS[0], BOB_CONTEXTS[1]),
                row,
                0.0,
            ));
        }
    }

    for (ctx, context) in BOB_CONTEXTS.iter().enumerate() {
        for &(b0, b1) in &JOINT_OUTCOMES {
            let mut row = [0.0; BEHAVIOUR_LEN];
            for &a in &OUTCOMES {
                row[variable_index(a, b0, b1, 0, ctx)] += 1.0;
                row[variable_index(a, b0, b1, 1, ctx)] -= 1.0;
            }
            rows.push(Constraint::new(
                ConstraintKind::NonSignaling,
                format!("Bob {context} b={b0}{b1} across A0/A1"),
                row,
                0.0,
            ));
        }
    }

    rows
}

/// The outcome of Bob's shared measurement `B1` must not depend on the
/// context it is measured in:
/// `Σ_{a,b2} p(a,b,b2|A,B1B2) - Σ_{a,b0} p(a,b0,b|A,B0B1) = 0`.
pub fn non_disturbing() -> Vec<Constraint> {
    let mut rows = Vec::with_capacity(NON_DISTURBING_ROWS.len());
    for &setting in &ALICE_SETTINGS {
        for &b in &OUTCOMES {
            let mut row = [0.0; BEHAVIOUR_LEN];
            for &a in &OUTCOMES {
                for &other in &OUTCOMES {
                    row[variable_index(a, b, other, setting, 1)] += 1.0;
                    row[variable_index(a, other, b, setting, 0)] -= 1.0;
                }
            }
            rows.push(Constraint::new(
                ConstraintKind::NonDisturbing,
                format!("A{setting} B1={b}"),
                row,
                0.0,
            ));
        }
    }
    rows
}

/// One `<=` row per facet.
pub fn facet_rows(facets: &FacetSet) -> BehaviourResult<Vec<Constraint>> {
    facets
        .iter()
        .enumerate()
        .map(|(i, facet)| {
            Ok(Constraint::new(
                ConstraintKind::Facet,
                format!("facet {i}"),
                facet.coefficients()?,
                facet.bound as f64,
            ))
        })
        .collect()
}

/// The full constraint system of the behaviour program.
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    /// Normalization, non-signaling and non-disturbing rows, in block order.
    pub equalities: Vec<Constraint>,
    /// Facet rows.
    pub inequalities: Vec<Constraint>,
}

impl ConstraintSystem {
    /// Equality blocks plus one `<=` row per facet.
    pub fn build(facets: &FacetSet) -> BehaviourResult<Self> {
        let mut equalities = normalization();
        equalities.extend(non_signaling());
        equalities.extend(non_disturbing());
        let inequalities = facet_rows(facets)?;

        debug!(
            normalization = NORMALIZATION_ROWS.len(),
            non_signaling = NON_SIGNALING_ROWS.len(),
            non_disturbing = NON_DISTURBING_ROWS.len(),
            facets = inequalities.len(),
            "constraint system built"
        );

        Ok(Self {
            equalities,
            inequalities,
        })
    }

    /// All rows, equalities first.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.equalities.iter().chain(self.inequalities.iter())
    }

    /// Dense LP form over the behaviour variables with default `[0, inf)` bounds.
    ///
    /// Normalization and positivity already confine every variable to `[0, 1]`.
    pub fn to_linear_constraints(&self) -> LinearConstraints {
        let (a_eq, b_eq) = split(&self.equalities);
        let (a_ub, b_ub) = split(&self.inequalities);
        LinearConstraints {
            a_ub: (!a_ub.is_empty()).then_some(a_ub),
            b_ub: (!b_ub.is_empty()).then_some(b_ub),
            a_eq: Some(a_eq),
            b_eq: Some(b_eq),
            bounds: None,
        }
    }
}

fn split(rows: &[Constraint]) -> (Vec<Vec<f64>>, Vec<f64>) {
    rows.iter().map(|c| (c.row.to_vec(), c.rhs)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_layout() {
        let system = ConstraintSystem::build(&FacetSet::generated()).unwrap();
        assert_eq!(system.equalities.len(), 20);
        assert_eq!(system.inequalities.len(), 424);
        assert!(system.equalities[NORMALIZATION_ROWS]
            .iter()
            .all(|c| c.kind == ConstraintKind::Normalization));
        assert!(system.equalities[NON_SIGNALING_ROWS]
            .iter()
            .all(|c| c.kind == ConstraintKind::NonSignaling));
        assert!(system.equalities[NON_DISTURBING_ROWS]
            .iter()
            .all(|c| c.kind == ConstraintKind::NonDisturbing));
    }

    #[test]
    fn test_normalization_rows_cover_each_variable_once() {
        let mut counts = [0.0; BEHAVIOUR_LEN];
        for c in normalization() {
            for (dst, v) in counts.iter_mut().zip(c.row.iter()) {
                *dst += v;
            }
        }
        assert!(counts.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_equality_rows_are_balanced() {
        for c in non_signaling().iter().chain(non_disturbing().iter()) {
            assert_eq!(c.row.iter().sum::<f64>(), 0.0, "{}", c.label);
            assert_eq!(c.rhs, 0.0);
        }
    }

    #[test]
    fn test_uniform_behaviour_satisfies_equalities() {
        let b = Behaviour::uniform();
        let system = ConstraintSystem::build(&FacetSet::generated()).unwrap();
        for c in &system.equalities {
            assert!((c.lhs(&b) - c.rhs).abs() < 1e-12, "{}", c.label);
        }
        for c in &system.inequalities {
            assert!(c.lhs(&b) <= c.rhs, "{}", c.label);
        }
    }

    #[test]
    fn test_disturbing_behaviour_detected() {
        // B1 reads 0 in context (0,1) but 1 in context (1,2).
        let mut p = [0.0; BEHAVIOUR_LEN];
        for setting in 0..2 {
            p[variable_index(0, 0, 0, setting, 0)] = 1.0;
            p[variable_index(0, 1, 0, setting, 1)] = 1.0;
        }
        let b = Behaviour::from_slice(&p).unwrap();
        assert!(non_signaling().iter().all(|c| c.lhs(&b) == 0.0));
        assert!(non_disturbing().iter().any(|c| c.lhs(&b) != 0.0));
    }

    #[test]
    fn test_linear_constraints_shape() {
        let lc = ConstraintSystem::build(&FacetSet::generated())
            .unwrap()
            .to_linear_constraints();
        assert_eq!(lc.a_eq.as_ref().map(Vec::len), Some(20));
        assert_eq!(lc.a_ub.as_ref().map(Vec::len), Some(424));
        assert!(lc.a_ub.unwrap().iter().all(|r| r.len() == BEHAVIOUR_LEN));
    }

    #[test]
    fn test_facet_with_unknown_key_rejected() {
        let facets = FacetSet::parse("+p000|A0B2B3 <= 1").unwrap();
        assert!(ConstraintSystem::build(&facets).is_err());
    }
}
