//! Cleanup of LP solutions before they are reported as behaviours.
//!
//! Pivoting leaves round-off of order 1e-15 on the solution, while facets are
//! checked exactly. Entries are first snapped to nearby fractions with small
//! denominators, which makes the usual optima (halves, quarters) exact. When
//! round-off in a facet sum still pushes it past its bound, the point is
//! moved a tiny step toward [`Behaviour::uniform`], which satisfies every
//! equality row and lies strictly inside the facets of L.

use tracing::{debug, warn};

use crate::behaviour::{Behaviour, BehaviourResult};
use crate::constraints::{ConstraintKind, ConstraintSystem};

/// Largest denominator tried when snapping an entry.
pub const MAX_DENOMINATOR: u32 = 64;

/// Step sizes toward the uniform behaviour, tried in order.
const INTERIOR_STEPS: [f64; 4] = [1e-12, 1e-11, 1e-10, 1e-9];

/// Turn the LP solution `x` into a behaviour that satisfies the facets of
/// `system` exactly and its equalities within `equality_tol`.
///
/// Entries within `tol` of a fraction `k/d`, `d <= MAX_DENOMINATOR`, are
/// replaced by it. If no cleanup satisfies the facets the snapped point is
/// returned as is, and the verifier will report it.
pub fn polish(
    x: &[f64],
    system: &ConstraintSystem,
    tol: f64,
    equality_tol: f64,
) -> BehaviourResult<Behaviour> {
    let raw = Behaviour::from_slice(x)?;
    let snapped_values: Vec<f64> = x.iter().map(|&v| snap(v, tol)).collect();
    let snapped = Behaviour::from_slice(&snapped_values)?;

    let base = if equalities_hold(&snapped, system, equality_tol) {
        snapped
    } else {
        debug!("snapping broke an equality row, keeping the raw solution");
        raw
    };
    if facets_hold(&base, system) {
        return Ok(base);
    }

    let uniform = Behaviour::uniform();
    for step in INTERIOR_STEPS {
        let moved = toward(&base, &uniform, step)?;
        if facets_hold(&moved, system) && equalities_hold(&moved, system, equality_tol) {
            debug!(step, "solution moved toward the uniform behaviour");
            return Ok(moved);
        }
    }

    warn!("LP solution still exceeds a facet after cleanup");
    Ok(base)
}

/// Nearest `k/d` with the smallest `d <= MAX_DENOMINATOR` within `tol` of `value`.
fn snap(value: f64, tol: f64) -> f64 {
    if value.abs() <= tol {
        return 0.0;
    }
    for d in 1..=MAX_DENOMINATOR {
        let d = f64::from(d);
        let k = (value * d).round();
        if (value - k / d).abs() <= tol {
            return k / d;
        }
    }
    value
}

fn toward(base: &Behaviour, target: &Behaviour, step: f64) -> BehaviourResult<Behaviour> {
    let moved: Vec<f64> = base
        .as_slice()
        .iter()
        .zip(target.as_slice())
        .map(|(&p, &q)| (1.0 - step) * p + step * q)
        .collect();
    Behaviour::from_slice(&moved)
}

fn equalities_hold(behaviour: &Behaviour, system: &ConstraintSystem, tol: f64) -> bool {
    system
        .equalities
        .iter()
        .all(|c| (c.lhs(behaviour) - c.rhs).abs() <= tol)
}

fn facets_hold(behaviour: &Behaviour, system: &ConstraintSystem) -> bool {
    system
        .inequalities
        .iter()
        .filter(|c| c.kind == ConstraintKind::Facet)
        .all(|c| c.lhs(behaviour) <= c.rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Tolerances, verify};
    use crate::article::article_behaviour;
    use crate::behaviour::BEHAVIOUR_LEN;
    use crate::inequality::FacetSet;

    fn system() -> ConstraintSystem {
        ConstraintSystem::build(&FacetSet::generated()).unwrap()
    }

    fn noisy_article() -> Vec<f64> {
        let mut x = article_behaviour().unwrap().as_slice().to_vec();
        // entry 1 is 1/2 and sits on several tight lifted CHSH facets
        x[1] += 1e-15;
        x[5] += 3e-16;
        x
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(1e-16, 1e-9), 0.0);
        assert_eq!(snap(-2.6e-16, 1e-9), 0.0);
        assert_eq!(snap(0.5000000000000011, 1e-9), 0.5);
        assert_eq!(snap(0.3333333333333337, 1e-9), 1.0 / 3.0);
        assert_eq!(snap(0.123456789, 1e-9), 0.123456789);
    }

    #[test]
    fn test_noise_breaks_exact_facet_check() {
        let raw = Behaviour::from_slice(&noisy_article()).unwrap();
        let report = verify(&raw, &system(), &Tolerances::default());
        assert!(report.of_kind(ConstraintKind::Facet).count() > 0);
    }

    #[test]
    fn test_snapping_recovers_exact_optimum() {
        let polished = polish(&noisy_article(), &system(), 1e-9, 1e-7).unwrap();
        assert_eq!(polished, article_behaviour().unwrap());
        let report = verify(&polished, &system(), &Tolerances::default());
        assert!(!report.has_error(), "{:?}", report.violations);
    }

    #[test]
    fn test_interior_step_when_snapping_is_off() {
        let polished = polish(&noisy_article(), &system(), 0.0, 1e-7).unwrap();
        let report = verify(&polished, &system(), &Tolerances::default());
        assert!(!report.has_error(), "{:?}", report.violations);

        let published = article_behaviour().unwrap();
        for (got, want) in polished.as_slice().iter().zip(published.as_slice()) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clean_input_unchanged() {
        let x = [0.125; BEHAVIOUR_LEN];
        let polished = polish(&x, &system(), 1e-9, 1e-7).unwrap();
        assert_eq!(polished, Behaviour::uniform());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut x = [0.125; BEHAVIOUR_LEN];
        x[0] = f64::NAN;
        assert!(polish(&x, &system(), 1e-9, 1e-7).is_err());
    }
}
