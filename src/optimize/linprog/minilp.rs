//! `good_lp` backend solved by the pure-Rust `minilp` solver.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, minilp,
    variable,
};

use super::{LinProgResult, LinProgStatus, LinearConstraints};
use crate::optimize::error::{OptimizeError, OptimizeResult};

/// Build the program as a `good_lp` model and map its outcome onto [`LinProgStatus`].
pub(super) fn solve(c: &[f64], constraints: &LinearConstraints) -> OptimizeResult<LinProgResult> {
    let n = c.len();
    let bounds = constraints
        .bounds
        .clone()
        .unwrap_or_else(|| vec![(0.0, f64::INFINITY); n]);

    let mut problem = ProblemVariables::new();
    let vars: Vec<Variable> = bounds
        .iter()
        .map(|&(lb, ub)| {
            let mut def = variable();
            if lb.is_finite() {
                def = def.min(lb);
            }
            if ub.is_finite() {
                def = def.max(ub);
            }
            problem.add(def)
        })
        .collect();

    let objective = linear_expression(c, &vars);
    let mut model = problem.minimise(objective).using(minilp);

    if let (Some(a), Some(b)) = (&constraints.a_ub, &constraints.b_ub) {
        for (row, &rhs) in a.iter().zip(b.iter()) {
            model = model.with(linear_expression(row, &vars).leq(rhs));
        }
    }
    if let (Some(a), Some(b)) = (&constraints.a_eq, &constraints.b_eq) {
        for (row, &rhs) in a.iter().zip(b.iter()) {
            model = model.with(linear_expression(row, &vars).eq(rhs));
        }
    }

    match model.solve() {
        Ok(solution) => {
            // Clamp solver round-off back onto the box.
            let x: Vec<f64> = vars
                .iter()
                .zip(bounds.iter())
                .map(|(&v, &(lb, ub))| solution.value(v).max(lb).min(ub))
                .collect();
            let fun = x.iter().zip(c.iter()).map(|(&xi, &ci)| xi * ci).sum();
            Ok(LinProgResult {
                x,
                fun,
                status: LinProgStatus::Optimal,
                nit: 0,
            })
        }
        Err(ResolutionError::Infeasible) => Ok(LinProgResult::without_solution(
            n,
            LinProgStatus::Infeasible,
            0,
        )),
        Err(ResolutionError::Unbounded) => Ok(LinProgResult::without_solution(
            n,
            LinProgStatus::Unbounded,
            0,
        )),
        Err(err) => Err(OptimizeError::Backend(err.to_string())),
    }
}

fn linear_expression(coeffs: &[f64], vars: &[Variable]) -> Expression {
    let mut expr = Expression::default();
    for (&coef, &var) in coeffs.iter().zip(vars.iter()) {
        if coef != 0.0 {
            expr.add_mul(coef, var);
        }
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_inside_bounds() {
        // min x0 - x1 - x2 s.t. x0 + x1 + x2 == 1, x1 - x2 == 0
        let constraints = LinearConstraints {
            a_eq: Some(vec![vec![1.0, 1.0, 1.0], vec![0.0, 1.0, -1.0]]),
            b_eq: Some(vec![1.0, 0.0]),
            bounds: Some(vec![(0.0, 1.0), (0.0, 0.4), (0.0, f64::INFINITY)]),
            ..Default::default()
        };
        let result = solve(&[1.0, -1.0, -1.0], &constraints).unwrap();
        assert!(result.is_optimal());
        for (&x, &(lb, ub)) in result.x.iter().zip(constraints.bounds.as_ref().unwrap()) {
            assert!(x >= lb && x <= ub, "{x} outside [{lb}, {ub}]");
        }
        assert!((result.fun + 0.6).abs() < 1e-7);
    }

    #[test]
    fn test_infeasible_status() {
        let constraints = LinearConstraints {
            a_eq: Some(vec![vec![1.0, 1.0]]),
            b_eq: Some(vec![-1.0]),
            ..Default::default()
        };
        let result = solve(&[1.0, 1.0], &constraints).unwrap();
        assert_eq!(result.status, LinProgStatus::Infeasible);
    }
}
