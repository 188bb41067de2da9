//! Dense two-phase simplex method for linear programming.
//!
//! Behaviour and decomposition programs are small (tens of variables, a few
//! hundred rows) but highly degenerate: most facet inequalities are tight at
//! the optimum and several equality rows are linearly dependent. Pivoting
//! therefore follows Bland's rule, which cannot cycle, and redundant equality
//! rows are left with a zero-level artificial that is barred from re-entering.

#![allow(clippy::needless_range_loop)]

use tracing::trace;

use super::{LinProgOptions, LinProgResult, LinProgStatus, LinearConstraints};
use crate::optimize::error::{OptimizeError, OptimizeResult};

/// Solve `min c^T x` subject to `constraints` with the tableau simplex method.
///
/// Dimensions are expected to be validated by the caller.
pub(super) fn simplex(
    c: &[f64],
    constraints: &LinearConstraints,
    options: &LinProgOptions,
) -> OptimizeResult<LinProgResult> {
    let n_orig = c.len();

    // Get bounds (default to [0, inf) for each variable)
    let bounds: Vec<(f64, f64)> = constraints
        .bounds
        .clone()
        .unwrap_or_else(|| vec![(0.0, f64::INFINITY); n_orig]);

    // Convert finite upper bounds and positive lower bounds to explicit rows
    let mut a_ub = constraints.a_ub.clone().unwrap_or_default();
    let mut b_ub = constraints.b_ub.clone().unwrap_or_default();

    for (i, &(lb, ub)) in bounds.iter().enumerate() {
        if !(lb.is_finite() && lb >= 0.0) {
            return Err(OptimizeError::InvalidParameter {
                parameter: format!("bounds[{i}]"),
                message: format!("simplex requires a finite non-negative lower bound, got {lb}"),
            });
        }
        if ub.is_finite() {
            let mut row = vec![0.0; n_orig];
            row[i] = 1.0;
            a_ub.push(row);
            b_ub.push(ub);
        }
        if lb > 0.0 {
            let mut row = vec![0.0; n_orig];
            row[i] = -1.0;
            a_ub.push(row);
            b_ub.push(-lb);
        }
    }

    let empty = Vec::new();
    let a_eq = constraints.a_eq.as_ref().unwrap_or(&empty);
    let b_eq = constraints.b_eq.clone().unwrap_or_default();

    let n_ub = a_ub.len();
    let n_eq = a_eq.len();
    let m = n_ub + n_eq;

    if m == 0 {
        return Ok(solve_unconstrained(c, &bounds));
    }

    let n_slack = n_ub;
    let n_artificial = n_eq + b_ub.iter().filter(|&&b| b < 0.0).count();
    let n_real = n_orig + n_slack;
    let n_total = n_real + n_artificial;

    let mut tableau = Tableau::new(m, n_total);
    let mut art_idx = n_real;

    // Inequality rows: slack is basic unless the row had to be negated.
    for (i, (row, &rhs)) in a_ub.iter().zip(b_ub.iter()).enumerate() {
        let mult = if rhs < 0.0 { -1.0 } else { 1.0 };
        for (j, &val) in row.iter().enumerate() {
            tableau.rows[i][j] = mult * val;
        }
        tableau.rows[i][n_orig + i] = mult;
        tableau.rows[i][tableau.rhs] = mult * rhs;

        if mult < 0.0 {
            tableau.rows[i][art_idx] = 1.0;
            tableau.basis[i] = art_idx;
            art_idx += 1;
        } else {
            tableau.basis[i] = n_orig + i;
        }
    }

    // Equality rows always start on an artificial.
    for (k, (row, &rhs)) in a_eq.iter().zip(b_eq.iter()).enumerate() {
        let i = n_ub + k;
        let mult = if rhs < 0.0 { -1.0 } else { 1.0 };
        for (j, &val) in row.iter().enumerate() {
            tableau.rows[i][j] = mult * val;
        }
        tableau.rows[i][tableau.rhs] = mult * rhs;
        tableau.rows[i][art_idx] = 1.0;
        tableau.basis[i] = art_idx;
        art_idx += 1;
    }

    let mut nit = 0;

    // Phase one: minimize the sum of artificials.
    if n_artificial > 0 {
        let mut phase_one = vec![0.0; n_total];
        for cost in &mut phase_one[n_real..] {
            *cost = 1.0;
        }
        tableau.set_objective(&phase_one);

        match tableau.run(n_total, options, &mut nit) {
            PhaseEnd::Optimal => {}
            PhaseEnd::IterationLimit => {
                return Ok(LinProgResult::without_solution(
                    n_orig,
                    LinProgStatus::IterationLimit,
                    nit,
                ));
            }
            // The phase-one objective is bounded below by zero.
            PhaseEnd::Unbounded => {
                return Ok(LinProgResult::without_solution(
                    n_orig,
                    LinProgStatus::Infeasible,
                    nit,
                ));
            }
        }

        let infeasibility: f64 = (0..m)
            .filter(|&i| tableau.basis[i] >= n_real)
            .map(|i| tableau.rows[i][tableau.rhs])
            .sum();
        trace!(nit, infeasibility, "simplex phase one finished");
        if infeasibility > options.feasibility_tol {
            return Ok(LinProgResult::without_solution(
                n_orig,
                LinProgStatus::Infeasible,
                nit,
            ));
        }

        tableau.drive_out_artificials(n_real, options.tol);
    }

    // Phase two: original objective, artificials may not re-enter.
    let mut costs = vec![0.0; n_total];
    costs[..n_orig].copy_from_slice(c);
    tableau.set_objective(&costs);

    let status = match tableau.run(n_real, options, &mut nit) {
        PhaseEnd::Optimal => LinProgStatus::Optimal,
        PhaseEnd::Unbounded => LinProgStatus::Unbounded,
        PhaseEnd::IterationLimit => LinProgStatus::IterationLimit,
    };
    if status != LinProgStatus::Optimal {
        return Ok(LinProgResult::without_solution(n_orig, status, nit));
    }

    // Extract solution
    let mut x = vec![0.0; n_orig];
    for (i, &bv) in tableau.basis.iter().enumerate() {
        if bv < n_orig {
            x[bv] = tableau.rows[i][tableau.rhs];
        }
    }
    // Clamp pivoting noise back onto the box.
    for i in 0..n_orig {
        x[i] = x[i].max(bounds[i].0);
        if bounds[i].1.is_finite() {
            x[i] = x[i].min(bounds[i].1);
        }
    }

    let fun: f64 = x.iter().zip(c.iter()).map(|(&xi, &ci)| xi * ci).sum();

    Ok(LinProgResult {
        x,
        fun,
        status: LinProgStatus::Optimal,
        nit,
    })
}

enum PhaseEnd {
    Optimal,
    Unbounded,
    IterationLimit,
}

/// Constraint rows followed by the reduced-cost row; the last column is the RHS.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    m: usize,
    rhs: usize,
}

impl Tableau {
    fn new(m: usize, n_total: usize) -> Self {
        Self {
            rows: vec![vec![0.0; n_total + 1]; m + 1],
            basis: vec![0; m],
            m,
            rhs: n_total,
        }
    }

    /// Install `costs` as the objective row and price out the current basis.
    fn set_objective(&mut self, costs: &[f64]) {
        let m = self.m;
        self.rows[m].iter_mut().for_each(|v| *v = 0.0);
        self.rows[m][..costs.len()].copy_from_slice(costs);
        for i in 0..m {
            let coef = self.rows[m][self.basis[i]];
            if coef != 0.0 {
                for j in 0..=self.rhs {
                    self.rows[m][j] -= coef * self.rows[i][j];
                }
            }
        }
    }

    fn pivot(&mut self, pivot_row: usize, pivot_col: usize) {
        let pivot_val = self.rows[pivot_row][pivot_col];
        for v in self.rows[pivot_row].iter_mut() {
            *v /= pivot_val;
        }
        let pivot = self.rows[pivot_row].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let factor = row[pivot_col];
            if factor != 0.0 {
                for (v, p) in row.iter_mut().zip(pivot.iter()) {
                    *v -= factor * p;
                }
            }
        }
        self.basis[pivot_row] = pivot_col;
    }

    /// Pivot until optimal; only columns below `eligible` may enter.
    fn run(&mut self, eligible: usize, options: &LinProgOptions, nit: &mut usize) -> PhaseEnd {
        let m = self.m;
        loop {
            if *nit >= options.max_iter {
                return PhaseEnd::IterationLimit;
            }

            // Bland: lowest-index column with a negative reduced cost.
            let Some(pivot_col) = (0..eligible).find(|&j| self.rows[m][j] < -options.tol) else {
                return PhaseEnd::Optimal;
            };

            // Minimum ratio, ties broken by the lowest basic variable index.
            let mut pivot_row: Option<(usize, f64)> = None;
            for i in 0..m {
                let a = self.rows[i][pivot_col];
                if a <= options.tol {
                    continue;
                }
                let ratio = self.rows[i][self.rhs] / a;
                pivot_row = match pivot_row {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - RATIO_TIE
                            || ((ratio - best_ratio).abs() <= RATIO_TIE
                                && self.basis[i] < self.basis[best])
                        {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }

            let Some((pivot_row, _)) = pivot_row else {
                return PhaseEnd::Unbounded;
            };

            self.pivot(pivot_row, pivot_col);
            *nit += 1;
        }
    }

    /// Replace zero-level artificials in the basis by real columns where possible.
    ///
    /// A row with no usable real column is a redundant equality; its artificial
    /// stays basic at zero and is never priced in phase two.
    fn drive_out_artificials(&mut self, n_real: usize, tol: f64) {
        for i in 0..self.m {
            if self.basis[i] < n_real {
                continue;
            }
            if let Some(col) = (0..n_real).find(|&j| self.rows[i][j].abs() > tol) {
                self.pivot(i, col);
            }
        }
    }
}

const RATIO_TIE: f64 = 1e-12;

/// Solve an LP without constraint rows.
fn solve_unconstrained(c: &[f64], bounds: &[(f64, f64)]) -> LinProgResult {
    let mut x = vec![0.0; c.len()];
    for (i, &ci) in c.iter().enumerate() {
        if ci < 0.0 {
            if bounds[i].1.is_infinite() {
                return LinProgResult::without_solution(c.len(), LinProgStatus::Unbounded, 0);
            }
            x[i] = bounds[i].1;
        } else {
            x[i] = bounds[i].0;
        }
    }
    let fun = x.iter().zip(c.iter()).map(|(&xi, &ci)| xi * ci).sum();
    LinProgResult {
        x,
        fun,
        status: LinProgStatus::Optimal,
        nit: 0,
    }
}
