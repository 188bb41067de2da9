//! Convex decomposition of a behaviour over a polytope's vertices.
//!
//! Feasibility program over one weight per vertex:
//!
//! ```text
//! λ >= 0,   Σ λ_v = 1,   Σ λ_v v = p
//! ```
//!
//! with a constant objective. Infeasible means `p` lies outside the polytope.

use serde::Serialize;
use tracing::{debug, info};

use crate::behaviour::{BEHAVIOUR_LEN, Behaviour};
use crate::optimize::utils::norm_inf;
use crate::optimize::{LinProgOptions, LinProgStatus, LinearConstraints, OptimizeResult, linprog};
use crate::polytope::{Polytope, Vertex, VertexSet};

/// Weights at or below this are dropped from a [`Decomposition`].
pub const DEFAULT_WEIGHT_THRESHOLD: f64 = 1e-9;

/// One vertex of a decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    /// Position in the polytope's [`VertexSet`].
    pub index: usize,
    pub weight: f64,
    pub vertex: Vertex,
}

/// Result of [`decompose`].
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    pub polytope: Polytope,
    pub status: LinProgStatus,
    /// Vertices with weight above the threshold; empty unless feasible.
    pub components: Vec<Component>,
    pub nit: usize,
}

impl Decomposition {
    pub fn is_feasible(&self) -> bool {
        self.status == LinProgStatus::Optimal
    }

    pub fn weight_sum(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }

    /// `Σ weight * vertex` over the reported components.
    pub fn reconstruct(&self) -> [f64; BEHAVIOUR_LEN] {
        let mut p = [0.0; BEHAVIOUR_LEN];
        for component in &self.components {
            for (dst, &v) in p.iter_mut().zip(component.vertex.iter()) {
                *dst += component.weight * f64::from(v);
            }
        }
        p
    }

    /// Largest entrywise gap between the reconstruction and `target`.
    pub fn residual(&self, target: &Behaviour) -> f64 {
        let gap: Vec<f64> = self
            .reconstruct()
            .iter()
            .zip(target.as_slice())
            .map(|(r, t)| r - t)
            .collect();
        norm_inf(&gap)
    }
}

/// Express `target` as a convex combination of `vertices`.
pub fn decompose(
    target: &Behaviour,
    vertices: &VertexSet,
    options: &LinProgOptions,
    threshold: f64,
) -> OptimizeResult<Decomposition> {
    let n = vertices.len();

    let mut a_eq = Vec::with_capacity(BEHAVIOUR_LEN + 1);
    let mut b_eq = Vec::with_capacity(BEHAVIOUR_LEN + 1);
    a_eq.push(vec![1.0; n]);
    b_eq.push(1.0);
    for (i, &p) in target.as_slice().iter().enumerate() {
        a_eq.push(vertices.iter().map(|v| f64::from(v[i])).collect());
        b_eq.push(p);
    }

    let constraints = LinearConstraints {
        a_eq: Some(a_eq),
        b_eq: Some(b_eq),
        ..Default::default()
    };
    debug!(polytope = %vertices.polytope(), vertices = n, "decomposing behaviour");
    let result = linprog(&vec![0.0; n], &constraints, options)?;

    let components = if result.is_optimal() {
        result
            .x
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > threshold)
            .filter_map(|(index, &weight)| {
                vertices.get(index).map(|&vertex| Component {
                    index,
                    weight,
                    vertex,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    info!(
        polytope = %vertices.polytope(),
        status = %result.status,
        components = components.len(),
        "decomposition finished"
    );
    Ok(Decomposition {
        polytope: vertices.polytope(),
        status: result.status,
        components,
        nit: result.nit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polytope::{l_vertices, lnd_vertices};

    fn mixture(set: &VertexSet, weights: &[(usize, f64)]) -> Behaviour {
        let mut p = [0.0; BEHAVIOUR_LEN];
        for &(i, w) in weights {
            for (dst, &v) in p.iter_mut().zip(set.get(i).unwrap().iter()) {
                *dst += w * f64::from(v);
            }
        }
        Behaviour::from_slice(&p).unwrap()
    }

    #[test]
    fn test_vertex_decomposes_to_itself() {
        let set = lnd_vertices();
        let target = set.behaviour(13).unwrap();
        let d = decompose(&target, &set, &LinProgOptions::default(), DEFAULT_WEIGHT_THRESHOLD)
            .unwrap();
        assert!(d.is_feasible());
        assert_eq!(d.components.len(), 1);
        assert_eq!(d.components[0].index, 13);
        assert!((d.components[0].weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixture_weights_are_convex() {
        let set = l_vertices();
        let target = mixture(&set, &[(3, 0.25), (40, 0.5), (63, 0.25)]);
        let d = decompose(&target, &set, &LinProgOptions::default(), DEFAULT_WEIGHT_THRESHOLD)
            .unwrap();
        assert!(d.is_feasible());
        assert!(d.components.iter().all(|c| c.weight > 0.0));
        assert!((d.weight_sum() - 1.0).abs() < 1e-6);
        assert!(d.residual(&target) < 1e-6);
    }

    #[test]
    fn test_disturbing_vertex_outside_lnd() {
        // Alice (0, 0); Bob 01 on (0,1) and 00 on (1,2), so B1 reads 1 then 0.
        let l = l_vertices();
        let target = l.behaviour(4).unwrap();
        let d = decompose(
            &target,
            &lnd_vertices(),
            &LinProgOptions::default(),
            DEFAULT_WEIGHT_THRESHOLD,
        )
        .unwrap();
        assert_eq!(d.status, LinProgStatus::Infeasible);
        assert!(d.components.is_empty());
    }

    #[test]
    fn test_threshold_filters_components() {
        let set = lnd_vertices();
        let target = mixture(&set, &[(0, 0.5), (31, 0.5)]);
        let d = decompose(&target, &set, &LinProgOptions::default(), 0.6).unwrap();
        assert!(d.is_feasible());
        assert!(d.components.is_empty());
    }
}
