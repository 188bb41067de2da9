//! Deterministic vertices of the Lnd and L polytopes.
//!
//! A vertex assigns every measurement a fixed outcome and is stored as a 0/1
//! vector over the behaviour variables. The two polytopes differ in what Bob
//! fixes:
//!
//! - **Lnd** (local, non-disturbing): one outcome per measurement `B0, B1, B2`,
//!   so the shared `B1` reads the same in both contexts. 4 x 8 = 32 vertices.
//! - **L** (local): one joint outcome per context, so `B1` may read
//!   differently in `(0,1)` and `(1,2)`. 4 x 16 = 64 vertices.
//!
//! Enumeration order is fixed (Alice's results outer, both lexicographic) so
//! vertex indices are stable across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::behaviour::{
    ALICE_SETTINGS, BEHAVIOUR_LEN, BOB_CONTEXTS, Behaviour, JOINT_OUTCOMES, OUTCOMES,
    variable_index,
};

/// One deterministic assignment as a 0/1 vector in variable order.
pub type Vertex = [u8; BEHAVIOUR_LEN];

/// The polytopes whose vertices can be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Polytope {
    /// Local non-disturbing polytope.
    Lnd,
    /// Local polytope.
    L,
}

impl Polytope {
    pub const ALL: [Polytope; 2] = [Polytope::Lnd, Polytope::L];

    pub fn vertices(self) -> VertexSet {
        match self {
            Self::Lnd => lnd_vertices(),
            Self::L => l_vertices(),
        }
    }
}

impl fmt::Display for Polytope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lnd => f.write_str("Lnd"),
            Self::L => f.write_str("L"),
        }
    }
}

/// Fully materialized vertex list of one polytope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexSet {
    polytope: Polytope,
    vertices: Vec<Vertex>,
}

impl VertexSet {
    pub fn polytope(&self) -> Polytope {
        self.polytope
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vertex> {
        self.vertices.iter()
    }

    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index of `vertex` in this set.
    pub fn position(&self, vertex: &Vertex) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }

    /// Vertex `index` as a behaviour.
    pub fn behaviour(&self, index: usize) -> Option<Behaviour> {
        self.get(index).map(Behaviour::from_vertex)
    }
}

impl<'a> IntoIterator for &'a VertexSet {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter()
    }
}

/// Vertex for Alice's results `alice[A]` and Bob's joint outcome
/// `bob(ctx)` in each context.
fn deterministic_vertex(alice: [u8; 2], bob: impl Fn(usize) -> (u8, u8)) -> Vertex {
    let mut vertex = [0u8; BEHAVIOUR_LEN];
    for &setting in &ALICE_SETTINGS {
        for ctx in 0..BOB_CONTEXTS.len() {
            let (b0, b1) = bob(ctx);
            vertex[variable_index(alice[setting as usize], b0, b1, setting, ctx)] = 1;
        }
    }
    vertex
}

fn alice_results() -> impl Iterator<Item = [u8; 2]> {
    OUTCOMES
        .iter()
        .flat_map(|&r0| OUTCOMES.iter().map(move |&r1| [r0, r1]))
}

/// Vertices of Lnd: Alice's results `(r0, r1)`, then Bob's results
/// `(s0, s1, s2)` for his three measurements.
pub fn lnd_vertices() -> VertexSet {
    let mut vertices = Vec::with_capacity(32);
    for alice in alice_results() {
        for bits in 0u8..8 {
            let s = [(bits >> 2) & 1, (bits >> 1) & 1, bits & 1];
            vertices.push(deterministic_vertex(alice, |ctx| {
                let context = BOB_CONTEXTS[ctx];
                (s[context.first as usize], s[context.second as usize])
            }));
        }
    }
    VertexSet {
        polytope: Polytope::Lnd,
        vertices,
    }
}

/// Vertices of L: Alice's results `(r0, r1)`, then Bob's joint outcome in
/// context `(0,1)` and in context `(1,2)`.
pub fn l_vertices() -> VertexSet {
    let mut vertices = Vec::with_capacity(64);
    for alice in alice_results() {
        for &o0 in &JOINT_OUTCOMES {
            for &o1 in &JOINT_OUTCOMES {
                let outcomes = [o0, o1];
                vertices.push(deterministic_vertex(alice, |ctx| outcomes[ctx]));
            }
        }
    }
    VertexSet {
        polytope: Polytope::L,
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{non_disturbing, non_signaling, normalization};

    #[test]
    fn test_vertex_counts() {
        assert_eq!(lnd_vertices().len(), 32);
        assert_eq!(l_vertices().len(), 64);
    }

    #[test]
    fn test_vertices_are_distinct() {
        for set in [lnd_vertices(), l_vertices()] {
            for (i, v) in set.iter().enumerate() {
                assert_eq!(set.position(v), Some(i));
            }
        }
    }

    #[test]
    fn test_vertices_are_normalized() {
        for polytope in Polytope::ALL {
            let set = polytope.vertices();
            for i in 0..set.len() {
                let b = set.behaviour(i).unwrap();
                for c in normalization() {
                    assert_eq!(c.lhs(&b), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_vertices_are_non_signaling() {
        for polytope in Polytope::ALL {
            for v in &polytope.vertices() {
                let b = Behaviour::from_vertex(v);
                assert!(non_signaling().iter().all(|c| c.lhs(&b) == 0.0));
            }
        }
    }

    #[test]
    fn test_only_l_vertices_disturb() {
        let disturbs = |v: &Vertex| {
            let b = Behaviour::from_vertex(v);
            non_disturbing().iter().any(|c| c.lhs(&b) != 0.0)
        };
        assert!(!lnd_vertices().iter().any(disturbs));
        let disturbing = l_vertices().iter().filter(|v| disturbs(*v)).count();
        // B1 disagrees across contexts for half of Bob's 16 joint assignments.
        assert_eq!(disturbing, 4 * 8);
    }

    #[test]
    fn test_lnd_vertices_embed_in_l() {
        let l = l_vertices();
        assert!(lnd_vertices().iter().all(|v| l.position(v).is_some()));
    }

    #[test]
    fn test_l_vertex_order() {
        let l = l_vertices();
        // Alice (0, 0); Bob 10 on (0,1) and 10 on (1,2).
        let v = l.get(10).unwrap();
        let ones: Vec<usize> = (0..BEHAVIOUR_LEN).filter(|&i| v[i] == 1).collect();
        assert_eq!(ones, vec![2, 10, 18, 26]);
        // Alice (0, 1); Bob 01 on (0,1) and 00 on (1,2).
        let v = l.get(20).unwrap();
        let ones: Vec<usize> = (0..BEHAVIOUR_LEN).filter(|&i| v[i] == 1).collect();
        assert_eq!(ones, vec![1, 8, 21, 28]);
    }
}
