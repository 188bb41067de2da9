//! Published reference data for the 2V scenario.
//!
//! The inequality below is valid for Lnd (bound 1) but reaches 3/2 on
//! non-disturbing behaviours inside L. The published optimum is the even
//! mixture of two L vertices that each disturb Bob's shared measurement.

use crate::behaviour::{Behaviour, BehaviourResult, OutcomeKey};
use crate::polytope::Vertex;

/// The inequality maximized in the article.
pub const ARTICLE_INEQUALITY: &str = "-p110|A0B0B1 +p101|A0B1B2 +p010|A1B0B1 +p010|A1B1B2 \
                                      +p011|A1B1B2 +p100|A1B1B2 +p110|A1B1B2 +p111|A1B1B2 <= 1";

/// Published maximum of [`ARTICLE_INEQUALITY`].
pub const ARTICLE_VALUE: f64 = 1.5;

/// Non-zero entries of the published optimal behaviour, keyed `[a, b0, b1, A, B0, B1]`.
pub const ARTICLE_BEHAVIOUR: [([u8; 6], f64); 8] = [
    ([0, 0, 1, 0, 0, 1], 0.5),
    ([0, 1, 0, 0, 0, 1], 0.5),
    ([0, 0, 0, 0, 1, 2], 0.5),
    ([0, 1, 0, 0, 1, 2], 0.5),
    ([0, 1, 0, 1, 0, 1], 0.5),
    ([1, 0, 1, 1, 0, 1], 0.5),
    ([0, 1, 0, 1, 1, 2], 0.5),
    ([1, 0, 0, 1, 1, 2], 0.5),
];

/// Positions of the published vertices in [`l_vertices`](crate::polytope::l_vertices).
pub const ARTICLE_L_INDICES: [usize; 2] = [10, 20];

/// The published L vertices, each with weight 1/2.
pub const ARTICLE_VERTICES: [Vertex; 2] = [
    [
        0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0,
        0, 0,
    ],
    [
        0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0,
        0, 0,
    ],
];

/// [`ARTICLE_BEHAVIOUR`] as a full behaviour.
pub fn article_behaviour() -> BehaviourResult<Behaviour> {
    Behaviour::from_entries(
        ARTICLE_BEHAVIOUR
            .iter()
            .map(|&(key, p)| (OutcomeKey::from(key), p)),
    )
}
