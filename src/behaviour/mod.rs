//! Behaviours of the 2V scenario.
//!
//! A [`Behaviour`] is the joint outcome table `p(a, b0, b1 | A, B0, B1)` stored
//! as a fixed array in the order described in [`index`].

pub mod error;
pub mod index;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{BehaviourError, BehaviourResult};
pub use index::{
    ALICE_SETTINGS, BEHAVIOUR_LEN, BOB_CONTEXTS, Context, JOINT_OUTCOMES, OUTCOMES, OutcomeKey,
    variable_index,
};

/// Joint outcome probabilities over all settings and contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BehaviourRecord", into = "BehaviourRecord")]
pub struct Behaviour {
    p: [f64; BEHAVIOUR_LEN],
}

impl Default for Behaviour {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Behaviour {
    /// All-zero table; not normalized.
    pub fn zeros() -> Self {
        Self {
            p: [0.0; BEHAVIOUR_LEN],
        }
    }

    /// Every outcome equally likely: `1/8` per entry.
    pub fn uniform() -> Self {
        Self {
            p: [0.125; BEHAVIOUR_LEN],
        }
    }

    /// Build from a vector in variable order.
    pub fn from_slice(values: &[f64]) -> BehaviourResult<Self> {
        let p: [f64; BEHAVIOUR_LEN] = values.try_into().map_err(|_| BehaviourError::Length {
            expected: BEHAVIOUR_LEN,
            actual: values.len(),
        })?;
        if let Some(i) = p.iter().position(|v| !v.is_finite()) {
            return Err(BehaviourError::NonFinite {
                key: OutcomeKey::at(i),
                value: p[i],
            });
        }
        Ok(Self { p })
    }

    /// Read a deterministic 0/1 vertex as a behaviour.
    pub fn from_vertex(vertex: &[u8; BEHAVIOUR_LEN]) -> Self {
        let mut p = [0.0; BEHAVIOUR_LEN];
        for (dst, &v) in p.iter_mut().zip(vertex.iter()) {
            *dst = f64::from(v);
        }
        Self { p }
    }

    /// Build from `(key, probability)` pairs; missing keys are zero.
    pub fn from_entries<I>(entries: I) -> BehaviourResult<Self>
    where
        I: IntoIterator<Item = (OutcomeKey, f64)>,
    {
        let mut behaviour = Self::zeros();
        let mut seen = HashSet::new();
        for (key, value) in entries {
            if !seen.insert(key) {
                return Err(BehaviourError::DuplicateKey(key));
            }
            behaviour.set(key, value)?;
        }
        Ok(behaviour)
    }

    pub fn get(&self, key: OutcomeKey) -> BehaviourResult<f64> {
        Ok(self.p[key.index()?])
    }

    pub fn set(&mut self, key: OutcomeKey, value: f64) -> BehaviourResult<()> {
        if !value.is_finite() {
            return Err(BehaviourError::NonFinite { key, value });
        }
        self.p[key.index()?] = value;
        Ok(())
    }

    /// `p(a, b0, b1 | A, ctx)` with `ctx` a position in [`BOB_CONTEXTS`].
    #[inline]
    pub fn at(&self, a: u8, b0: u8, b1: u8, setting: u8, ctx: usize) -> f64 {
        self.p[variable_index(a, b0, b1, setting, ctx)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.p
    }

    /// All entries in variable order.
    pub fn entries(&self) -> impl Iterator<Item = (OutcomeKey, f64)> + '_ {
        self.p
            .iter()
            .enumerate()
            .map(|(i, &v)| (OutcomeKey::at(i), v))
    }

    /// Entries strictly above `threshold`, in variable order.
    pub fn nonzero_entries(&self, threshold: f64) -> Vec<(OutcomeKey, f64)> {
        self.entries().filter(|&(_, v)| v > threshold).collect()
    }

    /// Sum over all outcomes for each `(A, context)` pair.
    pub fn context_sums(&self) -> Vec<(u8, Context, f64)> {
        let mut sums = Vec::with_capacity(ALICE_SETTINGS.len() * BOB_CONTEXTS.len());
        for &setting in &ALICE_SETTINGS {
            for (ctx, &context) in BOB_CONTEXTS.iter().enumerate() {
                let base = variable_index(0, 0, 0, setting, ctx);
                let total: f64 = self.p[base..base + 8].iter().sum();
                sums.push((setting, context, total));
            }
        }
        sums
    }
}

/// Renders the table as a mapping from `(a, b0, b1, A, B0, B1)` to probability.
impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, v)) in self.entries().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "({}, {}, {}, {}, {}, {}): {}",
                key.a, key.b0, key.b1, key.setting, key.context.first, key.context.second, v
            )?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BehaviourRecord {
    entries: Vec<BehaviourEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BehaviourEntry {
    key: OutcomeKey,
    p: f64,
}

impl TryFrom<BehaviourRecord> for Behaviour {
    type Error = BehaviourError;

    fn try_from(record: BehaviourRecord) -> Result<Self, Self::Error> {
        Self::from_entries(record.entries.into_iter().map(|e| (e.key, e.p)))
    }
}

impl From<Behaviour> for BehaviourRecord {
    fn from(behaviour: Behaviour) -> Self {
        Self {
            entries: behaviour
                .entries()
                .map(|(key, p)| BehaviourEntry { key, p })
                .collect(),
        }
    }
}
