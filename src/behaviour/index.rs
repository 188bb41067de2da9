//! Outcome keys and the fixed index mapping of the 2V scenario.
//!
//! A behaviour has one variable per `(a, b0, b1, A, B0, B1)`: Alice's outcome
//! `a` for setting `A`, and Bob's outcomes `(b0, b1)` for the measurement pair
//! `(B0, B1)`. Bob measures either `(0, 1)` or `(1, 2)`, so measurement 1 is
//! shared by both of his contexts.
//!
//! Variables are laid out setting-major:
//!
//! ```text
//! index = 16*A + 8*ctx + 4*a + 2*b0 + b1      ctx = 0 for (0,1), 1 for (1,2)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::BehaviourError;

/// Number of variables in a behaviour.
pub const BEHAVIOUR_LEN: usize = 32;

/// Alice's measurement settings.
pub const ALICE_SETTINGS: [u8; 2] = [0, 1];

/// Outcomes of a single dichotomic measurement.
pub const OUTCOMES: [u8; 2] = [0, 1];

/// Bob's joint outcomes within one context, in variable order.
pub const JOINT_OUTCOMES: [(u8, u8); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Bob's measurement contexts, in variable order.
pub const BOB_CONTEXTS: [Context; 2] = [Context::new(0, 1), Context::new(1, 2)];

/// A pair of Bob's measurements performed jointly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context {
    pub first: u8,
    pub second: u8,
}

impl Context {
    pub const fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    /// Position of this context in [`BOB_CONTEXTS`].
    pub fn position(self) -> Option<usize> {
        BOB_CONTEXTS.iter().position(|&c| c == self)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}B{}", self.first, self.second)
    }
}

/// Address of one behaviour variable: `p(a, b0, b1 | A, B0, B1)`.
///
/// Serialized as the array `[a, b0, b1, A, B0, B1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u8; 6]", into = "[u8; 6]")]
pub struct OutcomeKey {
    pub a: u8,
    pub b0: u8,
    pub b1: u8,
    pub setting: u8,
    pub context: Context,
}

impl OutcomeKey {
    pub const fn new(a: u8, b0: u8, b1: u8, setting: u8, first: u8, second: u8) -> Self {
        Self {
            a,
            b0,
            b1,
            setting,
            context: Context::new(first, second),
        }
    }

    /// Key of the variable stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= BEHAVIOUR_LEN`.
    pub fn at(index: usize) -> Self {
        assert!(index < BEHAVIOUR_LEN, "behaviour index {index} out of range");
        let setting = (index >> 4) as u8;
        let context = BOB_CONTEXTS[(index >> 3) & 1];
        Self {
            a: ((index >> 2) & 1) as u8,
            b0: ((index >> 1) & 1) as u8,
            b1: (index & 1) as u8,
            setting,
            context,
        }
    }

    /// All keys in variable order.
    pub fn all() -> impl Iterator<Item = OutcomeKey> {
        (0..BEHAVIOUR_LEN).map(Self::at)
    }

    /// Variable index of this key.
    pub fn index(&self) -> Result<usize, BehaviourError> {
        if self.a > 1 || self.b0 > 1 || self.b1 > 1 {
            return Err(BehaviourError::UnknownKey {
                key: *self,
                reason: "outcomes must be 0 or 1",
            });
        }
        if self.setting > 1 {
            return Err(BehaviourError::UnknownKey {
                key: *self,
                reason: "Alice has settings 0 and 1 only",
            });
        }
        let ctx = self.context.position().ok_or(BehaviourError::UnknownKey {
            key: *self,
            reason: "Bob's contexts are (0,1) and (1,2)",
        })?;
        Ok(variable_index(self.a, self.b0, self.b1, self.setting, ctx))
    }

    /// Rewrite a key on context `(0, 3)` to the equivalent key on `(3, 0)`.
    ///
    /// Inequalities written for cyclic scenarios address the closing context
    /// in either order; the variable model stores it as `(3, 0)`.
    pub fn canonical(self) -> Self {
        if self.context == Context::new(0, 3) {
            Self {
                b0: self.b1,
                b1: self.b0,
                context: Context::new(3, 0),
                ..self
            }
        } else {
            self
        }
    }
}

/// Variable index of `p(a, b0, b1 | A, ctx)` with `ctx` a position in [`BOB_CONTEXTS`].
#[inline]
pub const fn variable_index(a: u8, b0: u8, b1: u8, setting: u8, ctx: usize) -> usize {
    16 * setting as usize + 8 * ctx + 4 * a as usize + 2 * b0 as usize + b1 as usize
}

impl From<[u8; 6]> for OutcomeKey {
    fn from(k: [u8; 6]) -> Self {
        Self::new(k[0], k[1], k[2], k[3], k[4], k[5])
    }
}

impl From<OutcomeKey> for [u8; 6] {
    fn from(k: OutcomeKey) -> Self {
        [
            k.a,
            k.b0,
            k.b1,
            k.setting,
            k.context.first,
            k.context.second,
        ]
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p{}{}{}|A{}{}",
            self.a, self.b0, self.b1, self.setting, self.context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_covers_all_variables() {
        for (i, key) in OutcomeKey::all().enumerate() {
            assert_eq!(key.index().unwrap(), i);
        }
    }

    #[test]
    fn test_variable_order_matches_layout() {
        assert_eq!(OutcomeKey::at(0), OutcomeKey::new(0, 0, 0, 0, 0, 1));
        assert_eq!(OutcomeKey::at(8), OutcomeKey::new(0, 0, 0, 0, 1, 2));
        assert_eq!(OutcomeKey::at(21), OutcomeKey::new(1, 0, 1, 1, 0, 1));
        assert_eq!(OutcomeKey::at(31), OutcomeKey::new(1, 1, 1, 1, 1, 2));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(OutcomeKey::new(2, 0, 0, 0, 0, 1).index().is_err());
        assert!(OutcomeKey::new(0, 0, 0, 2, 0, 1).index().is_err());
        assert!(OutcomeKey::new(0, 0, 0, 0, 0, 2).index().is_err());
    }

    #[test]
    fn test_canonical_swaps_closing_context() {
        let key = OutcomeKey::new(1, 0, 1, 0, 0, 3).canonical();
        assert_eq!(key, OutcomeKey::new(1, 1, 0, 0, 3, 0));
        let untouched = OutcomeKey::new(1, 0, 1, 0, 1, 2);
        assert_eq!(untouched.canonical(), untouched);
    }

    #[test]
    fn test_display() {
        assert_eq!(OutcomeKey::new(1, 1, 0, 0, 0, 1).to_string(), "p110|A0B0B1");
    }

    #[test]
    fn test_serde_as_array() {
        let key = OutcomeKey::new(0, 1, 0, 1, 1, 2);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "[0,1,0,1,1,2]");
        let back: OutcomeKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
