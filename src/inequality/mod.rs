//! Linear inequalities over behaviour variables.
//!
//! Inequalities are exchanged as single text lines:
//!
//! ```text
//! -p110|A0B0B1 +p101|A0B1B2 +2p010|A1B0B1 <= 1
//! ```
//!
//! Each term is an optional sign and integer coefficient, `p`, Alice's and
//! Bob's outcome digits, then `|A<setting>B<first>B<second>`.

pub mod error;
pub mod facets;

use std::fmt;
use std::str::FromStr;

use crate::behaviour::{BEHAVIOUR_LEN, Behaviour, BehaviourResult, OutcomeKey};

pub use error::InequalityError;
pub use facets::{FacetSet, FacetSource, l_polytope_facets};

/// One `coefficient * p(key)` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub coefficient: i64,
    pub key: OutcomeKey,
}

/// `Σ coefficient * p(key) <= bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inequality {
    pub terms: Vec<Term>,
    pub bound: i64,
}

impl Inequality {
    /// Parse one line of the text format.
    pub fn parse(line: &str) -> Result<Self, InequalityError> {
        let (lhs, rhs) = line.split_once("<=").ok_or(InequalityError::MissingBound)?;
        let rhs = rhs.trim();
        let bound = rhs
            .parse::<i64>()
            .map_err(|_| InequalityError::InvalidBound(rhs.to_string()))?;

        let terms = lhs
            .split_whitespace()
            .map(parse_term)
            .collect::<Result<Vec<_>, _>>()?;
        if terms.is_empty() {
            return Err(InequalityError::Empty);
        }

        Ok(Self { terms, bound })
    }

    /// Copy with every key moved to its canonical context, see [`OutcomeKey::canonical`].
    pub fn canonicalized(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| Term {
                    coefficient: t.coefficient,
                    key: t.key.canonical(),
                })
                .collect(),
            bound: self.bound,
        }
    }

    /// Dense coefficient row in variable order; repeated keys accumulate.
    pub fn coefficients(&self) -> BehaviourResult<[f64; BEHAVIOUR_LEN]> {
        let mut row = [0.0; BEHAVIOUR_LEN];
        for term in &self.terms {
            row[term.key.index()?] += term.coefficient as f64;
        }
        Ok(row)
    }

    /// Left-hand side evaluated on `behaviour`.
    pub fn evaluate(&self, behaviour: &Behaviour) -> BehaviourResult<f64> {
        self.terms.iter().try_fold(0.0, |acc, term| {
            Ok(acc + term.coefficient as f64 * behaviour.get(term.key)?)
        })
    }
}

impl FromStr for Inequality {
    type Err = InequalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coefficient {
            1 => write!(f, "+{}", self.key),
            -1 => write!(f, "-{}", self.key),
            c => write!(f, "{:+}{}", c, self.key),
        }
    }
}

impl fmt::Display for Inequality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, " <= {}", self.bound)
    }
}

fn parse_term(term: &str) -> Result<Term, InequalityError> {
    let malformed = |reason| InequalityError::MalformedTerm {
        term: term.to_string(),
        reason,
    };

    let (coef, info) = term.split_once('p').ok_or_else(|| malformed("missing 'p'"))?;
    let coefficient = match coef {
        "" | "+" => 1,
        "-" => -1,
        other => other
            .parse::<i64>()
            .map_err(|_| InequalityError::InvalidCoefficient(other.to_string()))?,
    };

    let (results, measurements) = info
        .split_once('|')
        .ok_or_else(|| malformed("missing '|' between outcomes and settings"))?;

    let [a, b0, b1] = digits::<3>(results.as_bytes())
        .ok_or_else(|| malformed("outcomes must be three digits"))?;

    let m = measurements.as_bytes();
    if m.len() != 6 || m[0] != b'A' || m[2] != b'B' || m[4] != b'B' {
        return Err(malformed("settings must read A<d>B<d>B<d>"));
    }
    let settings = digits::<1>(&m[1..2])
        .zip(digits::<1>(&m[3..4]))
        .zip(digits::<1>(&m[5..6]))
        .ok_or_else(|| malformed("settings must be digits"))?;
    let (([setting], [first]), [second]) = settings;

    Ok(Term {
        coefficient,
        key: OutcomeKey::new(a, b0, b1, setting, first, second),
    })
}

/// Decimal digits of `bytes`, when it is exactly `N` ASCII digits.
fn digits<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    if bytes.len() != N || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut out = [0u8; N];
    for (dst, &b) in out.iter_mut().zip(bytes) {
        *dst = b - b'0';
    }
    Some(out)
}
