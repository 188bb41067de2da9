//! Facet inequalities of the local polytope L.
//!
//! L is the polytope of behaviours that admit a local model in which every
//! Bob context carries its own joint outcome. Its facets are
//!
//! - positivity, `-p(key) <= 0` for each of the 32 variables, and
//! - lifted CHSH inequalities. Each of Bob's contexts is coarse-grained to a
//!   single bit by a bipartition `g` of its four joint outcomes, and the
//!   resulting two-setting scenario is bounded by
//!   `Σ P(a ⊕ g(b) = A·y ⊕ αA ⊕ γy ⊕ δ) <= 3` for every relabeling
//!   `(α, γ, δ)`.
//!
//! The same list ships as `data/2v-l-facets.txt`; [`FacetSet::load`] reads an
//! explicit file when one is configured and falls back to
//! [`l_polytope_facets`] otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::InequalityError;
use super::{Inequality, Term};
use crate::behaviour::{ALICE_SETTINGS, BOB_CONTEXTS, JOINT_OUTCOMES, OUTCOMES, OutcomeKey};

/// Bound of every lifted CHSH facet.
pub const CHSH_BOUND: i64 = 3;

/// Where a [`FacetSet`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetSource {
    /// Built by [`l_polytope_facets`].
    Generated,
    /// Read from a text file.
    File(PathBuf),
    /// Parsed from an in-memory string.
    Inline,
}

/// Ordered list of facet inequalities.
#[derive(Debug, Clone)]
pub struct FacetSet {
    facets: Vec<Inequality>,
    source: FacetSource,
}

impl FacetSet {
    /// The generated facets of L.
    pub fn generated() -> Self {
        Self {
            facets: l_polytope_facets(),
            source: FacetSource::Generated,
        }
    }

    /// Parse one inequality per line. Blank lines and lines starting with
    /// `#` are skipped; line numbers in errors are 1-based.
    pub fn parse(text: &str) -> Result<Self, InequalityError> {
        let mut facets = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let ineq = Inequality::parse(line).map_err(|e| e.at_line(i + 1))?;
            facets.push(ineq);
        }
        Ok(Self {
            facets,
            source: FacetSource::Inline,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InequalityError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InequalityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut set = Self::parse(&text)?;
        set.source = FacetSource::File(path.to_path_buf());
        debug!(path = %path.display(), facets = set.len(), "facet file loaded");
        Ok(set)
    }

    /// Read `path` when given, generate otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, InequalityError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::generated()),
        }
    }

    pub fn source(&self) -> &FacetSource {
        &self.source
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Inequality> {
        self.facets.iter()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn as_slice(&self) -> &[Inequality] {
        &self.facets
    }

    /// One line per facet, in the parseable text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for facet in &self.facets {
            out.push_str(&facet.to_string());
            out.push('\n');
        }
        out
    }

    /// Check that every term addresses a variable of the scenario.
    pub fn validate(&self) -> Result<(), InequalityError> {
        for (i, facet) in self.facets.iter().enumerate() {
            if let Some(term) = facet.terms.iter().find(|t| t.key.index().is_err()) {
                return Err(InequalityError::MalformedTerm {
                    term: term.to_string(),
                    reason: "not a variable of the 2V scenario",
                }
                .at_line(i + 1));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FacetSet {
    type Item = &'a Inequality;
    type IntoIter = std::slice::Iter<'a, Inequality>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.iter()
    }
}

/// Non-trivial bipartitions of Bob's four joint outcomes, as the bit each
/// outcome maps to. The first outcome always maps to 0.
fn colorings() -> Vec<[u8; 4]> {
    let mut out = Vec::with_capacity(7);
    for bits in 1u8..8 {
        out.push([0, (bits >> 2) & 1, (bits >> 1) & 1, bits & 1]);
    }
    out
}

/// Facets of L: 32 positivity facets in variable order, then 392 lifted
/// CHSH facets.
pub fn l_polytope_facets() -> Vec<Inequality> {
    let mut facets: Vec<Inequality> = OutcomeKey::all()
        .map(|key| Inequality {
            terms: vec![Term {
                coefficient: -1,
                key,
            }],
            bound: 0,
        })
        .collect();

    let colorings = colorings();
    for g0 in &colorings {
        for g1 in &colorings {
            let g = [g0, g1];
            for relabel in 0u8..8 {
                let (alpha, gamma, delta) = ((relabel >> 2) & 1, (relabel >> 1) & 1, relabel & 1);
                let mut terms = Vec::with_capacity(16);
                for &setting in &ALICE_SETTINGS {
                    for (y, context) in BOB_CONTEXTS.iter().enumerate() {
                        let y_bit = y as u8;
                        let target = (setting & y_bit) ^ (alpha & setting) ^ (gamma & y_bit) ^ delta;
                        for &a in &OUTCOMES {
                            for (o, &(b0, b1)) in JOINT_OUTCOMES.iter().enumerate() {
                                if a ^ g[y][o] == target {
                                    terms.push(Term {
                                        coefficient: 1,
                                        key: OutcomeKey::new(
                                            a,
                                            b0,
                                            b1,
                                            setting,
                                            context.first,
                                            context.second,
                                        ),
                                    });
                                }
                            }
                        }
                    }
                }
                facets.push(Inequality {
                    terms,
                    bound: CHSH_BOUND,
                });
            }
        }
    }

    facets
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::behaviour::{BEHAVIOUR_LEN, Behaviour, variable_index};

    const SHIPPED: &str = include_str!("../../data/2v-l-facets.txt");

    /// Deterministic L vertex: Alice answers `alice[A]`, Bob answers
    /// `JOINT_OUTCOMES[bob[ctx]]` in each context.
    fn l_vertex(alice: [u8; 2], bob: [usize; 2]) -> Behaviour {
        let mut v = [0u8; BEHAVIOUR_LEN];
        for setting in 0..2u8 {
            for ctx in 0..2 {
                let (b0, b1) = JOINT_OUTCOMES[bob[ctx]];
                v[variable_index(alice[setting as usize], b0, b1, setting, ctx)] = 1;
            }
        }
        Behaviour::from_vertex(&v)
    }

    #[test]
    fn test_facet_counts() {
        let facets = l_polytope_facets();
        assert_eq!(facets.len(), 32 + 7 * 7 * 8);
        assert!(facets[..32].iter().all(|f| f.bound == 0 && f.terms.len() == 1));
        assert!(facets[32..].iter().all(|f| f.bound == 3 && f.terms.len() == 16));
    }

    #[test]
    fn test_first_chsh_facet() {
        let facets = l_polytope_facets();
        let expected = "+p000|A0B0B1 +p001|A0B0B1 +p010|A0B0B1 +p111|A0B0B1 \
                        +p000|A0B1B2 +p001|A0B1B2 +p010|A0B1B2 +p111|A0B1B2 \
                        +p000|A1B0B1 +p001|A1B0B1 +p010|A1B0B1 +p111|A1B0B1 \
                        +p011|A1B1B2 +p100|A1B1B2 +p101|A1B1B2 +p110|A1B1B2 <= 3";
        assert_eq!(facets[32].to_string(), expected);
    }

    #[test]
    fn test_l_vertices_satisfy_every_facet() {
        let facets = FacetSet::generated();
        let mut tight = 0;
        for r0 in 0..2 {
            for r1 in 0..2 {
                for o0 in 0..4 {
                    for o1 in 0..4 {
                        let b = l_vertex([r0, r1], [o0, o1]);
                        for facet in &facets {
                            let value = facet.evaluate(&b).unwrap();
                            assert!(value <= facet.bound as f64, "{facet} violated");
                            if value == facet.bound as f64 {
                                tight += 1;
                            }
                        }
                    }
                }
            }
        }
        assert!(tight > 0);
    }

    #[test]
    fn test_shipped_file_matches_generator() {
        let shipped = FacetSet::parse(SHIPPED).unwrap();
        assert_eq!(shipped.as_slice(), l_polytope_facets().as_slice());
        assert_eq!(shipped.source(), &FacetSource::Inline);
    }

    #[test]
    fn test_text_roundtrip() {
        let generated = FacetSet::generated();
        let reparsed = FacetSet::parse(&generated.to_text()).unwrap();
        assert_eq!(reparsed.as_slice(), generated.as_slice());
    }

    #[test]
    fn test_parse_reports_line_number() {
        let text = "# header\n\n-p000|A0B0B1 <= 0\n+p000|A0B0B1 <= oops\n";
        match FacetSet::parse(text) {
            Err(InequalityError::AtLine { line, source }) => {
                assert_eq!(line, 4);
                assert!(matches!(*source, InequalityError::InvalidBound(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_foreign_context() {
        let set = FacetSet::parse("-p000|A0B0B1 <= 0\n+p000|A0B2B3 <= 1\n").unwrap();
        assert!(matches!(
            set.validate(),
            Err(InequalityError::AtLine { line: 2, .. })
        ));
        assert!(FacetSet::generated().validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# two facets").unwrap();
        writeln!(file, "-p000|A0B0B1 <= 0").unwrap();
        writeln!(file, "+p000|A0B0B1 +p111|A1B1B2 <= 1").unwrap();

        let set = FacetSet::load(Some(file.path())).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.source(), &FacetSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        match FacetSet::from_file(&path) {
            Err(InequalityError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
