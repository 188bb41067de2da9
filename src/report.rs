//! Console and JSON rendering of a run.

use std::fmt;

use serde::Serialize;

use crate::analysis::{Decomposition, OptimizationOutcome, VerificationReport};
use crate::behaviour::{Behaviour, OutcomeKey};
use crate::polytope::Vertex;

/// Everything a subcommand produced, in the order it is printed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationOutcome>,
    /// Input behaviour, when it did not come from the optimizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behaviour: Option<Behaviour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decompositions: Vec<Decomposition>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(outcome) = &self.optimization {
            writeln!(f, "Inequality bound: {}", outcome.bound)?;
            match outcome.value {
                Some(value) => writeln!(f, "Optimization value: {value}")?,
                None => writeln!(f, "Optimization status: {}", outcome.status)?,
            }
            if let Some(behaviour) = &outcome.behaviour {
                writeln!(f, "{behaviour}")?;
            }
        }
        if let Some(behaviour) = &self.behaviour {
            writeln!(f, "{behaviour}")?;
        }

        if let Some(report) = &self.verification {
            if report.has_error() {
                writeln!(f, "Error in behaviour: {} violation(s)", report.violations.len())?;
                for v in &report.violations {
                    writeln!(
                        f,
                        "  {} constraint {}: {} vs {}",
                        v.kind, v.label, v.value, v.bound
                    )?;
                }
            } else {
                writeln!(f, "Error in behaviour: none ({} rows checked)", report.checked)?;
            }
        }

        for d in &self.decompositions {
            writeln!(f, "{} decomposition:", d.polytope)?;
            writeln!(f, "Status: {}", d.status)?;
            if d.is_feasible() {
                for c in &d.components {
                    writeln!(f, "{}", c.weight)?;
                    writeln!(f, "[{}] {}", c.index, VertexRow(&c.vertex))?;
                }
                writeln!(f, "Non zero entries: {}", d.components.len())?;
            }
        }
        Ok(())
    }
}

/// A vertex as a bracketed 0/1 list.
pub struct VertexRow<'a>(pub &'a Vertex);

impl fmt::Display for VertexRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// The entries of a vertex that are 1, one `a b0 b1 A B0 B1 : 1` line each.
pub struct VertexEntries<'a>(pub &'a Vertex);

impl fmt::Display for VertexEntries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &v) in self.0.iter().enumerate() {
            if v > 0 {
                let k = OutcomeKey::at(i);
                writeln!(
                    f,
                    "{} {} {} {} {} {} : {}",
                    k.a, k.b0, k.b1, k.setting, k.context.first, k.context.second, v
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Component;
    use crate::optimize::LinProgStatus;
    use crate::polytope::{Polytope, l_vertices};

    #[test]
    fn test_vertex_entries() {
        let l = l_vertices();
        let text = VertexEntries(l.get(10).unwrap()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0 1 0 0 0 1 : 1",
                "0 1 0 0 1 2 : 1",
                "0 1 0 1 0 1 : 1",
                "0 1 0 1 1 2 : 1"
            ]
        );
    }

    #[test]
    fn test_text_report_sections() {
        let vertex = *l_vertices().get(0).unwrap();
        let report = Report {
            behaviour: Some(Behaviour::from_vertex(&vertex)),
            decompositions: vec![
                Decomposition {
                    polytope: Polytope::Lnd,
                    status: LinProgStatus::Infeasible,
                    components: Vec::new(),
                    nit: 3,
                },
                Decomposition {
                    polytope: Polytope::L,
                    status: LinProgStatus::Optimal,
                    components: vec![Component {
                        index: 0,
                        weight: 1.0,
                        vertex,
                    }],
                    nit: 5,
                },
            ],
            ..Default::default()
        };
        let text = report.to_string();
        assert!(text.contains("Lnd decomposition:\nStatus: infeasible\n"));
        assert!(text.contains("L decomposition:\nStatus: optimal\n1\n[0] [1, 0, 0"));
        assert!(text.ends_with("Non zero entries: 1\n"));
    }

    #[test]
    fn test_json_omits_empty_sections() {
        let report = Report {
            behaviour: Some(Behaviour::zeros()),
            ..Default::default()
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json.get("behaviour").is_some());
        assert!(json.get("optimization").is_none());
        assert!(json.get("decompositions").is_none());
    }
}
