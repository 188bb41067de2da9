//! Configured end-to-end runs.
//!
//! A [`Pipeline`] loads the facet resource once, builds the constraint system
//! from it and hands both to every optimization, verification and
//! decomposition of the run.

use tracing::info;

use crate::analysis::{self, Decomposition, OptimizationOutcome, VerificationReport};
use crate::behaviour::Behaviour;
use crate::config::Config;
use crate::constraints::ConstraintSystem;
use crate::error::Result;
use crate::inequality::FacetSet;
use crate::polytope::Polytope;
use crate::report::Report;

pub struct Pipeline {
    config: Config,
    facets: FacetSet,
    system: ConstraintSystem,
}

impl Pipeline {
    /// Load the configured facets (or generate them) and build the constraint system.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let facets = FacetSet::load(config.facets.path.as_deref())?;
        facets.validate()?;
        let system = ConstraintSystem::build(&facets)?;
        info!(
            facets = facets.len(),
            source = ?facets.source(),
            backend = %config.solver.backend,
            "pipeline ready"
        );
        Ok(Self {
            config,
            facets,
            system,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    pub fn system(&self) -> &ConstraintSystem {
        &self.system
    }

    /// Maximize the inequality written on `line`.
    pub fn optimize(&self, line: &str) -> Result<OptimizationOutcome> {
        analysis::maximize_str(line, &self.system, &self.config.solver.lp_options())
    }

    pub fn verify(&self, behaviour: &Behaviour) -> VerificationReport {
        analysis::verify(behaviour, &self.system, &self.config.verify.tolerances())
    }

    pub fn decompose(&self, behaviour: &Behaviour, polytope: Polytope) -> Result<Decomposition> {
        Ok(analysis::decompose(
            behaviour,
            &polytope.vertices(),
            &self.config.solver.lp_options(),
            self.config.decompose.weight_threshold,
        )?)
    }

    /// Optimize `line`, then verify and decompose the optimum over both polytopes.
    pub fn optimize_report(&self, line: &str) -> Result<Report> {
        let outcome = self.optimize(line)?;
        let mut report = Report::default();
        if let Some(behaviour) = &outcome.behaviour {
            report.verification = Some(self.verify(behaviour));
            report.decompositions = self.decompositions(behaviour, &Polytope::ALL)?;
        }
        report.optimization = Some(outcome);
        Ok(report)
    }

    /// Verify `behaviour` and decompose it over `polytopes`.
    pub fn behaviour_report(&self, behaviour: Behaviour, polytopes: &[Polytope]) -> Result<Report> {
        Ok(Report {
            verification: Some(self.verify(&behaviour)),
            decompositions: self.decompositions(&behaviour, polytopes)?,
            behaviour: Some(behaviour),
            ..Default::default()
        })
    }

    fn decompositions(
        &self,
        behaviour: &Behaviour,
        polytopes: &[Polytope],
    ) -> Result<Vec<Decomposition>> {
        polytopes
            .iter()
            .map(|&polytope| self.decompose(behaviour, polytope))
            .collect()
    }
}
