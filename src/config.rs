//! Run configuration.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [solver]
//! backend = "simplex"      # "simplex" | "minilp"
//! max_iter = 20000
//! tol = 1e-9
//! feasibility_tol = 1e-7
//!
//! [facets]
//! # path = "data/2v-l-facets.txt"
//!
//! [verify]
//! equality_tol = 1e-7
//! disturbance_tol = 1e-5
//!
//! [decompose]
//! weight_threshold = 1e-9
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{DEFAULT_WEIGHT_THRESHOLD, Tolerances};
use crate::optimize::{LinProgOptions, LpBackend};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub facets: FacetsConfig,
    pub verify: VerifyConfig,
    pub decompose: DecomposeConfig,
}

/// LP backend and its limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub backend: LpBackend,
    /// Pivot budget of the simplex backend.
    pub max_iter: usize,
    /// Pivot and reduced-cost tolerance.
    pub tol: f64,
    /// Phase-one residual still accepted as feasible.
    pub feasibility_tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let options = LinProgOptions::default();
        Self {
            backend: options.backend,
            max_iter: options.max_iter,
            tol: options.tol,
            feasibility_tol: options.feasibility_tol,
        }
    }
}

impl SolverConfig {
    pub fn lp_options(&self) -> LinProgOptions {
        LinProgOptions {
            backend: self.backend,
            max_iter: self.max_iter,
            tol: self.tol,
            feasibility_tol: self.feasibility_tol,
        }
    }
}

/// Facet resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacetsConfig {
    /// Facet file; the facets of L are generated when absent.
    pub path: Option<PathBuf>,
}

/// Verifier tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    pub equality_tol: f64,
    pub disturbance_tol: f64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        let tolerances = Tolerances::default();
        Self {
            equality_tol: tolerances.equality,
            disturbance_tol: tolerances.disturbance,
        }
    }
}

impl VerifyConfig {
    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            equality: self.equality_tol,
            disturbance: self.disturbance_tol,
        }
    }
}

/// Decomposition reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecomposeConfig {
    /// Weights at or below this are not reported.
    pub weight_threshold: f64,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
        }
    }
}

impl Config {
    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_owned(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solver.max_iter == 0 {
            return Err(ConfigError::Invalid {
                field: "solver.max_iter",
                message: "must be positive".to_string(),
            });
        }
        positive("solver.tol", self.solver.tol)?;
        positive("solver.feasibility_tol", self.solver.feasibility_tol)?;
        positive("verify.equality_tol", self.verify.equality_tol)?;
        positive("verify.disturbance_tol", self.verify.disturbance_tol)?;

        let threshold = self.decompose.weight_threshold;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "decompose.weight_threshold",
                message: format!("must be finite and non-negative, got {threshold}"),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("must be finite and positive, got {value}"),
        })
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.solver.backend, LpBackend::Simplex);
        assert_eq!(config.solver.max_iter, 20_000);
        assert_eq!(config.verify.tolerances(), Tolerances::default());
        assert_eq!(config.decompose.weight_threshold, 1e-9);
        assert!(config.facets.path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [solver]
            backend = "minilp"

            [verify]
            disturbance_tol = 1e-4
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.backend, LpBackend::Minilp);
        assert_eq!(config.solver.tol, 1e-9);
        assert_eq!(config.verify.disturbance_tol, 1e-4);
        assert_eq!(config.verify.equality_tol, 1e-7);

        let options = config.solver.lp_options();
        assert_eq!(options.backend, LpBackend::Minilp);
        assert_eq!(options.max_iter, 20_000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("[solver]\nmaxiter = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml_str("[solver]\nmax_iter = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "solver.max_iter",
                ..
            }
        ));

        let err = Config::from_toml_str("[verify]\nequality_tol = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "verify.equality_tol",
                ..
            }
        ));

        let err = Config::from_toml_str("[decompose]\nweight_threshold = -1e-9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[facets]\npath = \"data/2v-l-facets.txt\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.facets.path.as_deref(),
            Some(Path::new("data/2v-l-facets.txt"))
        );
    }

    #[test]
    fn test_from_file_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(ConfigError::FileRead { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[solver\n").unwrap();
        match Config::from_file(&bad) {
            Err(ConfigError::ParseFile { path, .. }) => assert_eq!(path, bad),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
