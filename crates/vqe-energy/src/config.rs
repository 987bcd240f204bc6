//! Estimator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with VQE_ prefix)
//!
//! Precedence (highest to lowest): environment, file, defaults.
//!
//! ```yaml
//! tolerance: 1.0e-10
//! max_measurement_qubits: 20
//! mode:
//!   sampling:
//!     shots: 1000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::estimator::EstimationMode;
use crate::measurement::DEFAULT_MAX_MEASUREMENT_QUBITS;

/// Settings shared by the decomposer, the measurement plan and the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Coefficients with magnitude below this are zero; imaginary parts
    /// above it are rejected.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Analytical or sampling estimation.
    #[serde(default)]
    pub mode: EstimationMode,

    /// Longest label the measurement synthesizer accepts.
    #[serde(default = "default_max_measurement_qubits")]
    pub max_measurement_qubits: usize,
}

fn default_tolerance() -> f64 {
    vqe_pauli::DEFAULT_TOLERANCE
}

fn default_max_measurement_qubits() -> usize {
    DEFAULT_MAX_MEASUREMENT_QUBITS
}

fn default_shots() -> u32 {
    1000
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            mode: EstimationMode::default(),
            max_measurement_qubits: default_max_measurement_qubits(),
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: EstimatorConfig =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load with the following precedence:
    /// 1. Load from file if provided, defaults otherwise
    /// 2. Apply environment variable overrides
    /// 3. Validate
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VQE_TOLERANCE`, `VQE_MODE` and `VQE_SHOTS` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// `VQE_MODE` is `analytical` or `sampling`. `VQE_SHOTS` sets the shot
    /// count and implies sampling unless `VQE_MODE` says otherwise.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VQE_TOLERANCE") {
            self.tolerance = v
                .parse()
                .map_err(|_| ConfigError::ParseError(format!("VQE_TOLERANCE: invalid number {v:?}")))?;
        }

        let shots = lookup("VQE_SHOTS")
            .map(|v| {
                v.parse::<u32>()
                    .map_err(|_| ConfigError::ParseError(format!("VQE_SHOTS: invalid count {v:?}")))
            })
            .transpose()?;

        match lookup("VQE_MODE").as_deref() {
            Some("analytical") => self.mode = EstimationMode::Analytical,
            Some("sampling") => {
                let current = match self.mode {
                    EstimationMode::Sampling { shots } => shots,
                    EstimationMode::Analytical => default_shots(),
                };
                self.mode = EstimationMode::Sampling {
                    shots: shots.unwrap_or(current),
                };
            }
            Some(other) => {
                return Err(ConfigError::ParseError(format!(
                    "VQE_MODE: expected 'analytical' or 'sampling', got {other:?}"
                )));
            }
            None => {
                if let Some(shots) = shots {
                    self.mode = EstimationMode::Sampling { shots };
                }
            }
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }

        if let EstimationMode::Sampling { shots: 0 } = self.mode {
            return Err(ConfigError::ValidationError(
                "sampling mode requires shots > 0".to_string(),
            ));
        }

        if self.max_measurement_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "max_measurement_qubits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
