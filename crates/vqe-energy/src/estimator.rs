//! Expectation values of single Pauli terms.
//!
//! After the measurement rotation, a term's eigenvalue on outcome `k` is the
//! parity of the bits of `k` at the term's non-identity positions:
//!
//!   sign(k) = Π_{q : P_q ≠ I} (-1)^{bit_q(k)}
//!
//! The expectation is the probability-weighted (analytical) or
//! frequency-weighted (sampling) mean of that sign.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;
use vqe_pauli::PauliLabel;

use crate::engine::{Counts, Engine};
use crate::error::{EnergyError, EnergyResult};
use crate::measurement::MeasurementCircuit;

/// How expectation values are obtained from a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    /// Exact outcome probabilities.
    #[default]
    Analytical,
    /// Empirical mean over repeated measurements.
    ///
    /// Each evaluation draws fresh outcomes from the engine, so repeated
    /// calls on the same state generally return different values. Runs are
    /// reproducible only when the engine's randomness is seeded.
    Sampling {
        /// Number of measurements per term.
        #[serde(alias = "runs")]
        shots: u32,
    },
}

impl EstimationMode {
    /// Fail with [`EnergyError::InvalidShots`] for zero-shot sampling.
    pub fn validate(&self) -> EnergyResult<()> {
        match self {
            EstimationMode::Sampling { shots: 0 } => Err(EnergyError::InvalidShots),
            _ => Ok(()),
        }
    }

    /// True for [`EstimationMode::Sampling`].
    pub fn is_sampling(&self) -> bool {
        matches!(self, EstimationMode::Sampling { .. })
    }
}

impl fmt::Display for EstimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationMode::Analytical => write!(f, "analytical"),
            EstimationMode::Sampling { shots } => write!(f, "sampling ({shots} shots)"),
        }
    }
}

/// Eigenvalue (`±1`) of `label` on computational-basis outcome `outcome`.
///
/// Qubit `q` of an `n`-qubit label reads bit `n - 1 - q` of the outcome.
pub fn parity_sign(label: &PauliLabel, outcome: usize) -> f64 {
    let n = label.num_qubits();
    let odd = label
        .support()
        .filter(|&(q, _)| (outcome >> (n - 1 - q)) & 1 == 1)
        .count()
        % 2
        == 1;
    if odd { -1.0 } else { 1.0 }
}

/// `Σ_k p(k) · sign(k)` over all `2^n` outcomes.
pub fn expectation_from_probabilities(label: &PauliLabel, probabilities: &[f64]) -> EnergyResult<f64> {
    let expected = 1usize << label.num_qubits();
    if probabilities.len() != expected {
        return Err(EnergyError::QubitMismatch {
            context: format!("probabilities for {label}"),
            expected,
            got: probabilities.len(),
        });
    }
    Ok(probabilities
        .iter()
        .enumerate()
        .map(|(k, p)| p * parity_sign(label, k))
        .sum())
}

/// Mean of `sign(k)` over the observed outcomes.
pub fn expectation_from_counts(label: &PauliLabel, counts: &Counts) -> EnergyResult<f64> {
    let total = counts.total();
    if total == 0 {
        return Err(EnergyError::InvalidShots);
    }
    let signed: f64 = counts
        .iter()
        .map(|(k, c)| c as f64 * parity_sign(label, k))
        .sum();
    Ok(signed / total as f64)
}

/// Expectation value of `label` in `state`.
///
/// `NoOp` circuits short-circuit to exactly 1 without touching the engine.
/// Otherwise the measurement rotation is applied to a copy of the state and
/// the result is read out according to `mode`. Zero-shot sampling fails
/// before the engine is called.
///
/// In sampling mode every call consumes engine randomness: two calls with
/// identical arguments may disagree, while two identically seeded engines
/// produce the same sequence of values.
pub fn estimate_expectation<E: Engine>(
    engine: &E,
    state: &E::State,
    label: &PauliLabel,
    circuit: &MeasurementCircuit,
    mode: EstimationMode,
) -> EnergyResult<f64> {
    let rotations = match circuit {
        MeasurementCircuit::NoOp => return Ok(1.0),
        MeasurementCircuit::Rotations(c) => c,
    };
    mode.validate()?;

    let width = engine.num_qubits(state);
    if width != label.num_qubits() {
        return Err(EnergyError::QubitMismatch {
            context: format!("state for {label}"),
            expected: label.num_qubits(),
            got: width,
        });
    }

    let rotated = engine.apply(state, rotations)?;
    read_out(engine, &rotated, label, mode)
}

/// Read `⟨label⟩` from a state already rotated into the measurement basis.
pub(crate) fn read_out<E: Engine>(
    engine: &E,
    rotated: &E::State,
    label: &PauliLabel,
    mode: EstimationMode,
) -> EnergyResult<f64> {
    let value = match mode {
        EstimationMode::Analytical => {
            let probabilities = engine.probabilities(rotated)?;
            expectation_from_probabilities(label, &probabilities)?
        }
        EstimationMode::Sampling { shots } => {
            let counts = engine.sample(rotated, shots)?;
            expectation_from_counts(label, &counts)?
        }
    };
    trace!(%label, %mode, value, "estimated expectation");
    Ok(value)
}
