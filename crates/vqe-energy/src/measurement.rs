//! Measurement-basis circuits for Pauli terms.
//!
//! To read `⟨ψ|P|ψ⟩` from computational-basis outcomes, every qubit carrying
//! a non-diagonal operator is rotated into the `Z` eigenbasis first:
//!
//! | Operator | Rotation      |
//! |----------|---------------|
//! | `I`, `Z` | none          |
//! | `X`      | `H`           |
//! | `Y`      | `Sdg` then `H`|
//!
//! Each qubit is handled independently, so the rule extends to any label
//! length. The synthesizer still enforces a configurable limit, and a limit of
//! two restricts it to one- and two-qubit labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vqe_ir::{Circuit, QubitId};
use vqe_pauli::{Decomposition, PauliLabel, PauliOp};

use crate::error::{EnergyError, EnergyResult};

/// Default qubit limit for measurement synthesis.
pub const DEFAULT_MAX_MEASUREMENT_QUBITS: usize = 20;

/// Basis-change circuit for one Pauli term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasurementCircuit {
    /// All-identity term; its expectation is 1 and no state is needed.
    NoOp,
    /// Rotations to apply before measuring. May contain no gates (e.g. `ZZ`).
    Rotations(Circuit),
}

impl MeasurementCircuit {
    /// True for the identity term.
    pub fn is_noop(&self) -> bool {
        matches!(self, MeasurementCircuit::NoOp)
    }

    /// The rotation circuit, if any.
    pub fn circuit(&self) -> Option<&Circuit> {
        match self {
            MeasurementCircuit::NoOp => None,
            MeasurementCircuit::Rotations(circuit) => Some(circuit),
        }
    }

    /// Number of rotation gates.
    pub fn num_gates(&self) -> usize {
        self.circuit().map_or(0, Circuit::len)
    }

    /// `ansatz` followed by the rotations, as a single circuit.
    ///
    /// `None` for the identity term. Fails if the widths differ.
    pub fn after(&self, ansatz: &Circuit) -> EnergyResult<Option<Circuit>> {
        let Some(rotations) = self.circuit() else {
            return Ok(None);
        };
        let mut measured = ansatz.clone();
        measured.compose(rotations)?;
        Ok(Some(measured))
    }
}

/// Synthesize the measurement circuit for `label` with the default limit.
pub fn measurement_circuit(label: &PauliLabel) -> EnergyResult<MeasurementCircuit> {
    measurement_circuit_with_limit(label, DEFAULT_MAX_MEASUREMENT_QUBITS)
}

/// Parse `label` and synthesize its measurement circuit.
///
/// Fails with [`vqe_pauli::PauliError::InvalidLabel`] (wrapped) for symbols
/// outside `{I, X, Y, Z}`.
pub fn measurement_circuit_for(label: &str) -> EnergyResult<MeasurementCircuit> {
    let parsed: PauliLabel = label.parse()?;
    measurement_circuit(&parsed)
}

/// Synthesize the measurement circuit for `label`, rejecting labels longer
/// than `max_qubits` with [`EnergyError::UnsupportedArity`].
pub fn measurement_circuit_with_limit(
    label: &PauliLabel,
    max_qubits: usize,
) -> EnergyResult<MeasurementCircuit> {
    let n = label.num_qubits();
    if n > max_qubits {
        return Err(EnergyError::UnsupportedArity {
            label: label.to_string(),
            num_qubits: n,
            max_qubits,
        });
    }
    if label.is_identity() {
        return Ok(MeasurementCircuit::NoOp);
    }

    let mut circuit = Circuit::with_size(format!("measure_{label}"), n as u32);
    for (q, op) in label.support() {
        let qubit = QubitId::from(q);
        match op {
            PauliOp::X => {
                circuit.h(qubit)?;
            }
            PauliOp::Y => {
                circuit.sdg(qubit)?.h(qubit)?;
            }
            PauliOp::I | PauliOp::Z => {}
        }
    }
    Ok(MeasurementCircuit::Rotations(circuit))
}

/// Measurement circuits for a set of labels, built once and reused across
/// energy evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPlan {
    max_qubits: usize,
    circuits: BTreeMap<PauliLabel, MeasurementCircuit>,
}

impl MeasurementPlan {
    /// An empty plan with the given synthesis limit.
    pub fn new(max_qubits: usize) -> Self {
        Self {
            max_qubits,
            circuits: BTreeMap::new(),
        }
    }

    /// Build circuits for every label of `decomposition`.
    pub fn for_decomposition(
        decomposition: &Decomposition,
        max_qubits: usize,
    ) -> EnergyResult<Self> {
        let mut plan = Self::new(max_qubits);
        for label in decomposition.labels() {
            plan.insert(label.clone())?;
        }
        debug!(
            n_terms = plan.len(),
            n_qubits = decomposition.num_qubits(),
            "built measurement plan"
        );
        Ok(plan)
    }

    /// Build circuits for all `4^n` labels on `num_qubits` qubits.
    ///
    /// The width is checked against `max_qubits` before any label is
    /// enumerated.
    pub fn complete(num_qubits: usize, max_qubits: usize) -> EnergyResult<Self> {
        if num_qubits > max_qubits {
            return Err(EnergyError::UnsupportedArity {
                label: format!("<all {num_qubits}-qubit labels>"),
                num_qubits,
                max_qubits,
            });
        }
        let mut plan = Self::new(max_qubits);
        for label in PauliLabel::all(num_qubits)? {
            plan.insert(label)?;
        }
        Ok(plan)
    }

    /// Synthesize and store the circuit for `label` unless already present.
    pub fn insert(&mut self, label: PauliLabel) -> EnergyResult<&MeasurementCircuit> {
        if !self.circuits.contains_key(&label) {
            let circuit = measurement_circuit_with_limit(&label, self.max_qubits)?;
            self.circuits.insert(label.clone(), circuit);
        }
        self.get(&label)
            .ok_or_else(|| EnergyError::MissingCircuit(label.to_string()))
    }

    /// Circuit for `label`, if planned.
    pub fn get(&self, label: &PauliLabel) -> Option<&MeasurementCircuit> {
        self.circuits.get(label)
    }

    /// The synthesis limit.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Number of planned labels.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// True if nothing is planned.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    /// Iterate over planned `(label, circuit)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliLabel, &MeasurementCircuit)> + '_ {
        self.circuits.iter()
    }
}
