//! Error types for the energy crate.

use thiserror::Error;
use vqe_ir::IrError;
use vqe_pauli::PauliError;

use crate::config::ConfigError;
use crate::engine::EngineError;

/// Errors raised while synthesizing measurement circuits or estimating
/// expectation values and energies.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnergyError {
    /// Label is longer than the synthesizer's qubit limit.
    #[error("Label {label} acts on {num_qubits} qubits; measurement synthesis supports at most {max_qubits}")]
    UnsupportedArity {
        /// The offending label.
        label: String,
        /// Its length.
        num_qubits: usize,
        /// The configured limit.
        max_qubits: usize,
    },

    /// A decomposition term has no circuit in the measurement plan.
    #[error("No measurement circuit for label {0}")]
    MissingCircuit(String),

    /// Sampling was requested with zero shots.
    #[error("Sampling requires at least one shot")]
    InvalidShots,

    /// A Hamiltonian coefficient has an imaginary part above tolerance.
    #[error("Coefficient of {label} has imaginary part {imag:e} (tolerance {tolerance:e})")]
    ComplexCoefficient {
        /// Label of the offending term.
        label: String,
        /// The imaginary part.
        imag: f64,
        /// The tolerance it exceeded.
        tolerance: f64,
    },

    /// Operator, state or circuit widths disagree.
    #[error("Qubit count mismatch in {context}: expected {expected}, got {got}")]
    QubitMismatch {
        /// What was being checked.
        context: String,
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// Basis algebra error.
    #[error("Pauli error: {0}")]
    Pauli(#[from] PauliError),

    /// Circuit construction error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// State engine error.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for energy operations.
pub type EnergyResult<T> = Result<T, EnergyError>;
