//! Error types for the demo suite.

use thiserror::Error;

/// Errors raised while setting up or running a demo.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// The reference solver was given a matrix that is not Hermitian.
    #[error("Hamiltonian is not Hermitian within {tolerance}")]
    NotHermitian {
        /// Tolerance used for the check.
        tolerance: f64,
    },

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] vqe_ir::IrError),

    /// Decomposition error.
    #[error("Pauli error: {0}")]
    Pauli(#[from] vqe_pauli::PauliError),

    /// Energy estimation error.
    #[error("Energy error: {0}")]
    Energy(#[from] vqe_energy::EnergyError),

    /// Engine error.
    #[error("Engine error: {0}")]
    Engine(#[from] vqe_energy::EngineError),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;
