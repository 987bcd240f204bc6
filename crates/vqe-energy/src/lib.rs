//! `vqe-energy`: expectation values and energies of Pauli-decomposed
//! Hamiltonians.
//!
//! Given a [`vqe_pauli::Decomposition`] of a Hamiltonian, this crate:
//!
//! - synthesizes the **measurement circuit** that rotates each term into the
//!   computational basis ([`measurement`]);
//! - estimates each term's **expectation value** from a prepared state,
//!   exactly or by sampling ([`estimator`]);
//! - sums coefficient-weighted expectations into the **energy** of an ansatz
//!   state ([`energy`]).
//!
//! Quantum states are opaque: all state work goes through the [`Engine`]
//! trait, implemented for dense statevectors by `vqe-adapter-sim`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vqe_adapter_sim::{StatevectorEngine, Statevector};
//! use vqe_energy::{EnergyEstimator, EstimatorConfig};
//! use vqe_ir::{Circuit, QubitId};
//! use vqe_pauli::Decomposition;
//!
//! let h = Decomposition::parse_terms([("II", 0.5), ("XX", -0.5), ("YY", -0.5), ("ZZ", 0.5)])?;
//! let estimator = EnergyEstimator::new(
//!     StatevectorEngine::seeded(7),
//!     h,
//!     Statevector::zero(2),
//!     EstimatorConfig::default(),
//! )?;
//! let mut ansatz = Circuit::with_size("singlet", 2);
//! ansatz.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.x(QubitId(1))?;
//! assert!((estimator.energy(&ansatz)? + 1.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod energy;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod measurement;

pub use config::{ConfigError, EstimatorConfig};
pub use energy::{EnergyEstimator, estimate_energy};
pub use engine::{Counts, Engine, EngineError, EngineResult};
pub use error::{EnergyError, EnergyResult};
pub use estimator::{
    EstimationMode, estimate_expectation, expectation_from_counts, expectation_from_probabilities,
    parity_sign,
};
pub use measurement::{
    DEFAULT_MAX_MEASUREMENT_QUBITS, MeasurementCircuit, MeasurementPlan, measurement_circuit,
    measurement_circuit_for, measurement_circuit_with_limit,
};
