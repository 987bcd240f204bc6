//! VQE Local Statevector Engine
//!
//! This crate implements the [`vqe_energy::Engine`] capability with a dense
//! statevector. Circuits are applied exactly; measurement outcomes are drawn
//! from the resulting distribution with a seedable RNG.
//!
//! # Features
//!
//! - **Exact Evolution**: Full statevector representation
//! - **All Standard Gates**: Supports every gate of `vqe-ir`
//! - **Reproducible Sampling**: `StatevectorEngine::seeded(seed)`
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! The default capacity is 20 qubits.
//!
//! # Example
//!
//! ```rust
//! use vqe_adapter_sim::{Statevector, StatevectorEngine};
//! use vqe_energy::Engine;
//! use vqe_ir::Circuit;
//!
//! let engine = StatevectorEngine::seeded(7);
//! let bell = Circuit::bell().unwrap();
//! let state = engine.apply(&Statevector::zero(2), &bell).unwrap();
//!
//! let probs = engine.probabilities(&state).unwrap();
//! assert!((probs[0] - 0.5).abs() < 1e-12);
//! assert!((probs[3] - 0.5).abs() < 1e-12);
//!
//! let counts = engine.sample(&state, 1000).unwrap();
//! assert_eq!(counts.get(1) + counts.get(2), 0);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, StatevectorEngine};
pub use statevector::Statevector;
