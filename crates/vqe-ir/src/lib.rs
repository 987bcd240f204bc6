//! VQE Circuit Representation
//!
//! A deliberately small circuit IR used by the energy core: an ordered list
//! of gate applications over a fixed number of qubits. Ansatz circuits and
//! measurement-basis rotations are both expressed as a [`Circuit`], and
//! composed with [`Circuit::compose`] before being handed to an engine.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use vqe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ` | 2 | Controlled Paulis |
//! | `Swap` | 2 | SWAP gate |
//! | `CRz`, `CP` | 2 | Controlled rotations |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
