//! `vqe-pauli`: Pauli basis algebra and operator decomposition.
//!
//! Any `2^n × 2^n` complex matrix can be written as a weighted sum of
//! tensor products of the four Pauli matrices:
//!
//!   H = Σ_P  a_P · P,    a_P = Tr(P† H) / 2^n
//!
//! where `P` runs over the `4^n` labels in `{I, X, Y, Z}^n`. This crate
//! provides the basis ([`basis`]), the forward transform ([`decompose()`])
//! and its inverse ([`compose()`]).
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use vqe_pauli::{compose, decompose};
//!
//! let c = |re: f64| Complex64::new(re, 0.0);
//! let h = array![
//!     [c(1.0), c(0.0), c(0.0), c(0.0)],
//!     [c(0.0), c(0.0), c(-1.0), c(0.0)],
//!     [c(0.0), c(-1.0), c(0.0), c(0.0)],
//!     [c(0.0), c(0.0), c(0.0), c(1.0)],
//! ];
//!
//! let d = decompose(&h).unwrap();
//! assert_eq!(d.len(), 4);
//! assert!((d.coefficient("XX").unwrap().re + 0.5).abs() < 1e-12);
//!
//! let back = compose(&d);
//! assert!((back[[1, 2]].re + 1.0).abs() < 1e-12);
//! ```

pub mod basis;
pub mod decompose;
pub mod decomposition;
pub mod error;
pub mod label;

pub use basis::{BasisCache, basis_matrix, generator, inner_product, is_hermitian, num_qubits_of};
pub use decompose::{DEFAULT_TOLERANCE, Decomposer, compose, compose_terms, decompose};
pub use decomposition::Decomposition;
pub use error::{PauliError, PauliResult};
pub use label::{PauliLabel, PauliOp};
