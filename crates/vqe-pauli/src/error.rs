//! Error types for the pauli crate.

use thiserror::Error;

/// Errors produced by the basis algebra and the decomposition engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PauliError {
    /// Matrix is not `2^n × 2^n`, or labels disagree on the qubit count.
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// A label contains a symbol outside `{I, X, Y, Z}`.
    #[error("Invalid Pauli symbol '{symbol}' at position {position} in label \"{label}\"")]
    InvalidLabel {
        /// The full label as given.
        label: String,
        /// The offending character.
        symbol: char,
        /// Character position of the symbol.
        position: usize,
    },

    /// A coefficient that must be real carries an imaginary residue.
    #[error("Coefficient of {label} has imaginary part {imag:e} (tolerance {tolerance:e})")]
    ComplexCoefficient {
        /// Label of the offending term.
        label: String,
        /// The imaginary part.
        imag: f64,
        /// The tolerance it exceeded.
        tolerance: f64,
    },

    /// A zero threshold that is negative, zero or not finite.
    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
}

/// Result type for pauli operations.
pub type PauliResult<T> = Result<T, PauliError>;
