//! The quantum-state engine capability.
//!
//! The estimator never touches amplitudes directly. It asks an [`Engine`] to
//! evolve a state under a circuit, report outcome probabilities, or draw
//! samples. A dense statevector implementation lives in
//! `vqe-adapter-sim`; tests substitute lightweight mocks.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vqe_ir::{Circuit, IrError};

/// Errors raised by an engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// State would exceed the engine's capacity.
    #[error("{requested} qubits requested, engine supports at most {max}")]
    TooManyQubits {
        /// Requested width.
        requested: usize,
        /// Engine limit.
        max: usize,
    },

    /// Circuit and state widths differ.
    #[error("Circuit acts on {circuit} qubits but the state has {state}")]
    QubitCountMismatch {
        /// Circuit width.
        circuit: usize,
        /// State width.
        state: usize,
    },

    /// State data is malformed.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The engine cannot apply a gate.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Circuit error surfaced by the engine.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// A state-evolution and measurement capability.
///
/// Outcome indices follow the big-endian convention of the Pauli basis:
/// qubit `q` of an `n`-qubit state is bit `n - 1 - q` of the index.
pub trait Engine: Send + Sync {
    /// Engine-specific state representation.
    type State: Clone + Send + Sync;

    /// Engine name, used in log output.
    fn name(&self) -> &str;

    /// Width of `state`.
    fn num_qubits(&self, state: &Self::State) -> usize;

    /// Evolve `state` under `circuit`, returning the new state.
    fn apply(&self, state: &Self::State, circuit: &Circuit) -> EngineResult<Self::State>;

    /// Exact probabilities of all `2^n` computational-basis outcomes.
    fn probabilities(&self, state: &Self::State) -> EngineResult<Vec<f64>>;

    /// Draw `shots` computational-basis samples.
    fn sample(&self, state: &Self::State, shots: u32) -> EngineResult<Counts>;
}

/// Measurement outcome histogram keyed by outcome index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<usize, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` observations of `outcome`.
    pub fn insert(&mut self, outcome: usize, n: u64) {
        *self.counts.entry(outcome).or_insert(0) += n;
    }

    /// Observations of `outcome`.
    pub fn get(&self, outcome: usize) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(outcome, count)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Observed outcome with the highest count.
    pub fn most_frequent(&self) -> Option<(usize, u64)> {
        self.iter().max_by_key(|&(outcome, count)| (count, std::cmp::Reverse(outcome)))
    }
}

impl FromIterator<usize> for Counts {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut counts = Counts::new();
        for outcome in iter {
            counts.insert(outcome, 1);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert(3, 1);
        counts.insert(3, 2);
        counts.insert(0, 5);
        assert_eq!(counts.get(3), 3);
        assert_eq!(counts.get(1), 0);
        assert_eq!(counts.total(), 8);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.most_frequent(), Some((0, 5)));
    }

    #[test]
    fn test_counts_from_outcomes() {
        let counts: Counts = [1, 1, 2, 1].into_iter().collect();
        assert_eq!(counts.get(1), 3);
        assert_eq!(counts.get(2), 1);
        assert!(!counts.is_empty());
    }
}
