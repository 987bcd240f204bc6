//! Statevector engine implementation.

use std::sync::Mutex;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use vqe_energy::{Counts, Engine, EngineError, EngineResult};
use vqe_ir::Circuit;

use crate::statevector::{Statevector, sample_cumulative};

/// Default capacity in qubits (~16 MB of amplitudes).
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Local statevector engine.
///
/// Applies circuits exactly and samples outcomes from the resulting
/// distribution. The RNG is shared behind a mutex, so one engine can serve
/// several threads; seed it for reproducible sampling.
#[derive(Debug)]
pub struct StatevectorEngine {
    /// Maximum number of qubits supported.
    max_qubits: usize,
    /// Sampling randomness.
    rng: Mutex<StdRng>,
}

impl StatevectorEngine {
    /// Create an engine seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create an engine with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Override the qubit capacity.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// The qubit capacity.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// `|0...0⟩` on `num_qubits` qubits, checked against capacity.
    pub fn zero_state(&self, num_qubits: usize) -> EngineResult<Statevector> {
        self.check_capacity(num_qubits)?;
        Ok(Statevector::zero(num_qubits))
    }

    fn check_capacity(&self, num_qubits: usize) -> EngineResult<()> {
        if num_qubits > self.max_qubits {
            return Err(EngineError::TooManyQubits {
                requested: num_qubits,
                max: self.max_qubits,
            });
        }
        Ok(())
    }
}

impl Default for StatevectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for StatevectorEngine {
    type State = Statevector;

    fn name(&self) -> &str {
        "statevector"
    }

    fn num_qubits(&self, state: &Statevector) -> usize {
        state.num_qubits()
    }

    #[instrument(skip(self, state, circuit), fields(circuit = circuit.name()))]
    fn apply(&self, state: &Statevector, circuit: &Circuit) -> EngineResult<Statevector> {
        self.check_capacity(state.num_qubits())?;
        if circuit.num_qubits() != state.num_qubits() {
            return Err(EngineError::QubitCountMismatch {
                circuit: circuit.num_qubits(),
                state: state.num_qubits(),
            });
        }

        let start = Instant::now();
        let mut evolved = state.clone();
        for instruction in circuit.instructions() {
            evolved.apply(instruction)?;
        }
        debug!(
            n_qubits = state.num_qubits(),
            n_gates = circuit.len(),
            elapsed = ?start.elapsed(),
            "applied circuit"
        );
        Ok(evolved)
    }

    fn probabilities(&self, state: &Statevector) -> EngineResult<Vec<f64>> {
        Ok(state.probabilities())
    }

    #[instrument(skip(self, state))]
    fn sample(&self, state: &Statevector, shots: u32) -> EngineResult<Counts> {
        let cumulative = state.cumulative();
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut counts = Counts::new();
        for _ in 0..shots {
            counts.insert(sample_cumulative(&cumulative, &mut *rng), 1);
        }
        debug!(shots, distinct = counts.len(), "sampled state");
        Ok(counts)
    }
}
