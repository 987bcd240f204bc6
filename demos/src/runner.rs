//! VQE (Variational Quantum Eigensolver) runner.
//!
//! Decomposes the Hamiltonian once, binds it to a statevector engine through
//! an [`EnergyEstimator`] and hands the resulting objective to the optimizer.

use std::f64::consts::FRAC_PI_2;
use std::time::Instant;

use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use vqe_adapter_sim::StatevectorEngine;
use vqe_energy::{EnergyEstimator, EstimationMode, EstimatorConfig};
use vqe_pauli::{Decomposer, Decomposition};

use crate::ansatz::AnsatzKind;
use crate::error::DemoResult;
use crate::optimizer::{NelderMead, Optimizer};

/// Result of a VQE run.
#[derive(Debug, Clone, Serialize)]
pub struct VqeResult {
    /// Optimal energy found.
    pub optimal_energy: f64,
    /// Optimal parameters.
    pub optimal_params: Vec<f64>,
    /// Number of optimizer iterations.
    pub iterations: usize,
    /// Number of energy evaluations.
    pub energy_evaluations: usize,
    /// Best energy after each improvement.
    pub energy_history: Vec<f64>,
    /// Whether optimization converged.
    pub converged: bool,
    /// Estimation mode used for every evaluation.
    pub mode: EstimationMode,
    /// Wall-clock time of the optimization in milliseconds.
    pub elapsed_ms: u64,
}

/// VQE runner configuration.
#[derive(Debug, Clone)]
pub struct VqeRunner {
    decomposition: Decomposition,
    ansatz: AnsatzKind,
    optimizer: NelderMead,
    config: EstimatorConfig,
    seed: u64,
}

impl VqeRunner {
    /// Create a runner for an already decomposed Hamiltonian.
    pub fn new(decomposition: Decomposition) -> Self {
        Self {
            decomposition,
            ansatz: AnsatzKind::TwoLocal { reps: 1 },
            optimizer: NelderMead::new(),
            config: EstimatorConfig::default(),
            seed: 42,
        }
    }

    /// Decompose `hamiltonian` at the default tolerance and wrap it.
    pub fn from_matrix(hamiltonian: &Array2<Complex64>) -> DemoResult<Self> {
        Ok(Self::new(Decomposer::new().decompose(hamiltonian)?))
    }

    /// Set the ansatz family.
    #[must_use]
    pub fn with_ansatz(mut self, ansatz: AnsatzKind) -> Self {
        self.ansatz = ansatz;
        self
    }

    /// Set the optimizer.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: NelderMead) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the estimator configuration.
    ///
    /// Terms of the decomposition below the configured tolerance are
    /// dropped when the runner starts.
    #[must_use]
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed for the initial parameters and for measurement sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The Hamiltonian being minimized.
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.decomposition.num_qubits()
    }

    /// Get the number of parameters needed.
    pub fn num_parameters(&self) -> usize {
        self.ansatz.num_parameters(self.num_qubits())
    }

    /// Run VQE from [`VqeRunner::initial_parameters`].
    pub fn run(&self) -> DemoResult<VqeResult> {
        self.run_observed(self.initial_parameters(), |_, _| {})
    }

    /// Run VQE with specified initial parameters.
    pub fn run_with_params(&self, initial_params: Vec<f64>) -> DemoResult<VqeResult> {
        self.run_observed(initial_params, |_, _| {})
    }

    /// Run VQE, calling `observe(evaluation, energy)` after every energy
    /// evaluation.
    ///
    /// The initial point is evaluated once up front. A parameter vector of
    /// the wrong length or a failing first evaluation is returned as an error
    /// instead of being handed to the optimizer.
    pub fn run_observed<O>(&self, initial_params: Vec<f64>, mut observe: O) -> DemoResult<VqeResult>
    where
        O: FnMut(usize, f64),
    {
        let engine = StatevectorEngine::seeded(self.seed);
        let initial_state = engine.zero_state(self.num_qubits())?;
        let decomposition = self.decomposition.clone().pruned(self.config.tolerance);
        let estimator = EnergyEstimator::new(engine, decomposition, initial_state, self.config.clone())?;

        info!(
            n_qubits = self.num_qubits(),
            n_terms = estimator.decomposition().len(),
            n_params = initial_params.len(),
            mode = %self.config.mode,
            "starting VQE"
        );

        let num_qubits = self.num_qubits();
        let ansatz = self.ansatz;
        let initial_energy = estimator.energy(&ansatz.build(num_qubits, &initial_params)?)?;
        observe(estimator.evaluations(), initial_energy);
        debug!(energy = initial_energy, "initial point");

        let mut energy = estimator.objective(move |params: &[f64]| ansatz.build(num_qubits, params));
        let objective = |params: &[f64]| {
            let value = energy(params);
            observe(estimator.evaluations(), value);
            value
        };

        let start = Instant::now();
        let result = self.optimizer.minimize(objective, initial_params);
        let elapsed = start.elapsed();

        info!(
            energy = result.optimal_value,
            evaluations = estimator.evaluations(),
            converged = result.converged,
            ?elapsed,
            "VQE finished"
        );

        Ok(VqeResult {
            optimal_energy: result.optimal_value,
            optimal_params: result.optimal_params,
            iterations: result.num_iterations,
            energy_evaluations: estimator.evaluations(),
            energy_history: result.history,
            converged: result.converged,
            mode: self.config.mode,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// Seeded random parameters in `[-π/2, π/2)`.
    pub fn initial_parameters(&self) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.num_parameters())
            .map(|_| rng.gen_range(-FRAC_PI_2..FRAC_PI_2))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DemoError;
    use crate::problems::scenario_hamiltonian;
    use vqe_ir::IrError;

    #[test]
    fn test_num_parameters() {
        let runner = VqeRunner::from_matrix(&scenario_hamiltonian())
            .unwrap()
            .with_ansatz(AnsatzKind::TwoLocal { reps: 2 });
        assert_eq!(runner.num_qubits(), 2);
        assert_eq!(runner.num_parameters(), 6);
    }

    #[test]
    fn test_initial_parameters_are_seeded() {
        let runner = VqeRunner::from_matrix(&scenario_hamiltonian()).unwrap();
        let a = runner.clone().with_seed(7).initial_parameters();
        let b = runner.clone().with_seed(7).initial_parameters();
        let c = runner.with_seed(8).initial_parameters();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|p| p.abs() <= FRAC_PI_2));
    }

    #[test]
    fn test_observer_sees_every_evaluation() {
        let runner = VqeRunner::from_matrix(&scenario_hamiltonian())
            .unwrap()
            .with_optimizer(NelderMead::new().with_max_iterations(20));
        let mut seen = Vec::new();
        let result = runner
            .run_observed(vec![0.1; 4], |n, e| seen.push((n, e)))
            .unwrap();
        assert_eq!(seen.len(), result.energy_evaluations);
        assert_eq!(seen.first().map(|s| s.0), Some(1));
        assert!(seen.iter().all(|(_, e)| e.is_finite()));
    }

    #[test]
    fn test_wrong_parameter_count_is_an_error() {
        let runner = VqeRunner::from_matrix(&scenario_hamiltonian())
            .unwrap()
            .with_optimizer(NelderMead::new().with_max_iterations(5));
        let mut seen = 0;
        let err = runner
            .run_observed(vec![0.0; 3], |_, _| seen += 1)
            .unwrap_err();
        assert!(matches!(
            err,
            DemoError::Ir(IrError::ParameterCount {
                expected: 4,
                got: 3,
                ..
            })
        ));
        assert_eq!(seen, 0);
    }
}
