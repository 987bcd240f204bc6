//! Energy aggregation.
//!
//!   E(θ) = Σ_P  re(a_P) · ⟨ψ(θ)|P|ψ(θ)⟩
//!
//! where `|ψ(θ)⟩` is the ansatz applied to the initial state and the sum runs
//! over the terms of a [`Decomposition`].

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, instrument, warn};
use vqe_ir::Circuit;
use vqe_pauli::{Decomposer, Decomposition, DEFAULT_TOLERANCE, PauliLabel};

use crate::config::EstimatorConfig;
use crate::engine::Engine;
use crate::error::{EnergyError, EnergyResult};
use crate::estimator::{EstimationMode, estimate_expectation, read_out};
use crate::measurement::MeasurementPlan;

/// Estimate `⟨ψ|H|ψ⟩` for `|ψ⟩ = ansatz · initial_state`.
///
/// Every term is looked up in `plan` ([`EnergyError::MissingCircuit`] if
/// absent) and must have a real coefficient within [`DEFAULT_TOLERANCE`]
/// ([`EnergyError::ComplexCoefficient`] otherwise). On any failure no
/// partial sum is returned.
pub fn estimate_energy<E: Engine>(
    engine: &E,
    decomposition: &Decomposition,
    plan: &MeasurementPlan,
    initial_state: &E::State,
    ansatz: &Circuit,
    mode: EstimationMode,
) -> EnergyResult<f64> {
    let state = prepare(engine, decomposition, initial_state, ansatz, mode)?;
    accumulate(engine, decomposition, plan, &state, mode, DEFAULT_TOLERANCE)
}

/// Validate widths and mode, then evolve the initial state under the ansatz.
fn prepare<E: Engine>(
    engine: &E,
    decomposition: &Decomposition,
    initial_state: &E::State,
    ansatz: &Circuit,
    mode: EstimationMode,
) -> EnergyResult<E::State> {
    mode.validate()?;
    let n = decomposition.num_qubits();
    if ansatz.num_qubits() != n {
        return Err(EnergyError::QubitMismatch {
            context: format!("ansatz '{}'", ansatz.name()),
            expected: n,
            got: ansatz.num_qubits(),
        });
    }
    let width = engine.num_qubits(initial_state);
    if width != n {
        return Err(EnergyError::QubitMismatch {
            context: "initial state".to_string(),
            expected: n,
            got: width,
        });
    }
    Ok(engine.apply(initial_state, ansatz)?)
}

/// Weighted sum of term expectations over an already prepared state.
fn accumulate<E: Engine>(
    engine: &E,
    decomposition: &Decomposition,
    plan: &MeasurementPlan,
    state: &E::State,
    mode: EstimationMode,
    tolerance: f64,
) -> EnergyResult<f64> {
    let mut energy = 0.0;
    for (label, coefficient) in decomposition.iter() {
        if coefficient.norm() < tolerance {
            continue;
        }
        let circuit = plan
            .get(label)
            .ok_or_else(|| EnergyError::MissingCircuit(label.to_string()))?;
        let re = real_part(label, coefficient, tolerance)?;
        energy += re * estimate_expectation(engine, state, label, circuit, mode)?;
    }
    Ok(energy)
}

fn real_part(label: &impl std::fmt::Display, coefficient: Complex64, tolerance: f64) -> EnergyResult<f64> {
    if coefficient.im.abs() > tolerance {
        return Err(EnergyError::ComplexCoefficient {
            label: label.to_string(),
            imag: coefficient.im,
            tolerance,
        });
    }
    Ok(coefficient.re)
}

/// A Hamiltonian bound to an engine, ready for repeated energy evaluation.
///
/// The measurement plan is built once at construction; each call to
/// [`EnergyEstimator::energy`] only prepares the trial state and runs the
/// estimator per term.
pub struct EnergyEstimator<E: Engine> {
    engine: E,
    decomposition: Decomposition,
    plan: MeasurementPlan,
    initial_state: E::State,
    config: EstimatorConfig,
    evaluations: AtomicUsize,
}

impl<E: Engine> EnergyEstimator<E> {
    /// Bind `decomposition` to `engine` and `initial_state`.
    ///
    /// Fails on invalid configuration, on a width mismatch between the
    /// decomposition and the initial state, on coefficients that are not
    /// real within tolerance, and on labels the synthesizer cannot handle.
    pub fn new(
        engine: E,
        decomposition: Decomposition,
        initial_state: E::State,
        config: EstimatorConfig,
    ) -> EnergyResult<Self> {
        config.validate()?;

        let width = engine.num_qubits(&initial_state);
        if width != decomposition.num_qubits() {
            return Err(EnergyError::QubitMismatch {
                context: "initial state".to_string(),
                expected: decomposition.num_qubits(),
                got: width,
            });
        }
        for (label, coefficient) in decomposition.iter() {
            real_part(label, coefficient, config.tolerance)?;
        }

        let plan = MeasurementPlan::for_decomposition(&decomposition, config.max_measurement_qubits)?;
        debug!(
            engine = engine.name(),
            n_qubits = decomposition.num_qubits(),
            n_terms = decomposition.len(),
            mode = %config.mode,
            "energy estimator ready"
        );

        Ok(Self {
            engine,
            decomposition,
            plan,
            initial_state,
            config,
            evaluations: AtomicUsize::new(0),
        })
    }

    /// Decompose `hamiltonian` at the configured tolerance and bind it.
    pub fn from_matrix(
        engine: E,
        hamiltonian: &Array2<Complex64>,
        initial_state: E::State,
        config: EstimatorConfig,
    ) -> EnergyResult<Self> {
        let decomposition = Decomposer::with_tolerance(config.tolerance)?.decompose(hamiltonian)?;
        Self::new(engine, decomposition, initial_state, config)
    }

    /// Energy of the state prepared by `ansatz`.
    #[instrument(skip(self, ansatz), fields(ansatz = ansatz.name()))]
    pub fn energy(&self, ansatz: &Circuit) -> EnergyResult<f64> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let mode = self.config.mode;
        let state = prepare(&self.engine, &self.decomposition, &self.initial_state, ansatz, mode)?;
        let energy = accumulate(
            &self.engine,
            &self.decomposition,
            &self.plan,
            &state,
            mode,
            self.config.tolerance,
        )?;
        debug!(energy, "evaluated energy");
        Ok(energy)
    }

    /// Expectation of a single planned term for the state prepared by
    /// `ansatz`.
    ///
    /// The ansatz is composed with the term's measurement rotation and the
    /// combined circuit is applied to the initial state in one engine call.
    /// Does not count as an energy evaluation.
    pub fn term_expectation(&self, ansatz: &Circuit, label: &PauliLabel) -> EnergyResult<f64> {
        let mode = self.config.mode;
        mode.validate()?;
        let circuit = self
            .plan
            .get(label)
            .ok_or_else(|| EnergyError::MissingCircuit(label.to_string()))?;
        let n = self.decomposition.num_qubits();
        if ansatz.num_qubits() != n {
            return Err(EnergyError::QubitMismatch {
                context: format!("ansatz '{}'", ansatz.name()),
                expected: n,
                got: ansatz.num_qubits(),
            });
        }
        match circuit.after(ansatz)? {
            None => Ok(1.0),
            Some(measured) => {
                let rotated = self.engine.apply(&self.initial_state, &measured)?;
                read_out(&self.engine, &rotated, label, mode)
            }
        }
    }

    /// Objective function for derivative-free optimizers.
    ///
    /// `build` maps a parameter vector to an ansatz circuit. Failed
    /// evaluations are logged and reported as `f64::INFINITY`.
    pub fn objective<'a, F, X>(&'a self, mut build: F) -> impl FnMut(&[f64]) -> f64 + 'a
    where
        F: FnMut(&[f64]) -> Result<Circuit, X> + 'a,
        EnergyError: From<X>,
    {
        move |params: &[f64]| {
            let result = build(params)
                .map_err(EnergyError::from)
                .and_then(|ansatz| self.energy(&ansatz));
            match result {
                Ok(energy) => energy,
                Err(err) => {
                    warn!(%err, ?params, "energy evaluation failed");
                    f64::INFINITY
                }
            }
        }
    }

    /// Number of energy evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// The bound decomposition.
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    /// The cached measurement plan.
    pub fn plan(&self) -> &MeasurementPlan {
        &self.plan
    }

    /// The active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The state every ansatz is applied to.
    pub fn initial_state(&self) -> &E::State {
        &self.initial_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::tests::MockEngine;
    use vqe_ir::{IrResult, QubitId};

    fn scenario() -> Decomposition {
        Decomposition::parse_terms([("II", 0.5), ("XX", -0.5), ("YY", -0.5), ("ZZ", 0.5)])
            .unwrap()
    }

    fn identity_ansatz(n: u32) -> Circuit {
        Circuit::with_size("id", n)
    }

    #[test]
    fn test_energy_sums_weighted_terms() {
        let engine = MockEngine::default();
        let d = Decomposition::parse_terms([("II", 2.0), ("ZI", 3.0), ("IZ", -1.0)]).unwrap();
        let plan = MeasurementPlan::for_decomposition(&d, 2).unwrap();
        // |10⟩: ZI = -1, IZ = +1
        let state = vec![0.0, 0.0, 1.0, 0.0];
        let e = estimate_energy(&engine, &d, &plan, &state, &identity_ansatz(2), EstimationMode::Analytical)
            .unwrap();
        assert!((e - (2.0 - 3.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_circuit() {
        let engine = MockEngine::default();
        let d = scenario();
        let plan = MeasurementPlan::new(2);
        let err = estimate_energy(
            &engine,
            &d,
            &plan,
            &vec![1.0, 0.0, 0.0, 0.0],
            &identity_ansatz(2),
            EstimationMode::Analytical,
        )
        .unwrap_err();
        assert!(matches!(err, EnergyError::MissingCircuit(_)));
    }

    #[test]
    fn test_complex_coefficient_rejected() {
        let engine = MockEngine::default();
        let mut d = Decomposition::new(1);
        d.insert("Z".parse().unwrap(), Complex64::new(1.0, 0.5)).unwrap();
        let plan = MeasurementPlan::for_decomposition(&d, 1).unwrap();
        let err = estimate_energy(
            &engine,
            &d,
            &plan,
            &vec![1.0, 0.0],
            &identity_ansatz(1),
            EstimationMode::Analytical,
        )
        .unwrap_err();
        assert!(matches!(err, EnergyError::ComplexCoefficient { .. }));

        let err = EnergyEstimator::new(MockEngine::default(), d, vec![1.0, 0.0], EstimatorConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, EnergyError::ComplexCoefficient { .. }));
    }

    #[test]
    fn test_width_mismatches() {
        let engine = MockEngine::default();
        let d = scenario();
        let plan = MeasurementPlan::for_decomposition(&d, 2).unwrap();
        let state = vec![1.0, 0.0, 0.0, 0.0];

        let err = estimate_energy(&engine, &d, &plan, &state, &identity_ansatz(3), EstimationMode::Analytical)
            .unwrap_err();
        assert!(matches!(err, EnergyError::QubitMismatch { expected: 2, got: 3, .. }));

        let err = estimate_energy(&engine, &d, &plan, &vec![1.0, 0.0], &identity_ansatz(2), EstimationMode::Analytical)
            .unwrap_err();
        assert!(matches!(err, EnergyError::QubitMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_zero_shots_fail_before_preparation() {
        let engine = MockEngine::default();
        let d = scenario();
        let plan = MeasurementPlan::for_decomposition(&d, 2).unwrap();
        let err = estimate_energy(
            &engine,
            &d,
            &plan,
            &vec![1.0, 0.0, 0.0, 0.0],
            &identity_ansatz(2),
            EstimationMode::Sampling { shots: 0 },
        )
        .unwrap_err();
        assert!(matches!(err, EnergyError::InvalidShots));
        assert_eq!(engine.calls(), 0);
    }

    #[test]
    fn test_identity_only_hamiltonian() {
        let engine = MockEngine::default();
        let d = Decomposition::parse_terms([("II", -1.25)]).unwrap();
        let estimator =
            EnergyEstimator::new(engine, d, vec![0.25; 4], EstimatorConfig::default()).unwrap();
        assert_eq!(estimator.energy(&identity_ansatz(2)).unwrap(), -1.25);
        // State preparation only; the identity term never reaches the engine.
        assert_eq!(estimator.engine().calls(), 1);
    }

    #[test]
    fn test_objective_counts_and_maps_errors() {
        let d = Decomposition::parse_terms([("Z", 1.0)]).unwrap();
        let estimator =
            EnergyEstimator::new(MockEngine::default(), d, vec![1.0, 0.0], EstimatorConfig::default())
                .unwrap();

        let build = |params: &[f64]| -> IrResult<Circuit> {
            let mut c = Circuit::with_size("ry", 1);
            c.ry(params[0], QubitId(0))?;
            Ok(c)
        };
        let mut objective = estimator.objective(build);
        assert_eq!(objective(&[0.3]), 1.0);
        assert_eq!(objective(&[0.0]), 1.0);

        let bad = |_: &[f64]| -> IrResult<Circuit> {
            let mut c = Circuit::with_size("bad", 1);
            c.h(QubitId(3))?;
            Ok(c)
        };
        let mut failing = estimator.objective(bad);
        assert_eq!(failing(&[0.0]), f64::INFINITY);

        assert_eq!(estimator.evaluations(), 2);
        assert_eq!(estimator.plan().len(), 1);
    }

    #[test]
    fn test_term_expectation_uses_one_engine_pass() {
        let d = Decomposition::parse_terms([("II", 1.0), ("ZI", 1.0), ("XX", 1.0)]).unwrap();
        // |10⟩
        let state = vec![0.0, 0.0, 1.0, 0.0];
        let estimator =
            EnergyEstimator::new(MockEngine::default(), d, state, EstimatorConfig::default()).unwrap();
        let ansatz = identity_ansatz(2);

        assert_eq!(estimator.term_expectation(&ansatz, &"II".parse().unwrap()).unwrap(), 1.0);
        assert_eq!(estimator.engine().calls(), 0);

        assert_eq!(estimator.term_expectation(&ansatz, &"ZI".parse().unwrap()).unwrap(), -1.0);
        // One apply of the composed circuit plus one readout.
        assert_eq!(estimator.engine().calls(), 2);
        assert_eq!(estimator.evaluations(), 0);

        assert!(matches!(
            estimator.term_expectation(&ansatz, &"YY".parse().unwrap()),
            Err(EnergyError::MissingCircuit(_))
        ));
        assert!(matches!(
            estimator.term_expectation(&identity_ansatz(3), &"XX".parse().unwrap()),
            Err(EnergyError::QubitMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_from_matrix_uses_config_tolerance() {
        let mut h = Array2::<Complex64>::eye(2);
        h[[0, 1]] = Complex64::new(1e-6, 0.0);
        h[[1, 0]] = Complex64::new(1e-6, 0.0);
        let config = EstimatorConfig {
            tolerance: 1e-3,
            ..EstimatorConfig::default()
        };
        let estimator =
            EnergyEstimator::from_matrix(MockEngine::default(), &h, vec![1.0, 0.0], config).unwrap();
        assert_eq!(estimator.decomposition().len(), 1);
        assert_eq!(estimator.initial_state(), &vec![1.0, 0.0]);
        assert_eq!(estimator.config().tolerance, 1e-3);
    }
}
