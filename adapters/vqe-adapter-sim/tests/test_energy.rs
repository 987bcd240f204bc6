//! End-to-end energy estimation on the statevector engine.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use vqe_adapter_sim::{Statevector, StatevectorEngine};
use vqe_energy::{
    EnergyError, EnergyEstimator, Engine, EstimationMode, EstimatorConfig, MeasurementPlan,
    estimate_energy, estimate_expectation, measurement_circuit, measurement_circuit_for,
};
use vqe_ir::{Circuit, QubitId};
use vqe_pauli::{Decomposition, PauliLabel, compose, decompose};

fn scenario_matrix() -> Array2<Complex64> {
    let mut h = Array2::zeros((4, 4));
    h[[0, 0]] = Complex64::new(1.0, 0.0);
    h[[1, 2]] = Complex64::new(-1.0, 0.0);
    h[[2, 1]] = Complex64::new(-1.0, 0.0);
    h[[3, 3]] = Complex64::new(1.0, 0.0);
    h
}

/// `(|01⟩ + |10⟩)/√2`
fn symmetric_ansatz() -> Circuit {
    let mut c = Circuit::with_size("symmetric", 2);
    c.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .x(QubitId(1))
        .unwrap();
    c
}

fn label(s: &str) -> PauliLabel {
    s.parse().unwrap()
}

/// `⟨ψ|M|ψ⟩` computed directly from amplitudes.
fn exact_expectation(state: &Statevector, m: &Array2<Complex64>) -> f64 {
    let amps = state.amplitudes();
    let mut total = Complex64::new(0.0, 0.0);
    for i in 0..amps.len() {
        for j in 0..amps.len() {
            total += amps[i].conj() * m[[i, j]] * amps[j];
        }
    }
    total.re
}

#[test]
fn test_scenario_energy_is_minus_one() {
    let d = decompose(&scenario_matrix()).unwrap();
    assert_eq!(d.len(), 4);

    let engine = StatevectorEngine::seeded(1);
    let plan = MeasurementPlan::for_decomposition(&d, 2).unwrap();
    let energy = estimate_energy(
        &engine,
        &d,
        &plan,
        &Statevector::zero(2),
        &symmetric_ansatz(),
        EstimationMode::Analytical,
    )
    .unwrap();
    assert!((energy + 1.0).abs() < 1e-12, "energy = {energy}");
}

#[test]
fn test_estimator_matches_direct_expectation() {
    let engine = StatevectorEngine::seeded(1);
    let estimator = EnergyEstimator::from_matrix(
        engine,
        &scenario_matrix(),
        Statevector::zero(2),
        EstimatorConfig::default(),
    )
    .unwrap();

    let mut ansatz = Circuit::with_size("bell", 2);
    ansatz.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    // ⟨Φ+|H|Φ+⟩ = 0.5 - 0.5·1 - 0.5·(-1) + 0.5·1 = 1
    assert!((estimator.energy(&ansatz).unwrap() - 1.0).abs() < 1e-12);
    assert!((estimator.energy(&symmetric_ansatz()).unwrap() + 1.0).abs() < 1e-12);
    assert_eq!(estimator.evaluations(), 2);
}

#[test]
fn test_identity_term_for_any_state() {
    let engine = StatevectorEngine::seeded(5);
    let mut c = Circuit::with_size("mix", 2);
    c.ry(0.7, QubitId(0)).unwrap().rx(1.9, QubitId(1)).unwrap();
    let state = engine.apply(&Statevector::zero(2), &c).unwrap();

    for mode in [EstimationMode::Analytical, EstimationMode::Sampling { shots: 10 }] {
        let value = estimate_expectation(
            &engine,
            &state,
            &label("II"),
            &measurement_circuit_for("II").unwrap(),
            mode,
        )
        .unwrap();
        assert_eq!(value, 1.0);
    }
}

#[test]
fn test_y_measurement_sign() {
    // S·H|0⟩ = (|0⟩ + i|1⟩)/√2, the +1 eigenstate of Y.
    let engine = StatevectorEngine::seeded(2);
    let mut prep = Circuit::with_size("plus_i", 1);
    prep.h(QubitId(0)).unwrap().s(QubitId(0)).unwrap();
    let state = engine.apply(&Statevector::zero(1), &prep).unwrap();

    let y = label("Y");
    let circuit = measurement_circuit(&y).unwrap();
    let value =
        estimate_expectation(&engine, &state, &y, &circuit, EstimationMode::Analytical).unwrap();
    assert!((value - 1.0).abs() < 1e-12);

    // Sdg·H|0⟩ is the -1 eigenstate.
    let mut prep = Circuit::with_size("minus_i", 1);
    prep.h(QubitId(0)).unwrap().sdg(QubitId(0)).unwrap();
    let state = engine.apply(&Statevector::zero(1), &prep).unwrap();
    let value =
        estimate_expectation(&engine, &state, &y, &circuit, EstimationMode::Analytical).unwrap();
    assert!((value + 1.0).abs() < 1e-12);
}

#[test]
fn test_probabilities_normalized_after_measurement_rotation() {
    let engine = StatevectorEngine::seeded(3);
    let mut prep = Circuit::with_size("prep", 3);
    prep.ry(0.4, QubitId(0))
        .unwrap()
        .rx(1.1, QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(2))
        .unwrap()
        .rz(0.3, QubitId(2))
        .unwrap();
    let state = engine.apply(&Statevector::zero(3), &prep).unwrap();

    let plan = MeasurementPlan::complete(3, 3).unwrap();
    for (l, mc) in plan.iter() {
        let Some(rotation) = mc.circuit() else {
            continue;
        };
        let rotated = engine.apply(&state, rotation).unwrap();
        let total: f64 = engine.probabilities(&rotated).unwrap().iter().sum();
        assert!((total - 1.0).abs() < 1e-12, "{l}: total = {total}");
    }
}

#[test]
fn test_repeated_sampling_follows_the_engine_seed() {
    let mut prep = Circuit::with_size("plus", 1);
    prep.h(QubitId(0)).unwrap();
    let x = label("X");
    let z = label("Z");
    let x_circuit = measurement_circuit(&x).unwrap();
    let z_circuit = measurement_circuit(&z).unwrap();
    let mode = EstimationMode::Sampling { shots: 500 };

    let draws = |seed| {
        let engine = StatevectorEngine::seeded(seed);
        let state = engine.apply(&Statevector::zero(1), &prep).unwrap();
        (0..4)
            .map(|_| estimate_expectation(&engine, &state, &z, &z_circuit, mode).unwrap())
            .collect::<Vec<_>>()
    };
    let a = draws(17);
    assert_eq!(a, draws(17));
    assert!(a.iter().all(|v| v.abs() < 0.25), "{a:?}");

    // X on |+⟩ is deterministic even when sampled.
    let engine = StatevectorEngine::seeded(17);
    let state = engine.apply(&Statevector::zero(1), &prep).unwrap();
    let value = estimate_expectation(&engine, &state, &x, &x_circuit, mode).unwrap();
    assert!((value - 1.0).abs() < 1e-12);
}

#[test]
fn test_composed_term_expectation_matches_prepared_state() {
    let d = Decomposition::parse_terms([
        ("II", 0.1),
        ("XY", 0.2),
        ("YX", -0.3),
        ("ZX", 0.4),
        ("YY", 0.5),
    ])
    .unwrap();
    let engine = StatevectorEngine::seeded(4);
    let estimator =
        EnergyEstimator::new(engine, d.clone(), Statevector::zero(2), EstimatorConfig::default())
            .unwrap();

    let mut ansatz = Circuit::with_size("entangled", 2);
    ansatz
        .ry(0.7, QubitId(0))
        .unwrap()
        .rx(-0.4, QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .rz(1.3, QubitId(1))
        .unwrap();
    let state = estimator
        .engine()
        .apply(estimator.initial_state(), &ansatz)
        .unwrap();

    for l in d.labels() {
        let circuit = estimator.plan().get(l).unwrap();
        let direct =
            estimate_expectation(estimator.engine(), &state, l, circuit, EstimationMode::Analytical)
                .unwrap();
        let composed = estimator.term_expectation(&ansatz, l).unwrap();
        assert!((direct - composed).abs() < 1e-12, "{l}: {direct} vs {composed}");
    }
}

#[test]
fn test_sampling_converges() {
    let d = decompose(&scenario_matrix()).unwrap();
    let plan = MeasurementPlan::for_decomposition(&d, 2).unwrap();
    let engine = StatevectorEngine::seeded(2024);

    let mut ansatz = Circuit::with_size("tilted", 2);
    ansatz.ry(1.1, QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap().ry(0.4, QubitId(1)).unwrap();
    let initial = Statevector::zero(2);

    let exact = estimate_energy(&engine, &d, &plan, &initial, &ansatz, EstimationMode::Analytical)
        .unwrap();

    let mean_error = |shots: u32| {
        let trials: u32 = 20;
        let total: f64 = (0..trials)
            .map(|_| {
                let e = estimate_energy(
                    &engine,
                    &d,
                    &plan,
                    &initial,
                    &ansatz,
                    EstimationMode::Sampling { shots },
                )
                .unwrap();
                (e - exact).abs()
            })
            .sum();
        total / f64::from(trials)
    };

    let coarse = mean_error(10);
    let fine = mean_error(10_000);
    assert!(fine < coarse, "fine {fine} >= coarse {coarse}");
    assert!(fine < 0.05, "fine error {fine}");
}

#[test]
fn test_arity_limit_through_estimator() {
    let d = Decomposition::parse_terms([("XYZ", 1.0)]).unwrap();
    let err = EnergyEstimator::new(
        StatevectorEngine::seeded(0),
        d,
        Statevector::zero(3),
        EstimatorConfig {
            max_measurement_qubits: 2,
            ..EstimatorConfig::default()
        },
    )
    .err()
    .unwrap();
    assert!(matches!(err, EnergyError::UnsupportedArity { .. }));
}

/// Random layer of single-qubit rotations followed by a CX chain.
fn arb_ansatz(n: u32) -> impl Strategy<Value = Circuit> {
    prop::collection::vec(-3.2_f64..3.2, (2 * n) as usize).prop_map(move |angles| {
        let mut c = Circuit::with_size("random", n);
        for q in 0..n {
            c.ry(angles[(2 * q) as usize], QubitId(q)).unwrap();
            c.rz(angles[(2 * q + 1) as usize], QubitId(q)).unwrap();
        }
        for q in 1..n {
            c.cx(QubitId(q - 1), QubitId(q)).unwrap();
        }
        c
    })
}

fn arb_real_decomposition(n: usize) -> impl Strategy<Value = Decomposition> {
    let count = 4usize.pow(n as u32);
    prop::collection::vec(-2.0_f64..2.0, count).prop_map(move |coeffs| {
        Decomposition::from_terms(PauliLabel::all(n).unwrap().zip(coeffs)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn analytical_energy_matches_matrix_expectation(
        (d, ansatz) in (2_u32..=3).prop_flat_map(|n| (arb_real_decomposition(n as usize), arb_ansatz(n)))
    ) {
        let engine = StatevectorEngine::seeded(0);
        let n = d.num_qubits();
        let plan = MeasurementPlan::complete(n, n).unwrap();
        let initial = Statevector::zero(n);

        let energy = estimate_energy(&engine, &d, &plan, &initial, &ansatz, EstimationMode::Analytical).unwrap();
        let state = engine.apply(&initial, &ansatz).unwrap();
        let expected = exact_expectation(&state, &compose(&d));
        prop_assert!((energy - expected).abs() < 1e-9, "{energy} vs {expected}");
    }
}
