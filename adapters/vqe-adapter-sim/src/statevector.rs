//! Dense statevector.
//!
//! Amplitude index `k` of an `n`-qubit state stores qubit `q` in bit
//! `n - 1 - q`, so qubit 0 is the most significant bit. This matches the
//! Kronecker order of Pauli basis matrices.

use std::f64::consts::PI;

use num_complex::Complex64;
use rand::Rng;

use vqe_energy::{EngineError, EngineResult};
use vqe_ir::{Instruction, IrError, StandardGate};

/// Norm deviation accepted by [`Statevector::from_amplitudes`].
const NORM_TOLERANCE: f64 = 1e-9;

/// A pure quantum state as `2^n` complex amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// The state `|0...0⟩`.
    pub fn zero(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// The computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> EngineResult<Self> {
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(EngineError::InvalidState(format!(
                "basis index {index} out of range for {num_qubits} qubits"
            )));
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap explicit amplitudes.
    ///
    /// The length must be `2^n` with `n ≥ 1` and the vector must have unit
    /// norm.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> EngineResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(EngineError::InvalidState(format!(
                "amplitude count {len} is not 2^n for any n >= 1"
            )));
        }
        let norm_sqr: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(EngineError::InvalidState(format!(
                "state is not normalized (norm² = {norm_sqr})"
            )));
        }
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes in index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// `|amplitude|²` for every outcome.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Squared norm; 1 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// `⟨self|other⟩`.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Operands are checked against the gate arity and the state width before
    /// any amplitude is touched.
    pub fn apply(&mut self, instruction: &Instruction) -> EngineResult<()> {
        let qubits = self.operands(instruction)?;
        match instruction.gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_phase(qubits[0], PI),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::SX => self.apply_rx(qubits[0], PI / 2.0),
            StandardGate::SXdg => self.apply_rx(qubits[0], -PI / 2.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], theta),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], theta),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], theta),
            StandardGate::P(theta) => self.apply_phase(qubits[0], theta),
            StandardGate::U(theta, phi, lambda) => self.apply_u(qubits[0], theta, phi, lambda),

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cp(qubits[0], qubits[1], PI),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CRz(theta) => self.apply_crz(qubits[0], qubits[1], theta),
            StandardGate::CP(theta) => self.apply_cp(qubits[0], qubits[1], theta),
        }
        Ok(())
    }

    fn operands(&self, instruction: &Instruction) -> EngineResult<Vec<usize>> {
        let gate_name = instruction.name();
        let expected = instruction.gate.num_qubits();
        if instruction.qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected,
                got: instruction.qubits.len() as u32,
            }
            .into());
        }

        let mut qubits = Vec::with_capacity(instruction.qubits.len());
        for &qubit in &instruction.qubits {
            if qubit.index() >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                }
                .into());
            }
            if qubits.contains(&qubit.index()) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                }
                .into());
            }
            qubits.push(qubit.index());
        }
        Ok(qubits)
    }

    /// Draw one outcome index.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let cumulative = self.cumulative();
        sample_cumulative(&cumulative, rng)
    }

    /// Running sum of outcome probabilities.
    pub(crate) fn cumulative(&self) -> Vec<f64> {
        self.amplitudes
            .iter()
            .scan(0.0, |acc, amp| {
                *acc += amp.norm_sqr();
                Some(*acc)
            })
            .collect()
    }

    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    /// Apply a 2×2 unitary `[[a, b], [c, d]]` to `qubit`.
    fn apply_single(&mut self, qubit: usize, m: [[Complex64; 2]; 2]) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let zero = Complex64::new(0.0, 0.0);
        let i_val = Complex64::new(0.0, 1.0);
        self.apply_single(qubit, [[zero, -i_val], [i_val, zero]]);
    }

    fn apply_h(&mut self, qubit: usize) {
        let s = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        self.apply_single(qubit, [[s, s], [s, -s]]);
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.apply_single(qubit, [[c, neg_i_s], [neg_i_s, c]]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        self.apply_single(qubit, [[c, -s], [s, c]]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);
        self.apply_single(
            qubit,
            [
                [Complex64::new(c, 0.0), -e_il * s],
                [e_ip * s, e_ipl * c],
            ],
        );
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & ctrl_mask != 0 {
                *amp *= if i & tgt_mask == 0 { phase_0 } else { phase_1 };
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                *amp *= phase;
            }
        }
    }
}

/// Inverse-CDF draw over a cumulative distribution.
pub(crate) fn sample_cumulative<R: Rng>(cumulative: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.r#gen::<f64>() * cumulative.last().copied().unwrap_or(1.0);
    cumulative
        .partition_point(|&c| c <= r)
        .min(cumulative.len().saturating_sub(1))
}
