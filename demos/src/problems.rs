//! Example Hamiltonians with exact reference energies.
//!
//! Problems are given as dense matrices; the runner decomposes them into
//! Pauli terms. [`exact_ground_energy`] provides the reference value a VQE
//! run is judged against.

use ndarray::linalg::kron;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::Serialize;
use tracing::debug;

use vqe_pauli::{PauliOp, generator, is_hermitian, num_qubits_of};

use crate::error::{DemoError, DemoResult};

/// Tolerance for the Hermiticity check of reference problems.
const HERMITIAN_TOLERANCE: f64 = 1e-9;

/// Built-in demo problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// Two-qubit exchange operator with ground energy -1.
    Scenario,
    /// Two-qubit reduced H₂ Hamiltonian at equilibrium bond length.
    H2,
}

impl Problem {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Problem::Scenario => "Exchange operator",
            Problem::H2 => "H₂ (Hydrogen, reduced)",
        }
    }

    /// Dense Hamiltonian matrix.
    pub fn hamiltonian(self) -> Array2<Complex64> {
        match self {
            Problem::Scenario => scenario_hamiltonian(),
            Problem::H2 => h2_hamiltonian(),
        }
    }
}

/// `[[1,0,0,0],[0,0,-1,0],[0,-1,0,0],[0,0,0,1]]`.
///
/// Decomposes to `0.5·II - 0.5·XX - 0.5·YY + 0.5·ZZ`. The ground state is
/// `(|01⟩ + |10⟩)/√2` with energy -1.
pub fn scenario_hamiltonian() -> Array2<Complex64> {
    let one = Complex64::new(1.0, 0.0);
    let mut h = Array2::zeros((4, 4));
    h[[0, 0]] = one;
    h[[1, 2]] = -one;
    h[[2, 1]] = -one;
    h[[3, 3]] = one;
    h
}

/// Reduced two-qubit H₂ Hamiltonian (STO-3G, 0.735 Å), electronic part.
///
/// `H = g0·II + g1·ZI + g2·IZ + g3·ZZ + g4·XX` after parity mapping and
/// two-qubit reduction. Ground energy ≈ -1.8573 Hartree.
pub fn h2_hamiltonian() -> Array2<Complex64> {
    use PauliOp::{I, X, Z};
    const TERMS: [(PauliOp, PauliOp, f64); 5] = [
        (I, I, -1.052_373_245_772_859),
        (Z, I, -0.397_937_424_843_180_4),
        (I, Z, 0.397_937_424_843_180_4),
        (Z, Z, -0.011_280_104_256_235_324),
        (X, X, 0.180_931_199_784_231_7),
    ];
    TERMS
        .iter()
        .fold(Array2::zeros((4, 4)), |mut h, &(a, b, c)| {
            h.scaled_add(Complex64::new(c, 0.0), &kron(&generator(a), &generator(b)));
            h
        })
}

/// Lowest eigenvalue of a Hermitian matrix by shifted power iteration.
///
/// Iterates with `s·I - H`, where `s` bounds the spectral radius by the
/// largest absolute row sum, so the dominant eigenvector of the shifted
/// matrix is the ground state of `H`. Returns the Rayleigh quotient once it
/// changes by less than `1e-13` or after `max_iterations`.
pub fn exact_ground_energy(hamiltonian: &Array2<Complex64>, max_iterations: usize) -> DemoResult<f64> {
    let n = num_qubits_of(hamiltonian)?;
    if !is_hermitian(hamiltonian, HERMITIAN_TOLERANCE) {
        return Err(DemoError::NotHermitian {
            tolerance: HERMITIAN_TOLERANCE,
        });
    }

    let dim = hamiltonian.nrows();
    let shift = hamiltonian
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|c| c.norm()).sum::<f64>())
        .fold(0.0, f64::max);
    let shifted = Array2::from_diag_elem(dim, Complex64::new(shift, 0.0)) - hamiltonian;

    // Non-uniform start so no eigenvector is orthogonal by symmetry.
    let mut v: Array1<Complex64> = (0..dim)
        .map(|i| Complex64::new(1.0 + i as f64 / dim as f64, 0.1 * i as f64))
        .collect();
    normalize(&mut v);

    let mut energy = rayleigh(hamiltonian, &v);
    let mut iterations = 0;
    while iterations < max_iterations {
        iterations += 1;
        v = shifted.dot(&v);
        if normalize(&mut v) == 0.0 {
            // Every eigenvalue equals the shift.
            break;
        }
        let next = rayleigh(hamiltonian, &v);
        let delta = (next - energy).abs();
        energy = next;
        if delta < 1e-13 {
            break;
        }
    }

    debug!(n_qubits = n, iterations, energy, "exact ground energy");
    Ok(energy)
}

fn normalize(v: &mut Array1<Complex64>) -> f64 {
    let norm = v.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.mapv_inplace(|c| c / norm);
    }
    norm
}

/// `Re(v† H v)` for a normalized `v`.
fn rayleigh(h: &Array2<Complex64>, v: &Array1<Complex64>) -> f64 {
    let hv = h.dot(v);
    v.iter().zip(hv.iter()).map(|(a, b)| (a.conj() * b).re).sum()
}
