//! Tensor-product Pauli basis and the Hilbert–Schmidt inner product.
//!
//! The basis matrix of a label is the Kronecker product of the 2×2
//! generators in label order:
//!
//!   B("XZ") = σ_X ⊗ σ_Z
//!
//! so the leftmost symbol selects the most significant bit of the row and
//! column index. The `4^n` basis matrices are orthonormal under
//!
//!   ⟨A, B⟩ = Tr(A† B) / 2^n

use std::sync::{Arc, Mutex};

use ndarray::linalg::kron;
use ndarray::{Array2, array};
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::error::{PauliError, PauliResult};
use crate::label::{PauliLabel, PauliOp};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I_UNIT: Complex64 = Complex64::new(0.0, 1.0);

/// The 2×2 matrix of a single Pauli operator.
pub fn generator(op: PauliOp) -> Array2<Complex64> {
    match op {
        PauliOp::I => array![[ONE, ZERO], [ZERO, ONE]],
        PauliOp::X => array![[ZERO, ONE], [ONE, ZERO]],
        PauliOp::Y => array![[ZERO, -I_UNIT], [I_UNIT, ZERO]],
        PauliOp::Z => array![[ONE, ZERO], [ZERO, -ONE]],
    }
}

/// The `2^n × 2^n` basis matrix named by `label`.
pub fn basis_matrix(label: &PauliLabel) -> Array2<Complex64> {
    label
        .ops()
        .iter()
        .fold(Array2::eye(1), |acc, &op| kron(&acc, &generator(op)))
}

/// Number of qubits `n` of a `2^n × 2^n` matrix.
///
/// Fails with [`PauliError::Dimension`] for non-square matrices, sides that
/// are not a power of two, and the trivial 1×1 case.
pub fn num_qubits_of(matrix: &Array2<Complex64>) -> PauliResult<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(PauliError::Dimension(format!(
            "expected a square matrix, got {rows}x{cols}"
        )));
    }
    if rows < 2 || !rows.is_power_of_two() {
        return Err(PauliError::Dimension(format!(
            "matrix side {rows} is not 2^n for any n >= 1"
        )));
    }
    Ok(rows.trailing_zeros() as usize)
}

/// Normalized Hilbert–Schmidt inner product `Tr(a† b) / 2^n`.
pub fn inner_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> PauliResult<Complex64> {
    let n = num_qubits_of(a)?;
    if a.dim() != b.dim() {
        return Err(PauliError::Dimension(format!(
            "inner product of {:?} and {:?} matrices",
            a.dim(),
            b.dim()
        )));
    }
    let trace: Complex64 = a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum();
    Ok(trace / (1usize << n) as f64)
}

/// True if `matrix` is square and equal to its conjugate transpose within
/// `tolerance`, element by element.
pub fn is_hermitian(matrix: &Array2<Complex64>, tolerance: f64) -> bool {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return false;
    }
    (0..rows).all(|i| (i..cols).all(|j| (matrix[[i, j]] - matrix[[j, i]].conj()).norm() <= tolerance))
}

/// Memoized basis matrices keyed by label.
///
/// Basis matrices are pure functions of their label; caching them keeps
/// repeated decompositions and compositions of the same width cheap.
#[derive(Debug, Default)]
pub struct BasisCache {
    matrices: Mutex<FxHashMap<PauliLabel, Arc<Array2<Complex64>>>>,
}

impl BasisCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The basis matrix for `label`, computed on first use.
    pub fn get(&self, label: &PauliLabel) -> Arc<Array2<Complex64>> {
        if let Some(m) = self.lock().get(label) {
            return Arc::clone(m);
        }
        let matrix = Arc::new(basis_matrix(label));
        self.lock()
            .entry(label.clone())
            .or_insert(matrix)
            .clone()
    }

    /// Number of cached matrices.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached matrix.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<PauliLabel, Arc<Array2<Complex64>>>> {
        self.matrices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
