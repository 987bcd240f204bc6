//! Forward and inverse Pauli transforms.
//!
//! [`Decomposer::decompose`] projects a matrix onto every basis label with
//! the normalized Hilbert–Schmidt inner product; [`compose`] sums
//! coefficient-weighted basis matrices back together.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::basis::{BasisCache, inner_product, num_qubits_of};
use crate::decomposition::Decomposition;
use crate::error::{PauliError, PauliResult};
use crate::label::PauliLabel;

/// Coefficients with magnitude below this are treated as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Decomposition engine with a shared basis-matrix cache.
///
/// A `Decomposer` is `Sync`; one instance can serve several threads and
/// reuses basis matrices across calls of the same width.
#[derive(Debug)]
pub struct Decomposer {
    tolerance: f64,
    cache: BasisCache,
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer {
    /// Create a decomposer with [`DEFAULT_TOLERANCE`].
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            cache: BasisCache::new(),
        }
    }

    /// Create a decomposer that drops coefficients below `tolerance`.
    ///
    /// Fails with [`PauliError::InvalidTolerance`] unless `tolerance` is
    /// positive and finite.
    pub fn with_tolerance(tolerance: f64) -> PauliResult<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(PauliError::InvalidTolerance(tolerance));
        }
        Ok(Self {
            tolerance,
            cache: BasisCache::new(),
        })
    }

    /// The zero threshold.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The basis cache backing this decomposer.
    pub fn cache(&self) -> &BasisCache {
        &self.cache
    }

    /// Decompose `matrix` into the tensor-product Pauli basis.
    ///
    /// Every label of the `4^n` basis is visited; labels whose coefficient
    /// has magnitude below the tolerance are omitted. Any square `2^n × 2^n`
    /// matrix is accepted; Hermitian input yields real coefficients.
    pub fn decompose(&self, matrix: &Array2<Complex64>) -> PauliResult<Decomposition> {
        let n = num_qubits_of(matrix)?;
        let mut decomposition = Decomposition::new(n);
        let mut dropped = 0usize;

        for label in PauliLabel::all(n)? {
            let basis = self.cache.get(&label);
            let coefficient = inner_product(&basis, matrix)?;
            if coefficient.norm() < self.tolerance {
                dropped += 1;
                continue;
            }
            trace!(%label, re = coefficient.re, im = coefficient.im, "kept term");
            decomposition.insert(label, coefficient)?;
        }

        debug!(
            n_qubits = n,
            n_terms = decomposition.len(),
            dropped,
            tolerance = self.tolerance,
            "decomposed matrix"
        );
        Ok(decomposition)
    }

    /// Rebuild the matrix `Σ coefficient · B(label)` from `decomposition`.
    pub fn compose(&self, decomposition: &Decomposition) -> Array2<Complex64> {
        let dim = 1usize << decomposition.num_qubits();
        let mut matrix = Array2::zeros((dim, dim));
        for (label, coefficient) in decomposition.iter() {
            matrix.scaled_add(coefficient, self.cache.get(label).as_ref());
        }
        matrix
    }
}

/// Decompose `matrix` with a fresh [`Decomposer`] at the default tolerance.
pub fn decompose(matrix: &Array2<Complex64>) -> PauliResult<Decomposition> {
    Decomposer::new().decompose(matrix)
}

/// Compose a decomposition back into a matrix.
///
/// An empty decomposition composes to the zero matrix of its width.
pub fn compose(decomposition: &Decomposition) -> Array2<Complex64> {
    Decomposer::new().compose(decomposition)
}

/// Compose a raw `(label, coefficient)` list.
///
/// Fails with [`PauliError::Dimension`] if the list is empty or the labels
/// disagree on length.
pub fn compose_terms<C>(terms: impl IntoIterator<Item = (PauliLabel, C)>) -> PauliResult<Array2<Complex64>>
where
    C: Into<Complex64>,
{
    let decomposition = Decomposition::from_terms(terms).map_err(|e| match e {
        PauliError::Dimension(msg) => PauliError::Dimension(format!("compose: {msg}")),
        other => other,
    })?;
    Ok(compose(&decomposition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn label(s: &str) -> PauliLabel {
        s.parse().unwrap()
    }

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_decompose_single_qubit() {
        let h = array![[c(5.0, 0.0), c(2.0, -3.0)], [c(2.0, 3.0), c(-3.0, 0.0)]];
        let d = decompose(&h).unwrap();
        assert_eq!(d.len(), 4);
        assert!(approx_eq(d.coefficient("I").unwrap(), c(1.0, 0.0)));
        assert!(approx_eq(d.coefficient("X").unwrap(), c(2.0, 0.0)));
        assert!(approx_eq(d.coefficient("Y").unwrap(), c(3.0, 0.0)));
        assert!(approx_eq(d.coefficient("Z").unwrap(), c(4.0, 0.0)));
    }

    #[test]
    fn test_decompose_drops_zero_terms() {
        let h = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]];
        let d = decompose(&h).unwrap();
        let labels: Vec<String> = d.labels().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Z"]);
    }

    #[test]
    fn test_decompose_non_hermitian() {
        // |0⟩⟨1| = (X + iY) / 2
        let m = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        let d = decompose(&m).unwrap();
        assert!(approx_eq(d.coefficient("X").unwrap(), c(0.5, 0.0)));
        assert!(approx_eq(d.coefficient("Y").unwrap(), c(0.0, 0.5)));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_decompose_rejects_bad_shapes() {
        let three: Array2<Complex64> = Array2::zeros((3, 3));
        assert!(matches!(decompose(&three), Err(PauliError::Dimension(_))));

        let rect: Array2<Complex64> = Array2::zeros((2, 4));
        assert!(matches!(decompose(&rect), Err(PauliError::Dimension(_))));
    }

    #[test]
    fn test_compose_example() {
        let d = Decomposition::parse_terms([("I", 1.0), ("X", 2.0), ("Y", 3.0), ("Z", 4.0)])
            .unwrap();
        let m = compose(&d);
        assert!(approx_eq(m[[0, 0]], c(5.0, 0.0)));
        assert!(approx_eq(m[[0, 1]], c(2.0, -3.0)));
        assert!(approx_eq(m[[1, 0]], c(2.0, 3.0)));
        assert!(approx_eq(m[[1, 1]], c(-3.0, 0.0)));
    }

    #[test]
    fn test_compose_empty_is_zero() {
        let m = compose(&Decomposition::new(2));
        assert_eq!(m.dim(), (4, 4));
        assert!(m.iter().all(|x| x.norm() == 0.0));
    }

    #[test]
    fn test_compose_terms_inconsistent_lengths() {
        let terms = vec![(label("XX"), 1.0), (label("X"), 1.0)];
        assert!(matches!(
            compose_terms(terms),
            Err(PauliError::Dimension(_))
        ));

        let empty: Vec<(PauliLabel, f64)> = Vec::new();
        assert!(matches!(
            compose_terms(empty),
            Err(PauliError::Dimension(_))
        ));
    }

    #[test]
    fn test_custom_tolerance_and_cache() {
        let h = array![[c(1.0, 0.0), c(1e-6, 0.0)], [c(1e-6, 0.0), c(1.0, 0.0)]];
        let coarse = Decomposer::with_tolerance(1e-3).unwrap();
        assert_eq!(coarse.decompose(&h).unwrap().len(), 1);
        assert_eq!(coarse.cache().len(), 4);

        let fine = Decomposer::new();
        assert_eq!(fine.tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(fine.decompose(&h).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_invalid_tolerance() {
        for bad in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(Decomposer::with_tolerance(bad), Err(PauliError::InvalidTolerance(_))),
                "{bad}"
            );
        }
    }
}
