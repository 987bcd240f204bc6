//! The coefficient mapping produced by a Pauli decomposition.

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{PauliError, PauliResult};
use crate::label::PauliLabel;

/// Mapping from basis label to coefficient for an operator on
/// `num_qubits` qubits:
///
///   H = Σ_label  coefficient · B(label)
///
/// Every label has length `num_qubits`; insertion enforces it. Terms are
/// kept in label order so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DecompositionRepr")]
pub struct Decomposition {
    num_qubits: usize,
    terms: BTreeMap<PauliLabel, Complex64>,
}

#[derive(Deserialize)]
struct DecompositionRepr {
    num_qubits: usize,
    terms: BTreeMap<PauliLabel, Complex64>,
}

impl TryFrom<DecompositionRepr> for Decomposition {
    type Error = PauliError;

    fn try_from(repr: DecompositionRepr) -> PauliResult<Self> {
        let mut d = Decomposition::new(repr.num_qubits);
        for (label, coeff) in repr.terms {
            d.insert(label, coeff)?;
        }
        Ok(d)
    }
}

impl Decomposition {
    /// An empty decomposition (the zero operator) on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: BTreeMap::new(),
        }
    }

    /// Build a decomposition from `(label, coefficient)` pairs.
    ///
    /// The width is taken from the first label. Repeated labels are summed.
    /// Fails with [`PauliError::Dimension`] on an empty input or on labels of
    /// differing lengths.
    pub fn from_terms<C>(terms: impl IntoIterator<Item = (PauliLabel, C)>) -> PauliResult<Self>
    where
        C: Into<Complex64>,
    {
        let mut iter = terms.into_iter().peekable();
        let num_qubits = iter
            .peek()
            .map(|(label, _)| label.num_qubits())
            .ok_or_else(|| {
                PauliError::Dimension("cannot infer qubit count of an empty term list".into())
            })?;
        let mut d = Decomposition::new(num_qubits);
        for (label, coeff) in iter {
            d.check_width(&label)?;
            *d.terms.entry(label).or_default() += coeff.into();
        }
        Ok(d)
    }

    /// Like [`Decomposition::from_terms`], parsing string labels.
    ///
    /// ```rust
    /// use vqe_pauli::Decomposition;
    ///
    /// let d = Decomposition::parse_terms([("II", 0.5), ("ZZ", 0.5)]).unwrap();
    /// assert_eq!(d.num_qubits(), 2);
    /// ```
    pub fn parse_terms<S, C>(terms: impl IntoIterator<Item = (S, C)>) -> PauliResult<Self>
    where
        S: AsRef<str>,
        C: Into<Complex64>,
    {
        let parsed = terms
            .into_iter()
            .map(|(s, c)| Ok((s.as_ref().parse::<PauliLabel>()?, c.into())))
            .collect::<PauliResult<Vec<(PauliLabel, Complex64)>>>()?;
        Self::from_terms(parsed)
    }

    /// Set the coefficient of `label`, returning the previous one.
    pub fn insert(
        &mut self,
        label: PauliLabel,
        coefficient: impl Into<Complex64>,
    ) -> PauliResult<Option<Complex64>> {
        self.check_width(&label)?;
        Ok(self.terms.insert(label, coefficient.into()))
    }

    /// Coefficient of `label`, if present.
    pub fn get(&self, label: &PauliLabel) -> Option<Complex64> {
        self.terms.get(label).copied()
    }

    /// Coefficient of the label spelled `label`, if it parses and is present.
    pub fn coefficient(&self, label: &str) -> Option<Complex64> {
        label.parse::<PauliLabel>().ok().and_then(|l| self.get(&l))
    }

    /// True if `label` has a term.
    pub fn contains(&self, label: &PauliLabel) -> bool {
        self.terms.contains_key(label)
    }

    /// Iterate over `(label, coefficient)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliLabel, Complex64)> + '_ {
        self.terms.iter().map(|(l, c)| (l, *c))
    }

    /// Labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &PauliLabel> + '_ {
        self.terms.keys()
    }

    /// Number of qubits every label acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Drop every term with `|coefficient| < tolerance`.
    #[must_use]
    pub fn pruned(mut self, tolerance: f64) -> Self {
        self.terms.retain(|_, c| c.norm() >= tolerance);
        self
    }

    /// Compare coefficient-wise; a label missing on one side counts as zero.
    pub fn approx_eq(&self, other: &Decomposition, tolerance: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let zero = Complex64::new(0.0, 0.0);
        self.terms
            .keys()
            .chain(other.terms.keys())
            .all(|label| {
                let a = self.get(label).unwrap_or(zero);
                let b = other.get(label).unwrap_or(zero);
                (a - b).norm() <= tolerance
            })
    }

    /// Real parts of every coefficient.
    ///
    /// Fails with [`PauliError::ComplexCoefficient`] if any imaginary part
    /// exceeds `tolerance`; nothing is truncated silently.
    pub fn real_terms(&self, tolerance: f64) -> PauliResult<Vec<(PauliLabel, f64)>> {
        self.terms
            .iter()
            .map(|(label, c)| {
                if c.im.abs() > tolerance {
                    Err(PauliError::ComplexCoefficient {
                        label: label.to_string(),
                        imag: c.im,
                        tolerance,
                    })
                } else {
                    Ok((label.clone(), c.re))
                }
            })
            .collect()
    }

    /// Σ |coefficient|, an upper bound on the operator's spectral norm.
    pub fn one_norm(&self) -> f64 {
        self.terms.values().map(|c| c.norm()).sum()
    }

    fn check_width(&self, label: &PauliLabel) -> PauliResult<()> {
        if label.num_qubits() != self.num_qubits {
            return Err(PauliError::Dimension(format!(
                "label {label} acts on {} qubits, decomposition has {}",
                label.num_qubits(),
                self.num_qubits
            )));
        }
        Ok(())
    }
}
