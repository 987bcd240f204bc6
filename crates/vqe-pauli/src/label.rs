//! Pauli operators and basis labels.
//!
//! A basis label is a string over `{I, X, Y, Z}` naming one tensor-product
//! basis matrix, e.g. `"XY"` for `σ_X ⊗ σ_Y`. The leftmost symbol acts on
//! qubit 0, which is the most significant tensor factor.
//!
//! ```rust
//! use vqe_pauli::{PauliLabel, PauliOp};
//!
//! let label: PauliLabel = "XIZ".parse().unwrap();
//! assert_eq!(label.num_qubits(), 3);
//! assert_eq!(label.ops()[2], PauliOp::Z);
//! assert_eq!(label.to_string(), "XIZ");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PauliError, PauliResult};

/// Single-qubit Pauli operator.
///
/// The derived ordering `I < X < Y < Z` is the enumeration order of the
/// basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// All four operators in enumeration order.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Parse a single symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    /// The symbol for this operator.
    pub fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An ordered tensor product of Pauli operators, one per qubit.
///
/// Unlike a sparse Pauli string, identities are kept: the label length is
/// the qubit count of the operator it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PauliLabel {
    ops: Vec<PauliOp>,
}

impl PauliLabel {
    /// Construct a label from its operators.
    ///
    /// Fails with [`PauliError::Dimension`] if `ops` is empty.
    pub fn new(ops: Vec<PauliOp>) -> PauliResult<Self> {
        if ops.is_empty() {
            return Err(PauliError::Dimension(
                "a Pauli label needs at least one qubit".into(),
            ));
        }
        Ok(Self { ops })
    }

    /// The all-identity label on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> PauliResult<Self> {
        Self::new(vec![PauliOp::I; num_qubits])
    }

    /// Iterate over all `4^n` labels on `num_qubits` qubits in enumeration
    /// order (`II.., IX.., ..., ZZ..`).
    ///
    /// Fails for zero qubits and when `4^n` does not fit in a `usize`.
    pub fn all(num_qubits: usize) -> PauliResult<impl Iterator<Item = PauliLabel>> {
        if num_qubits == 0 {
            return Err(PauliError::Dimension(
                "a Pauli label needs at least one qubit".into(),
            ));
        }
        let count = u32::try_from(num_qubits)
            .ok()
            .and_then(|n| 4usize.checked_pow(n))
            .ok_or_else(|| {
                PauliError::Dimension(format!(
                    "cannot enumerate 4^{num_qubits} Pauli labels"
                ))
            })?;
        Ok((0..count).map(move |mut index| {
            let mut ops = vec![PauliOp::I; num_qubits];
            for slot in ops.iter_mut().rev() {
                *slot = PauliOp::ALL[index % 4];
                index /= 4;
            }
            PauliLabel { ops }
        }))
    }

    /// The operators, qubit 0 first.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Number of qubits the label acts on.
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// True if every operator is the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| *op == PauliOp::I)
    }

    /// Non-identity `(qubit, op)` pairs in qubit order.
    pub fn support(&self) -> impl Iterator<Item = (usize, PauliOp)> + '_ {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op != PauliOp::I)
            .map(|(q, op)| (q, *op))
    }

    /// Number of non-identity operators.
    pub fn weight(&self) -> usize {
        self.support().count()
    }
}

impl FromStr for PauliLabel {
    type Err = PauliError;

    fn from_str(s: &str) -> PauliResult<Self> {
        let ops = s
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                PauliOp::from_char(symbol).ok_or_else(|| PauliError::InvalidLabel {
                    label: s.to_string(),
                    symbol,
                    position,
                })
            })
            .collect::<PauliResult<Vec<_>>>()?;
        Self::new(ops)
    }
}

impl TryFrom<String> for PauliLabel {
    type Error = PauliError;

    fn try_from(s: String) -> PauliResult<Self> {
        s.parse()
    }
}

impl From<PauliLabel> for String {
    fn from(label: PauliLabel) -> Self {
        label.to_string()
    }
}

impl fmt::Display for PauliLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let label: PauliLabel = "IXYZ".parse().unwrap();
        assert_eq!(
            label.ops(),
            &[PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z]
        );
        assert_eq!(label.to_string(), "IXYZ");
    }

    #[test]
    fn test_invalid_symbol() {
        let err = "XQ".parse::<PauliLabel>().unwrap_err();
        match err {
            PauliError::InvalidLabel {
                symbol, position, ..
            } => {
                assert_eq!(symbol, 'Q');
                assert_eq!(position, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lowercase_is_invalid() {
        assert!(matches!(
            "x".parse::<PauliLabel>(),
            Err(PauliError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn test_empty_label() {
        assert!(matches!(
            "".parse::<PauliLabel>(),
            Err(PauliError::Dimension(_))
        ));
    }

    #[test]
    fn test_all_labels() {
        let labels: Vec<String> = PauliLabel::all(1).unwrap().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["I", "X", "Y", "Z"]);

        let two: Vec<String> = PauliLabel::all(2).unwrap().map(|l| l.to_string()).collect();
        assert_eq!(two.len(), 16);
        assert_eq!(two[0], "II");
        assert_eq!(two[1], "IX");
        assert_eq!(two[4], "XI");
        assert_eq!(two[15], "ZZ");

        assert_eq!(PauliLabel::all(3).unwrap().count(), 64);
    }

    #[test]
    fn test_all_labels_rejects_unenumerable_widths() {
        assert!(matches!(PauliLabel::all(0), Err(PauliError::Dimension(_))));
        assert!(matches!(PauliLabel::all(32), Err(PauliError::Dimension(_))));
        assert!(matches!(PauliLabel::all(usize::MAX), Err(PauliError::Dimension(_))));
    }

    #[test]
    fn test_identity_and_support() {
        let id = PauliLabel::identity(3).unwrap();
        assert!(id.is_identity());
        assert_eq!(id.weight(), 0);

        let label: PauliLabel = "ZIX".parse().unwrap();
        assert!(!label.is_identity());
        let support: Vec<_> = label.support().collect();
        assert_eq!(support, vec![(0, PauliOp::Z), (2, PauliOp::X)]);
    }

    #[test]
    fn test_ordering_follows_enumeration() {
        let mut labels: Vec<PauliLabel> = ["ZZ", "IX", "XI", "II"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        labels.sort();
        let sorted: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, vec!["II", "IX", "XI", "ZZ"]);
    }
}
