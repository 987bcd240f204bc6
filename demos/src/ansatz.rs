//! Parameterized ansatz circuits.
//!
//! Each builder maps a flat parameter vector to a circuit. The optimizer
//! only ever sees the vector; [`num_parameters`] tells it how long to make it.

use vqe_ir::{Circuit, IrError, IrResult, QubitId};

/// Ansatz families offered by the demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsatzKind {
    /// One Ry rotation per qubit.
    Ry,
    /// Ry layers interleaved with a linear CZ chain.
    TwoLocal {
        /// Number of entangling repetitions.
        reps: usize,
    },
}

impl AnsatzKind {
    /// Build the circuit for `params`.
    pub fn build(self, num_qubits: usize, params: &[f64]) -> IrResult<Circuit> {
        match self {
            AnsatzKind::Ry => ry_ansatz(num_qubits, params),
            AnsatzKind::TwoLocal { reps } => two_local_ansatz(num_qubits, reps, params),
        }
    }

    /// Length of the parameter vector `build` expects.
    pub fn num_parameters(self, num_qubits: usize) -> usize {
        match self {
            AnsatzKind::Ry => num_qubits,
            AnsatzKind::TwoLocal { reps } => num_qubits * (reps + 1),
        }
    }
}

/// Number of parameters of a two-local ansatz.
pub fn num_parameters(num_qubits: usize, reps: usize) -> usize {
    AnsatzKind::TwoLocal { reps }.num_parameters(num_qubits)
}

fn check_parameters(circuit: &str, expected: usize, params: &[f64]) -> IrResult<()> {
    if params.len() != expected {
        return Err(IrError::ParameterCount {
            circuit: circuit.to_string(),
            expected,
            got: params.len(),
        });
    }
    Ok(())
}

fn width(num_qubits: usize) -> u32 {
    u32::try_from(num_qubits).unwrap_or(u32::MAX)
}

/// Generate a TwoLocal ansatz circuit.
///
/// An initial Ry layer, then `reps` times a CZ chain between neighbours
/// followed by another Ry layer. Needs `num_qubits * (reps + 1)` parameters.
///
/// Ry and CZ keep amplitudes real, which is enough to reach the ground
/// state of any real symmetric Hamiltonian.
pub fn two_local_ansatz(num_qubits: usize, reps: usize, params: &[f64]) -> IrResult<Circuit> {
    check_parameters("two_local", num_parameters(num_qubits, reps), params)?;

    let n = width(num_qubits);
    let mut circuit = Circuit::with_size("two_local", n);
    let mut layers = params.chunks(num_qubits.max(1));

    if let Some(layer) = layers.next() {
        rotation_layer(&mut circuit, layer)?;
    }
    for layer in layers {
        for q in 1..n {
            circuit.cz(QubitId(q - 1), QubitId(q))?;
        }
        rotation_layer(&mut circuit, layer)?;
    }

    Ok(circuit)
}

/// Generate a rotation-only Ry ansatz with one parameter per qubit.
pub fn ry_ansatz(num_qubits: usize, params: &[f64]) -> IrResult<Circuit> {
    check_parameters("ry_ansatz", num_qubits, params)?;

    let mut circuit = Circuit::with_size("ry_ansatz", width(num_qubits));
    rotation_layer(&mut circuit, params)?;
    Ok(circuit)
}

fn rotation_layer(circuit: &mut Circuit, angles: &[f64]) -> IrResult<()> {
    for (q, &theta) in (0u32..).zip(angles) {
        circuit.ry(theta, QubitId(q))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use vqe_ir::StandardGate;

    #[test]
    fn test_two_local_ansatz() {
        let params = vec![PI / 4.0; 6];
        let circuit = two_local_ansatz(2, 2, &params).unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        // 3 Ry layers of 2 gates + 2 CZ
        assert_eq!(circuit.len(), 8);
        assert_eq!(circuit.depth(), 5);
    }

    #[test]
    fn test_two_local_gate_order() {
        let circuit = two_local_ansatz(3, 1, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        let gates: Vec<_> = circuit.instructions().iter().map(|i| i.gate).collect();
        assert_eq!(gates[0], StandardGate::Ry(0.1));
        assert_eq!(gates[3], StandardGate::CZ);
        assert_eq!(gates[4], StandardGate::CZ);
        assert_eq!(gates[7], StandardGate::Ry(0.6));
    }

    #[test]
    fn test_ry_ansatz() {
        let params = vec![PI / 2.0; 4];
        let circuit = ry_ansatz(4, &params).unwrap();

        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.depth(), 1);
    }

    #[test]
    fn test_parameter_count_checked() {
        let err = two_local_ansatz(2, 1, &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ParameterCount {
                expected: 4,
                got: 3,
                ..
            }
        ));
        assert!(ry_ansatz(2, &[0.0; 3]).is_err());
    }

    #[test]
    fn test_num_parameters() {
        assert_eq!(num_parameters(4, 2), 12);
        assert_eq!(AnsatzKind::Ry.num_parameters(4), 4);
        assert_eq!(AnsatzKind::TwoLocal { reps: 0 }.num_parameters(3), 3);
    }
}
