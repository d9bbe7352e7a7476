//! Dense application of k-qubit operators.

use ndarray::{ArrayViewMut1, Axis};
use num_complex::Complex64;
use qterm_core::{Matrix, QuantumState, TermResult, UnitaryApplier};
use tracing::trace;

use crate::error::StateResult;
use crate::state::{check_operator, num_qubits};

/// Exact simulator over state vectors and density matrices.
///
/// Operators act on arbitrary target tuples; the first target is the most
/// significant factor of the operator matrix. Density matrices receive
/// `U ρ U†`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseSimulator;

impl DenseSimulator {
    /// Create a simulator.
    pub fn new() -> Self {
        Self
    }

    /// Apply `matrix` on `targets` to `state`.
    pub fn apply(
        &self,
        matrix: &Matrix,
        targets: &[usize],
        state: QuantumState,
    ) -> StateResult<QuantumState> {
        let n = num_qubits(state.dim())?;
        check_operator(matrix, targets, n)?;
        trace!(?targets, n_qubits = n, density = state.is_density_matrix(), "applying operator");

        match state {
            QuantumState::Vector(mut psi) => {
                apply_in_place(matrix, targets, n, psi.view_mut());
                Ok(QuantumState::Vector(psi))
            }
            QuantumState::Density(mut rho) => {
                // (U (U ρ)†)† = U ρ U†
                for _ in 0..2 {
                    for column in rho.axis_iter_mut(Axis(1)) {
                        apply_in_place(matrix, targets, n, column);
                    }
                    rho = rho.t().mapv(|z| z.conj());
                }
                Ok(QuantumState::Density(rho))
            }
        }
    }
}

impl UnitaryApplier for DenseSimulator {
    fn apply_unitary(
        &self,
        matrix: &Matrix,
        targets: &[usize],
        state: QuantumState,
    ) -> TermResult<QuantumState> {
        Ok(self.apply(matrix, targets, state)?)
    }
}

/// `amplitudes ← (matrix on targets) · amplitudes`, gathering the `2^k`
/// amplitudes of each spectator configuration.
fn apply_in_place(
    matrix: &Matrix,
    targets: &[usize],
    n: usize,
    mut amplitudes: ArrayViewMut1<'_, Complex64>,
) {
    let k = targets.len();
    let sub_dim = 1usize << k;
    // Bit of the full index for sub-index bit (k - 1 - j).
    let masks: Vec<usize> = targets.iter().map(|&q| 1 << (n - 1 - q)).collect();
    let target_mask = masks.iter().fold(0, |acc, m| acc | m);

    let offsets: Vec<usize> = (0..sub_dim)
        .map(|sub| {
            masks.iter().enumerate().fold(0, |acc, (j, &mask)| {
                if (sub >> (k - 1 - j)) & 1 == 1 { acc | mask } else { acc }
            })
        })
        .collect();

    let mut gathered = vec![Complex64::new(0.0, 0.0); sub_dim];
    for base in 0..(1usize << n) {
        if base & target_mask != 0 {
            continue;
        }
        for (slot, &offset) in gathered.iter_mut().zip(&offsets) {
            *slot = amplitudes[base | offset];
        }
        for (row, &offset) in offsets.iter().enumerate() {
            amplitudes[base | offset] = gathered
                .iter()
                .enumerate()
                .map(|(col, a)| matrix[[row, col]] * a)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{density_from_vector, zero_state};
    use qterm_core::Pauli;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn hadamard() -> Matrix {
        let h = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        Matrix::from_shape_vec((2, 2), vec![h, h, h, -h]).unwrap()
    }

    fn cx() -> Matrix {
        let mut m = Matrix::zeros((4, 4));
        let one = Complex64::new(1.0, 0.0);
        m[[0, 0]] = one;
        m[[1, 1]] = one;
        m[[2, 3]] = one;
        m[[3, 2]] = one;
        m
    }

    #[test]
    fn test_x_on_qubit_zero_sets_msb() {
        let out = DenseSimulator.apply(&Pauli::X.matrix(), &[0], zero_state(2)).unwrap();
        let QuantumState::Vector(psi) = out else { panic!("expected vector") };
        assert!(approx_eq(psi[0b10], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let sim = DenseSimulator::new();
        let state = sim.apply(&hadamard(), &[0], zero_state(2)).unwrap();
        let state = sim.apply(&cx(), &[0, 1], state).unwrap();
        let QuantumState::Vector(psi) = state else { panic!("expected vector") };

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(psi[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(psi[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(psi[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(psi[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_reversed_targets_swap_control() {
        // CX with control 1, target 0: |01⟩ → |11⟩.
        let sim = DenseSimulator::new();
        let state = sim.apply(&Pauli::X.matrix(), &[1], zero_state(2)).unwrap();
        let state = sim.apply(&cx(), &[1, 0], state).unwrap();
        let QuantumState::Vector(psi) = state else { panic!("expected vector") };
        assert!(approx_eq(psi[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_density_is_conjugated_on_both_sides() {
        let rho = density_from_vector(zero_state(1));
        let out = DenseSimulator.apply(&hadamard(), &[0], rho).unwrap();
        let QuantumState::Density(rho) = out else { panic!("expected density") };
        for z in rho.iter() {
            assert!(approx_eq(*z, Complex64::new(0.5, 0.0)));
        }
    }

    #[test]
    fn test_applier_maps_errors() {
        let err = DenseSimulator
            .apply_unitary(&Pauli::X.matrix(), &[3], zero_state(2))
            .unwrap_err();
        assert!(matches!(err, qterm_core::TermError::State(_)));
    }
}
