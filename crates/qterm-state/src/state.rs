//! Dense state constructors and observables.
//!
//! Basis index convention: qubit 0 is the most significant bit, so the
//! amplitude of `|q0 q1 … q(n-1)⟩` sits at index `q0·2^(n-1) + … + q(n-1)`.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qterm_core::{Matrix, QuantumState};

use crate::error::{StateError, StateResult};

/// Number of qubits of a `dim`-dimensional space.
pub fn num_qubits(dim: usize) -> StateResult<usize> {
    if dim == 0 || !dim.is_power_of_two() {
        return Err(StateError::NotPowerOfTwo(dim));
    }
    Ok(dim.trailing_zeros() as usize)
}

/// `|0…0⟩` on `n` qubits.
pub fn zero_state(n: usize) -> QuantumState {
    let mut amplitudes = Array1::zeros(1 << n);
    amplitudes[0] = Complex64::new(1.0, 0.0);
    QuantumState::Vector(amplitudes)
}

/// `|+…+⟩` on `n` qubits, the ground state of `-Σ X_i`.
pub fn plus_state(n: usize) -> QuantumState {
    let dim = 1usize << n;
    let amp = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
    QuantumState::Vector(Array1::from_elem(dim, amp))
}

/// Computational basis state `|index⟩` on `n` qubits.
pub fn basis_state(n: usize, index: usize) -> StateResult<QuantumState> {
    let dim = 1usize << n;
    if index >= dim {
        return Err(StateError::DimensionMismatch {
            expected: dim,
            actual: index + 1,
        });
    }
    let mut amplitudes = Array1::zeros(dim);
    amplitudes[index] = Complex64::new(1.0, 0.0);
    Ok(QuantumState::Vector(amplitudes))
}

/// `|ψ⟩⟨ψ|` for a state vector; density matrices are returned unchanged.
pub fn density_from_vector(state: QuantumState) -> QuantumState {
    match state {
        QuantumState::Vector(psi) => {
            let dim = psi.len();
            QuantumState::Density(Array2::from_shape_fn((dim, dim), |(i, j)| {
                psi[i] * psi[j].conj()
            }))
        }
        density @ QuantumState::Density(_) => density,
    }
}

/// Embed `matrix` acting on `targets` into the full `n`-qubit space.
///
/// The first target is the most significant factor of `matrix`.
pub fn embed(matrix: &Matrix, targets: &[usize], n: usize) -> StateResult<Matrix> {
    let k = targets.len();
    check_operator(matrix, targets, n)?;

    let dim = 1usize << n;
    let target_mask = targets
        .iter()
        .fold(0usize, |mask, &q| mask | (1 << (n - 1 - q)));
    let sub_index = |index: usize| -> usize {
        targets.iter().enumerate().fold(0, |acc, (j, &q)| {
            acc | (((index >> (n - 1 - q)) & 1) << (k - 1 - j))
        })
    };

    Ok(Matrix::from_shape_fn((dim, dim), |(row, col)| {
        if (row & !target_mask) != (col & !target_mask) {
            Complex64::new(0.0, 0.0)
        } else {
            matrix[[sub_index(row), sub_index(col)]]
        }
    }))
}

/// `⟨ψ|O|ψ⟩` for vectors and `Tr(O ρ)` for density matrices.
pub fn expectation(observable: &Matrix, state: &QuantumState) -> StateResult<Complex64> {
    let dim = state.dim();
    if observable.nrows() != dim || observable.ncols() != dim {
        return Err(StateError::DimensionMismatch {
            expected: dim,
            actual: observable.nrows(),
        });
    }
    Ok(match state {
        QuantumState::Vector(psi) => {
            let o_psi = observable.dot(psi);
            psi.iter().zip(o_psi.iter()).map(|(a, b)| a.conj() * b).sum()
        }
        QuantumState::Density(rho) => observable.dot(rho).diag().sum(),
    })
}

/// Entry-wise sum of two states of the same kind and dimension.
pub fn add_states(a: QuantumState, b: &QuantumState) -> StateResult<QuantumState> {
    if a.dim() != b.dim() {
        return Err(StateError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    match (a, b) {
        (QuantumState::Vector(x), QuantumState::Vector(y)) => Ok(QuantumState::Vector(x + y)),
        (QuantumState::Density(x), QuantumState::Density(y)) => Ok(QuantumState::Density(x + y)),
        _ => Err(StateError::Kind(
            "cannot add a state vector and a density matrix".into(),
        )),
    }
}

/// Zero state of the same kind and dimension as `like`.
pub fn zeros_like(like: &QuantumState) -> QuantumState {
    let dim = like.dim();
    match like {
        QuantumState::Vector(_) => QuantumState::Vector(Array1::zeros(dim)),
        QuantumState::Density(_) => QuantumState::Density(Array2::zeros((dim, dim))),
    }
}

/// Squared norm for vectors, trace for density matrices.
pub fn norm_sqr(state: &QuantumState) -> f64 {
    match state {
        QuantumState::Vector(psi) => psi.iter().map(|a| a.norm_sqr()).sum(),
        QuantumState::Density(rho) => rho.diag().iter().map(|z| z.re).sum(),
    }
}

/// Measurement probabilities in the computational basis.
pub fn probabilities(state: &QuantumState) -> Vec<f64> {
    match state {
        QuantumState::Vector(psi) => psi.iter().map(|a| a.norm_sqr()).collect(),
        QuantumState::Density(rho) => rho.diag().iter().map(|z| z.re).collect(),
    }
}

/// Sample a measurement outcome.
pub fn sample<R: rand::Rng>(state: &QuantumState, rng: &mut R) -> usize {
    let probs = probabilities(state);
    let r: f64 = rng.r#gen();

    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }

    // Rounding can leave the cumulative sum just below 1.
    probs.len().saturating_sub(1)
}

/// Bitstring of an outcome, qubit 0 first.
pub fn outcome_to_bitstring(outcome: usize, n: usize) -> String {
    format!("{outcome:0n$b}")
}

pub(crate) fn check_operator(matrix: &Matrix, targets: &[usize], n: usize) -> StateResult<()> {
    if let Some(&qubit) = targets.iter().find(|&&q| q >= n) {
        return Err(StateError::QubitOutOfRange { qubit, n_qubits: n });
    }
    let expected = 1usize << targets.len();
    if matrix.nrows() != expected || matrix.ncols() != expected {
        return Err(StateError::DimensionMismatch {
            expected,
            actual: matrix.nrows(),
        });
    }
    Ok(())
}
