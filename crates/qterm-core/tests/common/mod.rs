//! Shared helpers for the term engine integration tests.
#![allow(dead_code)]

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use proptest::prelude::*;
use qterm_core::{Matrix, QuantumState, TermResult, UnitaryApplier};

pub const TOL: f64 = 1e-10;

pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

pub fn to_i64(qubits: &[usize]) -> Vec<i64> {
    qubits.iter().map(|&q| q as i64).collect()
}

pub fn assert_matrix_close(a: &Matrix, b: &Matrix, tol: f64) {
    assert_eq!(a.dim(), b.dim(), "shape mismatch");
    for ((i, j), v) in a.indexed_iter() {
        let diff = (v - b[[i, j]]).norm();
        assert!(diff < tol, "mismatch at ({i}, {j}): {v} vs {} (diff={diff})", b[[i, j]]);
    }
}

/// Embed `matrix` acting on `targets` into the ordered qubit `space`,
/// element by element, without any axis permutation.
pub fn embed(matrix: &Matrix, targets: &[usize], space: &[usize]) -> Matrix {
    let n = space.len();
    let k = targets.len();
    let dim = 1usize << n;
    let bit = |index: usize, qubit: usize| -> usize {
        let pos = space.iter().position(|&q| q == qubit).expect("target outside space");
        (index >> (n - 1 - pos)) & 1
    };
    let sub = |index: usize| -> usize {
        targets
            .iter()
            .enumerate()
            .fold(0, |acc, (j, &t)| acc | (bit(index, t) << (k - 1 - j)))
    };
    Matrix::from_shape_fn((dim, dim), |(r, col)| {
        let spectators_agree = space
            .iter()
            .filter(|q| !targets.contains(q))
            .all(|&q| bit(r, q) == bit(col, q));
        if spectators_agree {
            matrix[[sub(r), sub(col)]]
        } else {
            c(0.0, 0.0)
        }
    })
}

/// Reference `exp(a)` by scaled Taylor series and repeated squaring.
pub fn taylor_expm(a: &Matrix) -> Matrix {
    let norm: f64 = a.iter().map(|z| z.norm()).sum();
    let squarings = if norm > 0.25 { (norm / 0.25).log2().ceil() as i32 } else { 0 };
    let scaled = a * c(2f64.powi(-squarings), 0.0);
    let dim = a.nrows();
    let mut result = Matrix::eye(dim);
    let mut power = Matrix::eye(dim);
    for k in 1..40 {
        power = power.dot(&scaled) * c(1.0 / k as f64, 0.0);
        result = result + &power;
    }
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    result
}

/// Applies operators through brute-force embedding; qubit 0 is the most
/// significant bit of the state index.
pub struct EmbeddingApplier;

impl UnitaryApplier for EmbeddingApplier {
    fn apply_unitary(
        &self,
        matrix: &Matrix,
        targets: &[usize],
        state: QuantumState,
    ) -> TermResult<QuantumState> {
        let n = state.dim().trailing_zeros() as usize;
        let space: Vec<usize> = (0..n).collect();
        let full = embed(matrix, targets, &space);
        Ok(match state {
            QuantumState::Vector(v) => QuantumState::Vector(full.dot(&v)),
            QuantumState::Density(rho) => {
                let dagger = full.t().mapv(|z| z.conj());
                QuantumState::Density(full.dot(&rho).dot(&dagger))
            }
        })
    }
}

pub fn basis_state(n: usize, index: usize) -> Array1<Complex64> {
    let mut v = Array1::zeros(1 << n);
    v[index] = c(1.0, 0.0);
    v
}

pub fn arb_matrix(n_qubits: usize) -> impl Strategy<Value = Matrix> {
    let dim = 1usize << n_qubits;
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), dim * dim).prop_map(move |entries| {
        Array2::from_shape_vec(
            (dim, dim),
            entries.into_iter().map(|(re, im)| c(re, im)).collect(),
        )
        .unwrap()
    })
}

pub fn arb_hermitian(n_qubits: usize) -> impl Strategy<Value = Matrix> {
    arb_matrix(n_qubits).prop_map(|m| {
        let dagger = m.t().mapv(|z| z.conj());
        (&m + &dagger) * c(0.5, 0.0)
    })
}

/// Distinct qubits drawn from `0..pool`, in random order.
pub fn arb_qubits(pool: usize, len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<usize>> {
    prop::sample::subsequence((0..pool).collect::<Vec<_>>(), len).prop_shuffle()
}
