//! Tests for symbolic Hamiltonians and the expression front end.

use ndarray::Array1;
use num_complex::Complex64;
use qterm_core::{Factor, Matrix, NdarrayBackend, NumericBackend, Pauli, QuantumState, Symbol, TermError};
use qterm_sim::{Monomial, SimError, SymbolTable, SymbolicHamiltonian, models};
use qterm_state::{DenseSimulator, density_from_vector, plus_state};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn kron_all(ops: &[Matrix]) -> Matrix {
    ops.iter()
        .skip(1)
        .fold(ops[0].clone(), |acc, m| NdarrayBackend.kron(&acc, m))
}

fn assert_close(a: &Matrix, b: &Matrix) {
    assert_eq!(a.dim(), b.dim());
    for ((i, j), v) in a.indexed_iter() {
        assert!((v - b[[i, j]]).norm() < 1e-10, "mismatch at ({i}, {j}): {v} vs {}", b[[i, j]]);
    }
}

fn test_state(n: usize) -> Array1<Complex64> {
    let dim = 1usize << n;
    let v = Array1::from_shape_fn(dim, |i| c(1.0 + i as f64, 0.5 * (i % 3) as f64));
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    v.mapv(|z| z / norm)
}

// ---------------------------------------------------------------------------
// Dense matrix
// ---------------------------------------------------------------------------

#[test]
fn parsed_ising_matches_explicit_kron() {
    let h = SymbolicHamiltonian::parse("-Z0*Z1 - 0.5*X0 - 0.5*X1", &SymbolTable::new()).unwrap();
    let (x, z, i2) = (Pauli::X.matrix(), Pauli::Z.matrix(), Matrix::eye(2));
    let expected = kron_all(&[z.clone(), z]) * c(-1.0, 0.0)
        + kron_all(&[x.clone(), i2.clone()]) * c(-0.5, 0.0)
        + kron_all(&[i2, x]) * c(-0.5, 0.0);
    assert_close(&h.dense_matrix().unwrap(), &expected);
}

#[test]
fn merged_terms_sum_to_dense_matrix() {
    let h = models::xxz(4, 0.3).unwrap();
    let dim = 1 << h.nqubits();
    let mut total = Matrix::zeros((dim, dim));
    for term in h.merged_terms().unwrap() {
        total += &qterm_state::embed(term.matrix(), term.target_qubits(), h.nqubits()).unwrap();
    }
    assert_close(&total, &h.dense_matrix().unwrap());
}

#[test]
fn imaginary_unit_and_powers() {
    // 2·I·Y1^2 = 2i · identity on qubit 1.
    let h = SymbolicHamiltonian::parse("2*I*Y1^2", &SymbolTable::new()).unwrap();
    assert_eq!(h.nqubits(), 2);
    assert_close(&h.dense_matrix().unwrap(), &(Matrix::eye(4) * c(0.0, 2.0)));
}

#[test]
fn scalar_user_symbol_folds_into_coefficient() {
    let table = SymbolTable::new().with("g", 0, 0.5);
    let h = SymbolicHamiltonian::parse("g^2*Z0", &table).unwrap();
    assert_close(&h.dense_matrix().unwrap(), &(Pauli::Z.matrix() * c(0.25, 0.0)));
}

#[test]
fn matrix_user_symbol_on_its_qubit() {
    let sigma_plus = Matrix::from_shape_fn((2, 2), |(i, j)| if i == 0 && j == 1 { c(1.0, 0.0) } else { c(0.0, 0.0) });
    let table = SymbolTable::new().with("Sp1", 1, sigma_plus.clone());
    let h = SymbolicHamiltonian::parse("Sp1", &table).unwrap();
    assert_close(&h.dense_matrix().unwrap(), &kron_all(&[Matrix::eye(2), sigma_plus]));
}

// ---------------------------------------------------------------------------
// Observables and application
// ---------------------------------------------------------------------------

#[test]
fn expectation_matches_dense_matrix() {
    let h = models::tfim(3, 0.8).unwrap();
    let psi = test_state(3);
    let dense = h.dense_matrix().unwrap();
    let expected: Complex64 = psi
        .iter()
        .zip(dense.dot(&psi).iter())
        .map(|(a, b)| a.conj() * b)
        .sum();

    let state = QuantumState::Vector(psi);
    let energy = h.expectation(&state).unwrap();
    assert!((energy - expected.re).abs() < 1e-10);

    let rho = density_from_vector(state);
    assert!((h.expectation(&rho).unwrap() - expected.re).abs() < 1e-10);
}

#[test]
fn apply_matches_dense_matrix_for_distinct_qubits() {
    let h = models::xxz(3, 1.5).unwrap();
    let psi = test_state(3);
    let out = h.apply(&QuantumState::Vector(psi.clone()), &DenseSimulator).unwrap();
    let QuantumState::Vector(out) = out else { panic!("expected vector") };
    let expected = h.dense_matrix().unwrap().dot(&psi);
    for (a, b) in out.iter().zip(expected.iter()) {
        assert!((a - b).norm() < 1e-10);
    }
}

#[test]
fn apply_follows_factor_order_on_shared_qubit() {
    // Matrix of X0·Y0 is iZ but application runs X then Y, giving -iZ.
    let h = SymbolicHamiltonian::parse("X0*Y0", &SymbolTable::new()).unwrap();
    assert_close(&h.dense_matrix().unwrap(), &(Pauli::Z.matrix() * c(0.0, 1.0)));

    let out = h.apply(&plus_state(1), &DenseSimulator).unwrap();
    let QuantumState::Vector(out) = out else { panic!("expected vector") };
    let s = 1.0 / 2f64.sqrt();
    assert!((out[0] - c(0.0, -s)).norm() < 1e-12);
    assert!((out[1] - c(0.0, s)).norm() < 1e-12);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn opaque_factor_surfaces_as_unparsable() {
    let monomials = [Monomial::new(1.0, vec![Factor::Opaque("cos(theta)".into())])];
    let err = SymbolicHamiltonian::from_monomials(&monomials).unwrap_err();
    assert!(matches!(err, SimError::Term(TermError::UnparsableFactor(_))));
}

#[test]
fn negative_exponent_is_unparsable() {
    let err = SymbolicHamiltonian::parse("X0^-1", &SymbolTable::new()).unwrap_err();
    assert!(matches!(err, SimError::Term(TermError::UnparsableFactor(ref s)) if s == "X0^-1"));
}

#[test]
fn negative_user_qubit_is_invalid() {
    let table = SymbolTable::new().with("A", -2, Pauli::X.matrix());
    let err = SymbolicHamiltonian::parse("A", &table).unwrap_err();
    assert!(matches!(err, SimError::Term(TermError::InvalidQubit(-2))));
}

#[test]
fn unknown_identifier_is_reported() {
    let err = SymbolicHamiltonian::parse("Z0 + W1", &SymbolTable::new()).unwrap_err();
    assert!(matches!(err, SimError::UnknownSymbol(ref s) if s == "W1"));
}

#[test]
fn pauli_builtin_rejects_non_numeric_suffix() {
    assert!(SymbolTable::new().resolve("Xa").is_none());
    assert_eq!(SymbolTable::new().resolve("Z12"), Some(Symbol::z(12)));
}
