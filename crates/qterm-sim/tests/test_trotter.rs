//! Tests for Trotter evolution over grouped terms.

use ndarray::Array1;
use num_complex::Complex64;
use qterm_core::{NdarrayBackend, NumericBackend, QuantumState, Term};
use qterm_sim::{EvolutionConfig, SimError, SymbolTable, SymbolicHamiltonian, TrotterEvolution, TrotterOrder, models};
use qterm_state::{DenseSimulator, density_from_vector, plus_state};

fn exact_evolution(h: &SymbolicHamiltonian, psi: &QuantumState, t: f64) -> Array1<Complex64> {
    let generator = h.dense_matrix().unwrap() * Complex64::new(0.0, -t);
    let u = NdarrayBackend.expm(&generator);
    let QuantumState::Vector(psi) = psi else { panic!("expected vector") };
    u.dot(psi)
}

fn distance(state: &QuantumState, reference: &Array1<Complex64>) -> f64 {
    let QuantumState::Vector(psi) = state else { panic!("expected vector") };
    psi.iter()
        .zip(reference.iter())
        .map(|(a, b)| (a - b).norm_sqr())
        .sum::<f64>()
        .sqrt()
}

fn trotter_error(h: &SymbolicHamiltonian, order: TrotterOrder, dt: f64, t: f64) -> f64 {
    let config = EvolutionConfig::default().with_dt(dt).with_order(order);
    let evolution = TrotterEvolution::new(h, config).unwrap();
    let start = plus_state(h.nqubits());
    let out = evolution.evolve(start.clone(), t, &DenseSimulator).unwrap();
    distance(&out, &exact_evolution(h, &start, t))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_hamiltonian_returns_error() {
    let h = SymbolicHamiltonian::from_terms(Vec::<Term>::new());
    assert!(matches!(
        TrotterEvolution::new(&h, EvolutionConfig::default()),
        Err(SimError::EmptyHamiltonian)
    ));
}

#[test]
fn non_positive_dt_returns_error() {
    let h = models::x_field(1).unwrap();
    let config = EvolutionConfig::default().with_dt(-0.1);
    assert!(matches!(
        TrotterEvolution::new(&h, config),
        Err(SimError::InvalidTimeStep(_))
    ));
}

#[test]
fn zero_total_time_returns_error() {
    let h = models::x_field(1).unwrap();
    let evolution = TrotterEvolution::new(&h, EvolutionConfig::default()).unwrap();
    assert!(matches!(
        evolution.evolve(plus_state(1), 0.0, &DenseSimulator),
        Err(SimError::InvalidTimeStep(_))
    ));
}

// ---------------------------------------------------------------------------
// Accuracy
// ---------------------------------------------------------------------------

#[test]
fn single_group_is_exact() {
    // Two-site TFIM collapses into one merged term, so one step is exact.
    let h = models::tfim(2, 0.7).unwrap();
    assert_eq!(h.groups().len(), 1);
    assert!(trotter_error(&h, TrotterOrder::First, 0.5, 1.0) < 1e-10);
}

#[test]
fn commuting_groups_are_exact() {
    let h = SymbolicHamiltonian::parse("Z0*Z1 + 0.3*Z2 + Z1*Z2 - 0.7*Z0", &SymbolTable::new()).unwrap();
    assert_eq!(h.groups().len(), 2);
    assert!(trotter_error(&h, TrotterOrder::First, 0.25, 1.0) < 1e-10);
}

#[test]
fn first_order_error_shrinks_with_dt() {
    let h = models::tfim(3, 0.7).unwrap();
    let coarse = trotter_error(&h, TrotterOrder::First, 0.1, 0.5);
    let fine = trotter_error(&h, TrotterOrder::First, 0.025, 0.5);
    assert!(fine < coarse);
    assert!(fine < 0.1);
}

#[test]
fn second_order_beats_first_order() {
    let h = models::tfim(3, 0.7).unwrap();
    let first = trotter_error(&h, TrotterOrder::First, 0.05, 0.5);
    let second = trotter_error(&h, TrotterOrder::Second, 0.05, 0.5);
    assert!(second < first);
    assert!(second < 1e-2);
}

#[test]
fn density_evolution_matches_vector_evolution() {
    let h = models::xxz(3, 0.4).unwrap();
    let evolution = TrotterEvolution::new(&h, EvolutionConfig::default().with_dt(0.1)).unwrap();

    let vector = evolution.evolve(plus_state(3), 0.3, &DenseSimulator).unwrap();
    let rho = evolution
        .evolve(density_from_vector(plus_state(3)), 0.3, &DenseSimulator)
        .unwrap();

    let QuantumState::Density(expected) = density_from_vector(vector) else { panic!() };
    let QuantumState::Density(rho) = rho else { panic!("expected density") };
    for ((i, j), v) in rho.indexed_iter() {
        assert!((v - expected[[i, j]]).norm() < 1e-10);
    }
}

#[test]
fn evolution_preserves_norm_and_energy_of_eigenstate() {
    // |+++⟩ is an eigenstate of the uniform X field.
    let h = models::x_field(3).unwrap();
    let evolution = TrotterEvolution::new(&h, EvolutionConfig::default()).unwrap();
    let out = evolution.evolve(plus_state(3), 2.0, &DenseSimulator).unwrap();
    assert!((qterm_state::norm_sqr(&out) - 1.0).abs() < 1e-10);
    assert!((h.expectation(&out).unwrap() + 3.0).abs() < 1e-10);
}
