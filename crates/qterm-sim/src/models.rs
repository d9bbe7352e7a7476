//! Standard model Hamiltonians on periodic chains.
//!
//! Bonds couple `i` and `i + 1 (mod n)`. A two-site chain has a single bond.

use qterm_core::{Factor, Symbol, SymbolicTerm, Term};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::SymbolicHamiltonian;

/// Transverse-field Ising model `-Σ Z_i Z_{i+1} - h Σ X_i`.
pub fn tfim(n: usize, h: f64) -> SimResult<SymbolicHamiltonian> {
    check_size(n, 2)?;
    let mut terms = Vec::with_capacity(2 * n);
    for (a, b) in bonds(n) {
        terms.push(pair(-1.0, Symbol::z(a), Symbol::z(b))?);
    }
    for q in 0..n as i64 {
        terms.push(single(-h, Symbol::x(q))?);
    }
    Ok(SymbolicHamiltonian::from_terms(terms))
}

/// Heisenberg XXZ model `Σ X_i X_{i+1} + Y_i Y_{i+1} + Δ Z_i Z_{i+1}`.
pub fn xxz(n: usize, delta: f64) -> SimResult<SymbolicHamiltonian> {
    check_size(n, 2)?;
    let mut terms = Vec::with_capacity(3 * n);
    for (a, b) in bonds(n) {
        terms.push(pair(1.0, Symbol::x(a), Symbol::x(b))?);
        terms.push(pair(1.0, Symbol::y(a), Symbol::y(b))?);
        terms.push(pair(delta, Symbol::z(a), Symbol::z(b))?);
    }
    Ok(SymbolicHamiltonian::from_terms(terms))
}

/// Uniform transverse field `-Σ X_i`, the usual adiabatic start.
pub fn x_field(n: usize) -> SimResult<SymbolicHamiltonian> {
    check_size(n, 1)?;
    let terms = (0..n as i64)
        .map(|q| single(-1.0, Symbol::x(q)))
        .collect::<SimResult<Vec<_>>>()?;
    Ok(SymbolicHamiltonian::from_terms(terms))
}

fn check_size(n: usize, min: usize) -> SimResult<()> {
    if n < min {
        return Err(SimError::InvalidQubitCount { min, got: n });
    }
    Ok(())
}

fn bonds(n: usize) -> Vec<(i64, i64)> {
    let n = n as i64;
    let mut bonds: Vec<(i64, i64)> = (0..n - 1).map(|i| (i, i + 1)).collect();
    if n > 2 {
        bonds.push((n - 1, 0));
    }
    bonds
}

fn single(coefficient: f64, symbol: Symbol) -> SimResult<Term> {
    Ok(SymbolicTerm::from_factors(coefficient, &[Factor::from(symbol)])?)
}

fn pair(coefficient: f64, a: Symbol, b: Symbol) -> SimResult<Term> {
    Ok(SymbolicTerm::from_factors(coefficient, &[a.into(), b.into()])?)
}
