//! Adiabatic interpolation `H(s) = (1 - s)·H0 + s·H1`.
//!
//! The terms of both Hamiltonians are grouped once. For each `s` every group
//! is collapsed with its members rescaled by owner: `1 - s` for terms of
//! `H0` and `s` for terms of `H1`.

use num_complex::Complex64;
use qterm_core::{CoefficientOverrides, Matrix, QuantumState, Term, TermGroup, UnitaryApplier};
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{SymbolicHamiltonian, dense_sum};

/// Interpolation between a start and a problem Hamiltonian.
#[derive(Debug)]
pub struct AdiabaticHamiltonian {
    h0: SymbolicHamiltonian,
    h1: SymbolicHamiltonian,
    groups: Vec<TermGroup>,
}

impl AdiabaticHamiltonian {
    /// Interpolate from `h0` (at `s = 0`) to `h1` (at `s = 1`).
    ///
    /// # Errors
    /// `QubitCountMismatch` if the registers differ and `EmptyHamiltonian`
    /// if both are empty.
    pub fn new(h0: SymbolicHamiltonian, h1: SymbolicHamiltonian) -> SimResult<Self> {
        if h0.nqubits() != h1.nqubits() {
            return Err(SimError::QubitCountMismatch(h0.nqubits(), h1.nqubits()));
        }
        if h0.is_empty() && h1.is_empty() {
            return Err(SimError::EmptyHamiltonian);
        }
        let groups = TermGroup::from_terms(h0.terms().iter().chain(h1.terms()).cloned());
        debug!(
            n_terms = h0.n_terms() + h1.n_terms(),
            n_groups = groups.len(),
            "grouped adiabatic Hamiltonian"
        );
        Ok(Self { h0, h1, groups })
    }

    /// Start Hamiltonian.
    pub fn h0(&self) -> &SymbolicHamiltonian {
        &self.h0
    }

    /// Problem Hamiltonian.
    pub fn h1(&self) -> &SymbolicHamiltonian {
        &self.h1
    }

    /// Register size.
    pub fn nqubits(&self) -> usize {
        self.h0.nqubits()
    }

    /// Groups of the combined term list.
    pub fn groups(&self) -> &[TermGroup] {
        &self.groups
    }

    fn overrides(&self, s: f64) -> CoefficientOverrides {
        let mut overrides = CoefficientOverrides::default();
        overrides.insert(self.h0.id(), Complex64::new(1.0 - s, 0.0));
        overrides.insert(self.h1.id(), Complex64::new(s, 0.0));
        overrides
    }

    /// One merged term per group of `H(s)`.
    pub fn merged_terms(&self, s: f64) -> SimResult<Vec<Term>> {
        let overrides = self.overrides(s);
        trace!(s, "collapsing interpolated groups");
        self.groups
            .iter()
            .map(|g| g.to_term(&overrides).map_err(SimError::from))
            .collect()
    }

    /// Full matrix of `H(s)`.
    pub fn dense_matrix(&self, s: f64) -> SimResult<Matrix> {
        dense_sum(&self.merged_terms(s)?, self.nqubits())
    }

    /// Evolve `state` under `H(schedule(t / total_time))` for `total_time`
    /// with first-order Trotter steps of length `dt`.
    ///
    /// The Hamiltonian is sampled at the midpoint of every step.
    pub fn evolve(
        &self,
        state: QuantumState,
        schedule: impl Fn(f64) -> f64,
        total_time: f64,
        dt: f64,
        applier: &dyn UnitaryApplier,
    ) -> SimResult<QuantumState> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimeStep(dt));
        }
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(SimError::InvalidTimeStep(total_time));
        }
        let n_steps = (total_time / dt).round() as usize;
        if n_steps == 0 {
            return Err(SimError::InvalidSteps(0));
        }
        let dt = total_time / n_steps as f64;
        debug!(n_steps, dt, total_time, "adiabatic evolution");

        let mut state = state;
        for step in 0..n_steps {
            let s = schedule((step as f64 + 0.5) / n_steps as f64);
            for term in self.merged_terms(s)? {
                state = term.expgate(dt).apply(state, applier)?;
            }
        }
        Ok(state)
    }
}
