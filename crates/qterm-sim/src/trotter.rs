//! Trotter-Suzuki time evolution over grouped terms.
//!
//! The Hamiltonian's terms are grouped and every group collapses into one
//! merged term `G_j`. Each merged term is exponentiated once, so a step
//! costs one dense gate per group.
//!
//! # First order (Lie-Trotter)
//!
//!   exp(-i H dt) ≈ ∏_j exp(-i G_j dt)
//!
//! # Second order (Suzuki-Trotter)
//!
//!   exp(-i H dt) ≈ [∏_j exp(-i G_j dt/2)] · [∏_{j reversed} exp(-i G_j dt/2)]

use qterm_core::{QuantumState, Unitary, UnitaryApplier};
use tracing::debug;

use crate::config::{EvolutionConfig, TrotterOrder};
use crate::error::{SimError, SimResult};
use crate::hamiltonian::SymbolicHamiltonian;

/// Cached Trotter step for one Hamiltonian.
#[derive(Debug, Clone)]
pub struct TrotterEvolution {
    nqubits: usize,
    config: EvolutionConfig,
    /// One gate per group, in group order.
    gates: Vec<Unitary>,
}

impl TrotterEvolution {
    /// Group, collapse and exponentiate the terms of `hamiltonian`.
    ///
    /// # Errors
    /// `EmptyHamiltonian` for a Hamiltonian without terms and
    /// `InvalidTimeStep` for a non-positive `config.dt`.
    pub fn new(hamiltonian: &SymbolicHamiltonian, config: EvolutionConfig) -> SimResult<Self> {
        config.validate()?;
        if hamiltonian.is_empty() {
            return Err(SimError::EmptyHamiltonian);
        }

        let slice = match config.order {
            TrotterOrder::First => config.dt,
            TrotterOrder::Second => config.dt / 2.0,
        };
        let gates: Vec<Unitary> = hamiltonian
            .merged_terms()?
            .iter()
            .map(|term| term.expgate(slice))
            .collect();

        debug!(
            n_terms = hamiltonian.n_terms(),
            n_groups = gates.len(),
            dt = config.dt,
            order = ?config.order,
            "prepared Trotter step"
        );
        Ok(Self {
            nqubits: hamiltonian.nqubits(),
            config,
            gates,
        })
    }

    /// Register size of the evolved Hamiltonian.
    pub fn nqubits(&self) -> usize {
        self.nqubits
    }

    /// Configuration in use.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Exponentiated group gates applied per (half-)step, in group order.
    pub fn gates(&self) -> &[Unitary] {
        &self.gates
    }

    /// Number of steps that cover `total_time`.
    pub fn n_steps(&self, total_time: f64) -> SimResult<usize> {
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(SimError::InvalidTimeStep(total_time));
        }
        let steps = (total_time / self.config.dt).round() as usize;
        if steps == 0 {
            return Err(SimError::InvalidSteps(0));
        }
        Ok(steps)
    }

    /// Advance `state` by one time step `dt`.
    pub fn step(
        &self,
        state: QuantumState,
        applier: &dyn UnitaryApplier,
    ) -> SimResult<QuantumState> {
        let mut state = state;
        for gate in &self.gates {
            state = gate.apply(state, applier)?;
        }
        if self.config.order == TrotterOrder::Second {
            for gate in self.gates.iter().rev() {
                state = gate.apply(state, applier)?;
            }
        }
        Ok(state)
    }

    /// Evolve `state` for `total_time`.
    pub fn evolve(
        &self,
        state: QuantumState,
        total_time: f64,
        applier: &dyn UnitaryApplier,
    ) -> SimResult<QuantumState> {
        let n_steps = self.n_steps(total_time)?;
        debug!(n_steps, total_time, "evolving state");
        (0..n_steps).try_fold(state, |state, _| self.step(state, applier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::SymbolTable;

    #[test]
    fn one_gate_per_group() {
        let h = SymbolicHamiltonian::parse("-Z0*Z1 - Z1*Z2 - X0 - X2", &SymbolTable::new()).unwrap();
        let evolution = TrotterEvolution::new(&h, EvolutionConfig::default()).unwrap();
        assert_eq!(evolution.gates().len(), 2);
        assert_eq!(evolution.gates()[0].targets(), &[0, 1]);
    }

    #[test]
    fn n_steps_rounds() {
        let h = SymbolicHamiltonian::parse("Z0", &SymbolTable::new()).unwrap();
        let evolution =
            TrotterEvolution::new(&h, EvolutionConfig::default().with_dt(0.25)).unwrap();
        assert_eq!(evolution.n_steps(1.0).unwrap(), 4);
        assert_eq!(evolution.n_steps(1.1).unwrap(), 4);
        assert!(matches!(evolution.n_steps(0.1), Err(SimError::InvalidSteps(0))));
        assert!(matches!(evolution.n_steps(-1.0), Err(SimError::InvalidTimeStep(_))));
    }
}
