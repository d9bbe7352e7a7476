//! Quench dynamics: evolve a state and record observables per step.

use qterm_core::{Matrix, Pauli, QuantumState};
use qterm_sim::{EvolutionConfig, SimError, SimResult, SymbolicHamiltonian, TrotterEvolution};
use qterm_state::{DenseSimulator, embed, expectation};
use tracing::debug;

/// Observables after one Trotter step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuenchRecord {
    /// Elapsed time.
    pub time: f64,
    /// `⟨H⟩`.
    pub energy: f64,
    /// `(1/n) Σ ⟨Z_i⟩`.
    pub magnetization_z: f64,
    /// `(1/n) Σ ⟨X_i⟩`.
    pub magnetization_x: f64,
}

/// Outcome of a quench run.
#[derive(Debug, Clone)]
pub struct QuenchResult {
    /// One record per step, starting with the initial state at `t = 0`.
    pub history: Vec<QuenchRecord>,
    /// State after the last step.
    pub final_state: QuantumState,
}

/// Evolves states under a fixed Hamiltonian.
#[derive(Debug)]
pub struct QuenchRunner {
    hamiltonian: SymbolicHamiltonian,
    evolution: TrotterEvolution,
    z_ops: Vec<Matrix>,
    x_ops: Vec<Matrix>,
}

impl QuenchRunner {
    /// Prepare the Trotter step and the single-site observables.
    pub fn new(hamiltonian: SymbolicHamiltonian, config: EvolutionConfig) -> SimResult<Self> {
        let evolution = TrotterEvolution::new(&hamiltonian, config)?;
        let n = hamiltonian.nqubits();
        let site_ops = |op: Pauli| -> SimResult<Vec<Matrix>> {
            (0..n)
                .map(|q| embed(&op.matrix(), &[q], n).map_err(SimError::from))
                .collect()
        };
        let z_ops = site_ops(Pauli::Z)?;
        let x_ops = site_ops(Pauli::X)?;
        Ok(Self {
            hamiltonian,
            evolution,
            z_ops,
            x_ops,
        })
    }

    /// The evolved Hamiltonian.
    pub fn hamiltonian(&self) -> &SymbolicHamiltonian {
        &self.hamiltonian
    }

    /// Number of Trotter steps needed for `total_time`.
    pub fn n_steps(&self, total_time: f64) -> SimResult<usize> {
        self.evolution.n_steps(total_time)
    }

    /// Evolve `state` for `total_time`, calling `on_step` after every step.
    pub fn run(
        &self,
        state: QuantumState,
        total_time: f64,
        mut on_step: impl FnMut(&QuenchRecord),
    ) -> SimResult<QuenchResult> {
        let n_steps = self.evolution.n_steps(total_time)?;
        let dt = self.evolution.config().dt;
        debug!(n_steps, dt, "starting quench");

        let mut history = Vec::with_capacity(n_steps + 1);
        history.push(self.record(0.0, &state)?);

        let mut state = state;
        for step in 1..=n_steps {
            state = self.evolution.step(state, &DenseSimulator)?;
            let record = self.record(step as f64 * dt, &state)?;
            on_step(&record);
            history.push(record);
        }

        Ok(QuenchResult {
            history,
            final_state: state,
        })
    }

    fn record(&self, time: f64, state: &QuantumState) -> SimResult<QuenchRecord> {
        Ok(QuenchRecord {
            time,
            energy: self.hamiltonian.expectation(state)?,
            magnetization_z: average(&self.z_ops, state)?,
            magnetization_x: average(&self.x_ops, state)?,
        })
    }
}

fn average(ops: &[Matrix], state: &QuantumState) -> SimResult<f64> {
    if ops.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for op in ops {
        total += expectation(op, state)?.re;
    }
    Ok(total / ops.len() as f64)
}
