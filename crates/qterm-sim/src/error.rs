//! Error types for the sim crate.

use qterm_core::TermError;
use qterm_state::StateError;
use thiserror::Error;

/// Errors produced by Hamiltonian construction and time evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty, nothing to evolve")]
    EmptyHamiltonian,

    /// A term references a qubit outside the declared register.
    #[error("Hamiltonian term references qubit {qubit} but the register only has {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits of the Hamiltonian.
        n_qubits: usize,
    },

    /// Two Hamiltonians that must share a register do not.
    #[error("Qubit count mismatch: {0} vs {1}")]
    QubitCountMismatch(usize, usize),

    /// A model needs more qubits than were given.
    #[error("Model needs at least {min} qubits, got {got}")]
    InvalidQubitCount {
        /// Minimum supported size.
        min: usize,
        /// Requested size.
        got: usize,
    },

    /// The number of evolution steps must be at least 1.
    #[error("n_steps must be at least 1, got {0}")]
    InvalidSteps(usize),

    /// Time steps and total times must be positive and finite.
    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    /// Expression text could not be parsed.
    #[error("Parse error at position {position}: {message}")]
    Parse {
        /// Byte offset in the source.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// An identifier is neither a Pauli symbol nor a registered symbol.
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// Term engine error.
    #[error("Term error: {0}")]
    Term(#[from] TermError),

    /// State engine error.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Result type for Hamiltonian operations.
pub type SimResult<T> = Result<T, SimError>;
