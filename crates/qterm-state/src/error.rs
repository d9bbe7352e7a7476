//! Error types for the dense state engine.

use qterm_core::TermError;
use thiserror::Error;

/// Errors raised while building or transforming dense states.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// A target qubit does not exist in the state.
    #[error("Qubit {qubit} out of range for a {n_qubits}-qubit state")]
    QubitOutOfRange {
        /// Offending qubit.
        qubit: usize,
        /// Number of qubits of the state.
        n_qubits: usize,
    },

    /// An operator or state has the wrong dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// A state dimension is not a power of two.
    #[error("State dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// A state vector and a density matrix were mixed.
    #[error("State kind mismatch: {0}")]
    Kind(String),
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

impl From<StateError> for TermError {
    fn from(err: StateError) -> Self {
        TermError::State(Box::new(err))
    }
}
