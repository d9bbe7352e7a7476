//! Error types for the term engine.

use thiserror::Error;

/// Errors produced while building, merging or applying Hamiltonian terms.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TermError {
    /// A negative qubit id was given to a term.
    #[error("Invalid qubit id {0} < 0 was given in Hamiltonian term")]
    InvalidQubit(i64),

    /// The same qubit appears twice in a term's target list.
    #[error("Qubit {0} appears more than once in Hamiltonian term")]
    DuplicateQubit(usize),

    /// Matrix dimension does not match the number of target qubits.
    #[error(
        "Matrix dimension {dim} given in Hamiltonian term is not compatible with the number of target qubits {n_qubits}"
    )]
    DimensionMismatch {
        /// Row count of the offending matrix.
        dim: usize,
        /// Number of declared target qubits.
        n_qubits: usize,
    },

    /// The matrix argument is neither a scalar nor a square rank-2 tensor.
    #[error("Invalid type of term matrix: {0}")]
    InvalidType(String),

    /// A symbolic factor could not be classified.
    #[error("Cannot parse factor {0}")]
    UnparsableFactor(String),

    /// Merge child acts on qubits outside the parent's target set.
    #[error("Cannot merge term acting on qubits {child:?} to term on qubits {parent:?}")]
    QubitSubsetViolation {
        /// Target qubits of the term being merged in.
        child: Vec<usize>,
        /// Target qubits of the receiving term.
        parent: Vec<usize>,
    },

    /// Reshaping a tensor failed.
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The unitary applier rejected the state.
    #[error("State application failed: {0}")]
    State(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for term engine operations.
pub type TermResult<T> = Result<T, TermError>;
