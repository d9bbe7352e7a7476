//! Gate representation and the state-application contract.
//!
//! The engine never touches amplitudes itself. A [`Unitary`] pairs a dense
//! matrix with its target qubits and hands both to a [`UnitaryApplier`],
//! which is implemented by a simulator crate.
//!
//! Tensor convention: the first entry of `targets` is the most significant
//! factor of the matrix, exactly as in [`crate::SymbolicTerm`] matrices and
//! in [`crate::Term::merge`].

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::backend::Matrix;
use crate::error::TermResult;

/// A quantum state in either representation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumState {
    /// Pure state amplitudes, length `2^n`.
    Vector(Array1<Complex64>),
    /// Density matrix, shape `(2^n, 2^n)`.
    Density(Array2<Complex64>),
}

impl QuantumState {
    /// True for the density-matrix representation.
    pub fn is_density_matrix(&self) -> bool {
        matches!(self, QuantumState::Density(_))
    }

    /// Hilbert-space dimension `2^n`.
    pub fn dim(&self) -> usize {
        match self {
            QuantumState::Vector(v) => v.len(),
            QuantumState::Density(m) => m.nrows(),
        }
    }

    /// Multiply every entry by `k`.
    #[must_use]
    pub fn scaled(self, k: Complex64) -> Self {
        match self {
            QuantumState::Vector(v) => QuantumState::Vector(v * k),
            QuantumState::Density(m) => QuantumState::Density(m * k),
        }
    }
}

/// Applies dense operators to states.
///
/// State vectors receive `U |ψ⟩`. Density matrices receive the both-sides
/// action `U ρ U†`.
pub trait UnitaryApplier {
    /// Apply `matrix` on `targets` to `state`.
    fn apply_unitary(
        &self,
        matrix: &Matrix,
        targets: &[usize],
        state: QuantumState,
    ) -> TermResult<QuantumState>;
}

/// A dense matrix bound to an ordered tuple of target qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    matrix: Matrix,
    targets: Vec<usize>,
}

impl Unitary {
    /// Wrap `matrix` as a gate acting on `targets`.
    pub fn new(matrix: Matrix, targets: Vec<usize>) -> Self {
        Self { matrix, targets }
    }

    /// The gate matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Target qubits in matrix axis order.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Apply the gate to `state` through `applier`.
    pub fn apply(
        &self,
        state: QuantumState,
        applier: &dyn UnitaryApplier,
    ) -> TermResult<QuantumState> {
        applier.apply_unitary(&self.matrix, &self.targets, state)
    }
}
