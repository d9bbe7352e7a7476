//! Dense state engine for qterm.
//!
//! Exact state-vector and density-matrix simulation used to apply
//! Hamiltonian terms and their exponentials to states. [`DenseSimulator`]
//! implements the [`qterm_core::UnitaryApplier`] contract for operators on
//! any number of target qubits.
//!
//! # Conventions
//!
//! - Qubit 0 is the most significant bit of a basis index.
//! - The first target of an operator is its most significant tensor factor.
//! - Density matrices are transformed as `U ρ U†`.
//!
//! # Memory
//!
//! | Qubits | Vector | Density matrix |
//! |--------|--------|----------------|
//! | 10 | ~16 KB | ~16 MB |
//! | 14 | ~256 KB | ~4 GB |
//! | 20 | ~16 MB | not recommended |
//!
//! # Example
//!
//! ```rust
//! use qterm_core::{Pauli, QuantumState, Term};
//! use qterm_state::{DenseSimulator, expectation, zero_state};
//!
//! let x1 = Term::new(Pauli::X.matrix(), &[1]).unwrap();
//! let state = x1.apply(zero_state(2), &DenseSimulator).unwrap();
//! let QuantumState::Vector(psi) = &state else { unreachable!() };
//! assert_eq!(psi[0b01].re, 1.0);
//!
//! let z1 = qterm_state::embed(&Pauli::Z.matrix(), &[1], 2).unwrap();
//! assert_eq!(expectation(&z1, &state).unwrap().re, -1.0);
//! ```

pub mod error;
mod simulator;
pub mod state;

pub use error::{StateError, StateResult};
pub use simulator::DenseSimulator;
pub use state::{
    add_states, basis_state, density_from_vector, embed, expectation, norm_sqr, num_qubits,
    outcome_to_bitstring, plus_state, probabilities, sample, zero_state, zeros_like,
};
