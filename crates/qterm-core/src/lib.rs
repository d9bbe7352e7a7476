//! `qterm-core`: Hamiltonian term algebra.
//!
//! This crate turns a Hamiltonian written as a sum of weighted products of
//! local operators into a small set of dense, directly exponentiable terms:
//!
//! - [`Term`]: one operator on an ordered qubit tuple, backed by a dense
//!   `2^n × 2^n` matrix
//! - [`SymbolicTerm`]: a term built from an ordered factor list, with its
//!   matrix computed lazily from per-qubit products
//! - [`TermGroup`]: terms whose qubits nest inside one parent, collapsed
//!   into a single merged term
//! - [`Term::merge`]: embeds a narrower term into a wider term's qubit space
//!
//! Numeric work goes through an injected [`NumericBackend`]; applying terms
//! to states goes through a [`UnitaryApplier`] supplied by a simulator.
//!
//! # Example: grouping an Ising chain
//!
//! ```rust
//! use std::sync::Arc;
//! use num_complex::Complex64;
//! use qterm_core::{Factor, Symbol, SymbolicTerm, TermGroup};
//!
//! let minus_one = Complex64::new(-1.0, 0.0);
//! let terms = vec![
//!     SymbolicTerm::from_factors(minus_one, &[Symbol::z(0).into(), Symbol::z(1).into()]).unwrap(),
//!     SymbolicTerm::from_factors(minus_one, &[Symbol::z(1).into(), Symbol::z(2).into()]).unwrap(),
//!     SymbolicTerm::from_factors(-0.5, &[Factor::from(Symbol::x(0))]).unwrap(),
//!     SymbolicTerm::from_factors(-0.5, &[Factor::from(Symbol::x(2))]).unwrap(),
//! ];
//!
//! let groups = TermGroup::from_terms(terms.into_iter().map(Arc::new));
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].term().unwrap().matrix().dim(), (4, 4));
//! ```

pub mod backend;
pub mod error;
pub mod gate;
pub mod group;
pub mod symbol;
pub mod symbolic;
pub mod term;

pub use backend::{BackendRef, Matrix, NdarrayBackend, NumericBackend, Operand, default_backend};
pub use error::{TermError, TermResult};
pub use gate::{QuantumState, Unitary, UnitaryApplier};
pub use group::{CoefficientOverrides, TermGroup};
pub use symbol::{Factor, Pauli, Symbol};
pub use symbolic::{MAX_OPERATOR_POWER, SymbolicFactor, SymbolicTerm};
pub use term::{HamiltonianId, Term};
