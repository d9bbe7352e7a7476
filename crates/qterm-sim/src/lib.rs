//! `qterm-sim`: symbolic Hamiltonians and their time evolution.
//!
//! Builds Hamiltonians as sums of symbolic terms on top of `qterm-core` and
//! evolves states with the dense engine from `qterm-state`:
//!
//! - **Expressions**: `"-1.0*Z0*Z1 - 0.5*X0"` parsed into monomials
//! - **Models**: transverse-field Ising, XXZ, uniform X field
//! - **Trotter-Suzuki** evolution over grouped, merged terms (first and
//!   second order)
//! - **Adiabatic** interpolation `(1 - s)·H0 + s·H1` via per-owner
//!   coefficient overrides
//!
//! # Quick start
//!
//! ```rust
//! use qterm_sim::{EvolutionConfig, TrotterEvolution, models};
//! use qterm_state::{DenseSimulator, plus_state};
//!
//! // Transverse-field Ising model: H = -Σ ZZ - h·Σ X
//! let h = models::tfim(3, 0.5).unwrap();
//! let evolution = TrotterEvolution::new(&h, EvolutionConfig::default().with_dt(0.05)).unwrap();
//!
//! let state = evolution.evolve(plus_state(3), 1.0, &DenseSimulator).unwrap();
//! let energy = h.expectation(&state).unwrap();
//! assert!(energy.is_finite());
//! ```

pub mod adiabatic;
pub mod config;
pub mod error;
pub mod expr;
pub mod hamiltonian;
pub mod lexer;
pub mod models;
pub mod trotter;

pub use adiabatic::AdiabaticHamiltonian;
pub use config::{EvolutionConfig, TrotterOrder};
pub use error::{SimError, SimResult};
pub use expr::{Monomial, SymbolTable, parse_expression};
pub use hamiltonian::SymbolicHamiltonian;
pub use trotter::TrotterEvolution;
