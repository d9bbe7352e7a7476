//! Symbolic Hamiltonians.
//!
//! A Hamiltonian is a sum of terms
//!
//!   H = Σ_k  T_k
//!
//! where each `T_k` is a [`Term`] on a small qubit tuple, usually built from
//! a monomial of symbols. Every term is tagged with the Hamiltonian's
//! [`HamiltonianId`] so that group collapse can rescale it later.
//!
//! # Example
//!
//! ```rust
//! use qterm_sim::{SymbolTable, SymbolicHamiltonian};
//!
//! // Transverse-field Ising chain on 3 qubits
//! let h = SymbolicHamiltonian::parse(
//!     "-Z0*Z1 - Z1*Z2 - 0.5*X0 - 0.5*X1 - 0.5*X2",
//!     &SymbolTable::new(),
//! )
//! .unwrap();
//! assert_eq!(h.nqubits(), 3);
//! assert_eq!(h.n_terms(), 5);
//! assert_eq!(h.groups().len(), 2);
//! ```

use std::sync::{Arc, OnceLock};

use num_complex::Complex64;
use qterm_core::{HamiltonianId, Matrix, QuantumState, SymbolicTerm, Term, TermGroup, UnitaryApplier};
use qterm_state::{add_states, embed, expectation, zeros_like};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::expr::{Monomial, SymbolTable, parse_expression};

/// A sum of Hamiltonian terms on an `nqubits` register.
#[derive(Debug)]
pub struct SymbolicHamiltonian {
    id: HamiltonianId,
    nqubits: usize,
    terms: Vec<Arc<Term>>,
    groups: OnceLock<Vec<TermGroup>>,
}

impl SymbolicHamiltonian {
    /// Create from a list of terms; the register size is inferred.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let id = HamiltonianId::fresh();
        let terms: Vec<Arc<Term>> = terms
            .into_iter()
            .map(|t| Arc::new(t.with_owner(id)))
            .collect();
        let nqubits = min_qubits(&terms);
        debug!(%id, n_terms = terms.len(), nqubits, "built Hamiltonian");
        Self {
            id,
            nqubits,
            terms,
            groups: OnceLock::new(),
        }
    }

    /// Create from explicit monomials.
    pub fn from_monomials(monomials: &[Monomial]) -> SimResult<Self> {
        let terms = monomials
            .iter()
            .map(|m| SymbolicTerm::from_factors(m.coefficient, &m.factors))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_terms(terms))
    }

    /// Parse an expression such as `"-1.0*Z0*Z1 - 0.5*X0"`.
    pub fn parse(expression: &str, table: &SymbolTable) -> SimResult<Self> {
        Self::from_monomials(&parse_expression(expression, table)?)
    }

    /// Widen the register to `n` qubits.
    ///
    /// # Errors
    /// `QubitOutOfRange` if a term acts on a qubit `>= n`.
    pub fn with_nqubits(mut self, n: usize) -> SimResult<Self> {
        if n < self.nqubits {
            return Err(SimError::QubitOutOfRange {
                qubit: self.nqubits - 1,
                n_qubits: n,
            });
        }
        self.nqubits = n;
        Ok(self)
    }

    /// Identity used as the key of coefficient overrides.
    pub fn id(&self) -> HamiltonianId {
        self.id
    }

    /// Register size.
    pub fn nqubits(&self) -> usize {
        self.nqubits
    }

    /// All terms, in insertion order.
    pub fn terms(&self) -> &[Arc<Term>] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Groups of nested terms, computed once.
    pub fn groups(&self) -> &[TermGroup] {
        self.groups
            .get_or_init(|| TermGroup::from_terms(self.terms.iter().cloned()))
    }

    /// One merged term per group.
    pub fn merged_terms(&self) -> SimResult<Vec<Term>> {
        self.groups()
            .iter()
            .map(|g| g.term().cloned().map_err(SimError::from))
            .collect()
    }

    /// Full `2^n × 2^n` matrix.
    pub fn dense_matrix(&self) -> SimResult<Matrix> {
        dense_sum(self.terms.iter().map(|t| t.as_ref()), self.nqubits)
    }

    /// Energy `⟨H⟩` of a state vector or density matrix (real part).
    pub fn expectation(&self, state: &QuantumState) -> SimResult<f64> {
        let mut energy = Complex64::new(0.0, 0.0);
        for term in self.merged_terms()? {
            let full = embed(term.matrix(), term.target_qubits(), self.nqubits)?;
            energy += expectation(&full, state)?;
        }
        Ok(energy.re)
    }

    /// `Σ_k T_k(state)`, each term applied through `applier`.
    pub fn apply(
        &self,
        state: &QuantumState,
        applier: &dyn UnitaryApplier,
    ) -> SimResult<QuantumState> {
        let mut total = zeros_like(state);
        for term in &self.terms {
            let part = term.apply(state.clone(), applier)?;
            total = add_states(total, &part)?;
        }
        Ok(total)
    }
}

/// Sum of terms embedded in an `n`-qubit register.
pub(crate) fn dense_sum<'a>(
    terms: impl IntoIterator<Item = &'a Term>,
    n: usize,
) -> SimResult<Matrix> {
    let dim = 1usize << n;
    let mut total = Matrix::zeros((dim, dim));
    for term in terms {
        if let Some(&qubit) = term.target_qubits().iter().find(|&&q| q >= n) {
            return Err(SimError::QubitOutOfRange { qubit, n_qubits: n });
        }
        total += &embed(term.matrix(), term.target_qubits(), n)?;
    }
    Ok(total)
}

fn min_qubits(terms: &[Arc<Term>]) -> usize {
    terms
        .iter()
        .filter_map(|t| t.target_qubits().iter().max())
        .max()
        .map_or(0, |q| q + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qterm_core::Pauli;

    #[test]
    fn terms_are_tagged_with_owner() {
        let h = SymbolicHamiltonian::from_terms([
            Term::new(Pauli::Z.matrix(), &[0]).unwrap(),
            Term::new(Pauli::X.matrix(), &[3]).unwrap(),
        ]);
        assert!(h.terms().iter().all(|t| t.owner() == Some(h.id())));
        assert_eq!(h.nqubits(), 4);
    }

    #[test]
    fn constant_only_hamiltonian_has_no_qubits() {
        let h = SymbolicHamiltonian::from_terms([Term::new(2.0, &[]).unwrap()]);
        assert_eq!(h.nqubits(), 0);
        assert_eq!(h.dense_matrix().unwrap()[[0, 0]], Complex64::new(2.0, 0.0));
    }

    #[test]
    fn with_nqubits_rejects_shrinking() {
        let h = SymbolicHamiltonian::from_terms([Term::new(Pauli::Z.matrix(), &[2]).unwrap()]);
        assert!(matches!(
            h.with_nqubits(2),
            Err(SimError::QubitOutOfRange { qubit: 2, n_qubits: 2 })
        ));
    }

    #[test]
    fn groups_are_memoized() {
        let h = SymbolicHamiltonian::parse("Z0*Z1 + X0", &SymbolTable::new()).unwrap();
        let first = h.groups().as_ptr();
        assert_eq!(first, h.groups().as_ptr());
        assert_eq!(h.groups().len(), 1);
    }
}
