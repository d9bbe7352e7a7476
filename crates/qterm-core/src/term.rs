//! Hamiltonian terms.
//!
//! A [`Term`] is one operator acting on an ordered tuple of qubits. The
//! order of `target_qubits` is the axis order of the term matrix: the first
//! qubit is the most significant tensor factor.
//!
//! # Example
//!
//! ```rust
//! use qterm_core::backend::{NdarrayBackend, NumericBackend};
//! use qterm_core::{Pauli, Term};
//!
//! let zz = NdarrayBackend.kron(&Pauli::Z.matrix(), &Pauli::Z.matrix());
//! let zz = Term::new(zz, &[0, 1]).unwrap();
//! let z0 = Term::new(Pauli::Z.matrix(), &[0]).unwrap();
//!
//! let merged = zz.merge(&z0).unwrap();
//! assert_eq!(merged.target_qubits(), &[0, 1]);
//! ```

use std::fmt;
use std::ops::Mul;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use num_complex::Complex64;
use tracing::trace;

use crate::backend::{BackendRef, Matrix, Operand, default_backend};
use crate::error::{TermError, TermResult};
use crate::gate::{QuantumState, Unitary, UnitaryApplier};
use crate::symbolic::SymbolicTerm;

/// Opaque identity of the Hamiltonian a term belongs to.
///
/// Used only as the key of coefficient overrides in
/// [`crate::TermGroup::to_term`]; it carries no ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HamiltonianId(u64);

impl HamiltonianId {
    /// Allocate an id that no other call in this process returns.
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HamiltonianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum TermKind {
    Dense(Matrix),
    Symbolic(SymbolicTerm),
}

/// Single operator acting on a fixed tuple of qubits.
#[derive(Debug, Clone)]
pub struct Term {
    target_qubits: Vec<usize>,
    kind: TermKind,
    gate: OnceLock<Unitary>,
    owner: Option<HamiltonianId>,
    backend: BackendRef,
}

impl Term {
    /// Build a term from an explicit matrix using the default backend.
    ///
    /// # Errors
    /// `InvalidQubit` for negative ids, `DuplicateQubit` for repeated ids,
    /// `InvalidType` if `matrix` is not a scalar or square rank-2 tensor, and
    /// `DimensionMismatch` if its dimension is not `2^qubits.len()`.
    pub fn new(matrix: impl Into<Operand>, qubits: &[i64]) -> TermResult<Self> {
        Self::with_backend(default_backend(), matrix, qubits)
    }

    /// Build a term from an explicit matrix using `backend`.
    pub fn with_backend(
        backend: BackendRef,
        matrix: impl Into<Operand>,
        qubits: &[i64],
    ) -> TermResult<Self> {
        let target_qubits = validate_qubits(qubits)?;
        let operand = matrix.into();
        if !backend.is_scalar(&operand) && !backend.is_tensor(&operand) {
            return Err(TermError::InvalidType(describe(&operand)));
        }
        let matrix = match operand {
            Operand::Scalar(value) => Matrix::from_elem((1, 1), value),
            Operand::Tensor(tensor) => backend.to_matrix(tensor)?,
        };

        let dim = matrix.nrows();
        if 1usize.checked_shl(target_qubits.len() as u32) != Some(dim) {
            return Err(TermError::DimensionMismatch {
                dim,
                n_qubits: target_qubits.len(),
            });
        }
        Ok(Self::from_matrix(backend, matrix, target_qubits))
    }

    /// Construct without validation; callers guarantee the dimension.
    pub(crate) fn from_matrix(backend: BackendRef, matrix: Matrix, target_qubits: Vec<usize>) -> Self {
        Self {
            target_qubits,
            kind: TermKind::Dense(matrix),
            gate: OnceLock::new(),
            owner: None,
            backend,
        }
    }

    pub(crate) fn from_symbolic(
        backend: BackendRef,
        symbolic: SymbolicTerm,
        target_qubits: Vec<usize>,
    ) -> Self {
        Self {
            target_qubits,
            kind: TermKind::Symbolic(symbolic),
            gate: OnceLock::new(),
            owner: None,
            backend,
        }
    }

    /// Tag this term with the Hamiltonian that owns it.
    #[must_use]
    pub fn with_owner(mut self, owner: HamiltonianId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Owning Hamiltonian, if any.
    pub fn owner(&self) -> Option<HamiltonianId> {
        self.owner
    }

    /// Target qubits in matrix axis order.
    pub fn target_qubits(&self) -> &[usize] {
        &self.target_qubits
    }

    /// Number of target qubits.
    pub fn len(&self) -> usize {
        self.target_qubits.len()
    }

    /// True for a zero-qubit (constant) term.
    pub fn is_empty(&self) -> bool {
        self.target_qubits.is_empty()
    }

    /// The backend this term computes with.
    pub fn backend(&self) -> &BackendRef {
        &self.backend
    }

    /// Symbolic description, if the term was built from factors.
    pub fn symbolic(&self) -> Option<&SymbolicTerm> {
        match &self.kind {
            TermKind::Symbolic(s) => Some(s),
            TermKind::Dense(_) => None,
        }
    }

    /// Full matrix of shape `(2^n, 2^n)`, computed once for symbolic terms.
    pub fn matrix(&self) -> &Matrix {
        match &self.kind {
            TermKind::Dense(m) => m,
            TermKind::Symbolic(s) => s.matrix(self.backend.as_ref()),
        }
    }

    /// Gate that applies the term matrix.
    pub fn gate(&self) -> &Unitary {
        self.gate
            .get_or_init(|| Unitary::new(self.matrix().clone(), self.target_qubits.clone()))
    }

    /// `exp(-i·x·M)` for the term matrix `M`.
    pub fn exp(&self, x: f64) -> Matrix {
        let generator = self.backend.scale(Complex64::new(0.0, -x), self.matrix());
        self.backend.expm(&generator)
    }

    /// Gate implementing [`Term::exp`].
    pub fn expgate(&self, x: f64) -> Unitary {
        Unitary::new(self.exp(x), self.target_qubits.clone())
    }

    /// New term whose matrix is `k` times this one. The copy has no owner.
    #[must_use]
    pub fn scaled(&self, k: Complex64) -> Term {
        match &self.kind {
            TermKind::Dense(m) => Term::from_matrix(
                self.backend.clone(),
                self.backend.scale(k, m),
                self.target_qubits.clone(),
            ),
            TermKind::Symbolic(s) => Term::from_symbolic(
                self.backend.clone(),
                s.scaled(k, self.backend.as_ref()),
                self.target_qubits.clone(),
            ),
        }
    }

    /// Sum of this term and `term` embedded into this term's qubit space.
    ///
    /// `term` acts as identity on the qubits it does not target. The result
    /// keeps this term's qubit order.
    ///
    /// # Errors
    /// `QubitSubsetViolation` if `term` targets a qubit outside this term.
    pub fn merge(&self, term: &Term) -> TermResult<Term> {
        if !term
            .target_qubits
            .iter()
            .all(|q| self.target_qubits.contains(q))
        {
            return Err(TermError::QubitSubsetViolation {
                child: term.target_qubits.clone(),
                parent: self.target_qubits.clone(),
            });
        }
        trace!(
            parent = ?self.target_qubits,
            child = ?term.target_qubits,
            "merging term"
        );

        let backend = self.backend.as_ref();
        let n = self.len();
        let k = term.len();

        // child ⊗ I: the extra qubits become trailing identity axes.
        let widened = backend.kron(term.matrix(), &backend.eye(1 << (n - k)));
        let tensor = backend.reshape(widened.into_dyn(), &vec![2; 2 * n])?;

        let mut order = Vec::with_capacity(2 * n);
        let mut next_identity = k;
        for qubit in &self.target_qubits {
            match term.target_qubits.iter().position(|q| q == qubit) {
                Some(axis) => order.push(axis),
                None => {
                    order.push(next_identity);
                    next_identity += 1;
                }
            }
        }
        let columns: Vec<usize> = order.iter().map(|axis| axis + n).collect();
        order.extend(columns);

        let permuted = backend.transpose(tensor, &order);
        let embedded = backend.to_matrix(backend.reshape(permuted, &[1 << n, 1 << n])?)?;

        Ok(Term::from_matrix(
            self.backend.clone(),
            self.matrix() + &embedded,
            self.target_qubits.clone(),
        ))
    }

    /// Apply the term to a state vector or density matrix.
    ///
    /// Dense terms apply their [`Term::gate`]. Symbolic terms apply each
    /// factor in factor order and then scale by the coefficient.
    pub fn apply(
        &self,
        state: QuantumState,
        applier: &dyn UnitaryApplier,
    ) -> TermResult<QuantumState> {
        match &self.kind {
            TermKind::Dense(_) => self.gate().apply(state, applier),
            TermKind::Symbolic(s) => s.apply(state, applier),
        }
    }
}

impl Mul<Complex64> for &Term {
    type Output = Term;

    fn mul(self, k: Complex64) -> Term {
        self.scaled(k)
    }
}

impl Mul<&Term> for Complex64 {
    type Output = Term;

    fn mul(self, term: &Term) -> Term {
        term.scaled(self)
    }
}

impl Mul<f64> for &Term {
    type Output = Term;

    fn mul(self, k: f64) -> Term {
        self.scaled(Complex64::new(k, 0.0))
    }
}

impl Mul<&Term> for f64 {
    type Output = Term;

    fn mul(self, term: &Term) -> Term {
        term.scaled(Complex64::new(self, 0.0))
    }
}

/// Check qubit ids are non-negative and unique, preserving order.
pub(crate) fn validate_qubits(qubits: &[i64]) -> TermResult<Vec<usize>> {
    let mut out = Vec::with_capacity(qubits.len());
    for &q in qubits {
        let q = usize::try_from(q).map_err(|_| TermError::InvalidQubit(q))?;
        if out.contains(&q) {
            return Err(TermError::DuplicateQubit(q));
        }
        out.push(q);
    }
    Ok(out)
}

pub(crate) fn describe(operand: &Operand) -> String {
    match operand {
        Operand::Scalar(v) => format!("scalar {v}"),
        Operand::Tensor(t) => format!("tensor of shape {:?}", t.shape()),
    }
}
