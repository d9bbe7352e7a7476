//! Terms built from a product of symbols.
//!
//! The matrix of a symbolic term is assembled per qubit: all local matrices
//! acting on one qubit are chained with ordinary matrix products (in order
//! of occurrence), then the per-qubit results are combined with Kronecker
//! products in ascending qubit order and scaled by the coefficient.
//!
//! Applying the term to a state follows factor order instead, one factor
//! gate at a time. The two orders differ when non-commuting factors act on
//! the same qubit, and both are kept as they are.
//!
//! # Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use qterm_core::{Factor, Symbol, SymbolicTerm};
//!
//! // 2 · X0 · Z1
//! let term = SymbolicTerm::from_factors(
//!     Complex64::new(2.0, 0.0),
//!     &[Factor::from(Symbol::x(0)), Factor::from(Symbol::z(1))],
//! )
//! .unwrap();
//! assert_eq!(term.target_qubits(), &[0, 1]);
//! assert_eq!(term.matrix().dim(), (4, 4));
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use num_complex::Complex64;
use tracing::trace;

use crate::backend::{BackendRef, Matrix, NumericBackend, Operand, default_backend};
use crate::error::{TermError, TermResult};
use crate::gate::{QuantumState, Unitary, UnitaryApplier};
use crate::symbol::{Factor, Symbol};
use crate::term::{Term, describe, validate_qubits};

/// Largest exponent expanded into repeated operator occurrences.
pub const MAX_OPERATOR_POWER: usize = 1 << 12;

/// One symbol occurrence kept for application in factor order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicFactor {
    name: String,
    gate: Unitary,
}

impl SymbolicFactor {
    /// Symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qubit the factor acts on.
    pub fn qubit(&self) -> usize {
        self.gate.targets()[0]
    }

    /// Single-qubit gate of this factor.
    pub fn gate(&self) -> &Unitary {
        &self.gate
    }
}

/// Coefficient, factors and per-qubit matrices of a term built from symbols.
#[derive(Debug, Clone)]
pub struct SymbolicTerm {
    coefficient: Complex64,
    factors: Vec<SymbolicFactor>,
    qubit_to_factor_matrices: BTreeMap<usize, Vec<Matrix>>,
    matrix: OnceLock<Matrix>,
}

impl SymbolicTerm {
    /// Build a term from a coefficient and an ordered factor list.
    ///
    /// Powers expand into repeated occurrences, the imaginary unit and
    /// scalar-valued symbols fold into the coefficient.
    ///
    /// # Errors
    /// `UnparsableFactor` for opaque factors, non-positive exponents and
    /// exponents that overflow `u32` (scalar symbols) or exceed
    /// [`MAX_OPERATOR_POWER`] (operator symbols),
    /// `InvalidQubit` for negative symbol qubits, `InvalidType` for symbol
    /// values that are neither scalars nor square matrices, and
    /// `DimensionMismatch` for symbol matrices that are not 2x2.
    pub fn from_factors(coefficient: impl Into<Complex64>, factors: &[Factor]) -> TermResult<Term> {
        Self::from_factors_with_backend(default_backend(), coefficient, factors)
    }

    /// [`SymbolicTerm::from_factors`] with an explicit backend.
    pub fn from_factors_with_backend(
        backend: BackendRef,
        coefficient: impl Into<Complex64>,
        factors: &[Factor],
    ) -> TermResult<Term> {
        let mut coefficient = coefficient.into();
        let mut occurrences = Vec::new();
        let mut qubit_to_factor_matrices: BTreeMap<usize, Vec<Matrix>> = BTreeMap::new();

        for factor in factors {
            let (symbol, power) = classify(factor)?;
            let Some(symbol) = symbol else {
                coefficient *= Complex64::i();
                continue;
            };

            let matrix = match symbol.matrix() {
                Operand::Scalar(value) => {
                    let power = u32::try_from(power)
                        .map_err(|_| TermError::UnparsableFactor(factor.to_string()))?;
                    coefficient *= value.powu(power);
                    continue;
                }
                value if !backend.is_tensor(value) => {
                    return Err(TermError::InvalidType(describe(value)));
                }
                Operand::Tensor(tensor) => backend.to_matrix(tensor.clone())?,
            };
            if matrix.nrows() != 2 {
                return Err(TermError::DimensionMismatch {
                    dim: matrix.nrows(),
                    n_qubits: 1,
                });
            }
            if power > MAX_OPERATOR_POWER {
                return Err(TermError::UnparsableFactor(factor.to_string()));
            }
            let qubit = validate_qubits(&[symbol.target_qubit()])?[0];

            for _ in 0..power {
                occurrences.push(SymbolicFactor {
                    name: symbol.name().to_string(),
                    gate: Unitary::new(matrix.clone(), vec![qubit]),
                });
            }
            qubit_to_factor_matrices
                .entry(qubit)
                .or_default()
                .extend(std::iter::repeat_n(matrix, power));
        }

        let target_qubits: Vec<usize> = qubit_to_factor_matrices.keys().copied().collect();
        trace!(
            %coefficient,
            n_factors = occurrences.len(),
            qubits = ?target_qubits,
            "built symbolic term"
        );

        let symbolic = SymbolicTerm {
            coefficient,
            factors: occurrences,
            qubit_to_factor_matrices,
            matrix: OnceLock::new(),
        };
        Ok(Term::from_symbolic(backend, symbolic, target_qubits))
    }

    /// Complex coefficient after folding numbers, `i` and scalar symbols.
    pub fn coefficient(&self) -> Complex64 {
        self.coefficient
    }

    /// Symbol occurrences in factor order, powers expanded.
    pub fn factors(&self) -> &[SymbolicFactor] {
        &self.factors
    }

    /// Per-qubit local matrices in order of occurrence.
    pub fn qubit_to_factor_matrices(&self) -> &BTreeMap<usize, Vec<Matrix>> {
        &self.qubit_to_factor_matrices
    }

    pub(crate) fn matrix(&self, backend: &dyn NumericBackend) -> &Matrix {
        self.matrix.get_or_init(|| self.build_matrix(backend))
    }

    fn build_matrix(&self, backend: &dyn NumericBackend) -> Matrix {
        let mut matrix = Matrix::from_elem((1, 1), self.coefficient);
        for matrices in self.qubit_to_factor_matrices.values() {
            let Some((first, rest)) = matrices.split_first() else {
                continue;
            };
            let local = rest
                .iter()
                .fold(first.clone(), |acc, m| backend.matmul(&acc, m));
            matrix = backend.kron(&matrix, &local);
        }
        matrix
    }

    /// Copy scaled by `k`; the copy's matrix is exactly `k` times this one.
    pub(crate) fn scaled(&self, k: Complex64, backend: &dyn NumericBackend) -> SymbolicTerm {
        SymbolicTerm {
            coefficient: self.coefficient * k,
            factors: self.factors.clone(),
            qubit_to_factor_matrices: self.qubit_to_factor_matrices.clone(),
            matrix: OnceLock::from(backend.scale(k, self.matrix(backend))),
        }
    }

    pub(crate) fn apply(
        &self,
        state: QuantumState,
        applier: &dyn UnitaryApplier,
    ) -> TermResult<QuantumState> {
        let mut state = state;
        for factor in &self.factors {
            state = factor.gate.apply(state, applier)?;
        }
        Ok(state.scaled(self.coefficient))
    }
}

/// Split a factor into its symbol and repetition count; `None` is `i`.
fn classify(factor: &Factor) -> TermResult<(Option<&Symbol>, usize)> {
    match factor {
        Factor::Symbol(symbol) => Ok((Some(symbol), 1)),
        Factor::SymbolPower { symbol, exponent } if *exponent >= 1 => {
            let power = usize::try_from(*exponent)
                .map_err(|_| TermError::UnparsableFactor(factor.to_string()))?;
            Ok((Some(symbol), power))
        }
        Factor::ImaginaryUnit => Ok((None, 1)),
        Factor::SymbolPower { .. } | Factor::Opaque(_) => {
            Err(TermError::UnparsableFactor(factor.to_string()))
        }
    }
}
