//! Symbols and the explicit factor-list input of symbolic terms.
//!
//! An expression front end (see the `qterm-sim` expression adapter) turns
//! source text into an ordered `Vec<Factor>`; the engine only ever sees that
//! list.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::backend::{Matrix, Operand};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl Pauli {
    /// Name used in symbol labels.
    pub fn name(self) -> &'static str {
        match self {
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    /// The 2x2 matrix of this operator.
    pub fn matrix(self) -> Matrix {
        let o = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let entries = match self {
            Pauli::X => [o, one, one, o],
            Pauli::Y => [o, -i, i, o],
            Pauli::Z => [one, o, o, -one],
        };
        Matrix::from_shape_fn((2, 2), |(r, c)| entries[2 * r + c])
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An elementary symbol bound to one qubit and one local value.
///
/// The qubit id is kept signed so that invalid ids coming from a front end
/// are reported by the engine instead of being silently wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    name: String,
    target_qubit: i64,
    matrix: Operand,
}

impl Symbol {
    /// Create a symbol.
    pub fn new(name: impl Into<String>, target_qubit: i64, matrix: impl Into<Operand>) -> Self {
        Self {
            name: name.into(),
            target_qubit,
            matrix: matrix.into(),
        }
    }

    /// Pauli symbol such as `X3`.
    pub fn pauli(op: Pauli, qubit: i64) -> Self {
        Self::new(format!("{op}{qubit}"), qubit, op.matrix())
    }

    /// Shorthand for `Symbol::pauli(Pauli::X, q)`.
    pub fn x(qubit: i64) -> Self {
        Self::pauli(Pauli::X, qubit)
    }

    /// Shorthand for `Symbol::pauli(Pauli::Y, q)`.
    pub fn y(qubit: i64) -> Self {
        Self::pauli(Pauli::Y, qubit)
    }

    /// Shorthand for `Symbol::pauli(Pauli::Z, q)`.
    pub fn z(qubit: i64) -> Self {
        Self::pauli(Pauli::Z, qubit)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qubit the symbol acts on.
    pub fn target_qubit(&self) -> i64 {
        self.target_qubit
    }

    /// Local value: a 2x2 matrix or a plain scalar.
    pub fn matrix(&self) -> &Operand {
        &self.matrix
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One multiplicative factor of a monomial, in order of occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    /// A plain symbol occurrence.
    Symbol(Symbol),
    /// `symbol^exponent`; the exponent must be a positive integer.
    SymbolPower {
        /// Base symbol.
        symbol: Symbol,
        /// Repetition count.
        exponent: i64,
    },
    /// The imaginary unit `i`.
    ImaginaryUnit,
    /// Anything a front end could not classify, kept verbatim.
    Opaque(String),
}

impl Factor {
    /// `symbol^exponent`.
    pub fn power(symbol: Symbol, exponent: i64) -> Self {
        Factor::SymbolPower { symbol, exponent }
    }
}

impl From<Symbol> for Factor {
    fn from(symbol: Symbol) -> Self {
        Factor::Symbol(symbol)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Symbol(s) => write!(f, "{s}"),
            Factor::SymbolPower { symbol, exponent } => write!(f, "{symbol}^{exponent}"),
            Factor::ImaginaryUnit => f.write_str("I"),
            Factor::Opaque(text) => f.write_str(text),
        }
    }
}
