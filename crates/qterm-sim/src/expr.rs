//! Expression front end for symbolic Hamiltonians.
//!
//! Turns text such as `"-1.0*Z0*Z1 - 0.5*X0 + 2*I*Y1^2"` into a list of
//! [`Monomial`]s, each an explicit coefficient plus an ordered factor list
//! for [`qterm_core::SymbolicTerm::from_factors`].
//!
//! Grammar:
//!
//! ```text
//! expr     := sign? monomial (('+' | '-') monomial)*
//! monomial := factor ('*' factor)*
//! factor   := number | 'I' ('^' int)? | ident ('^' '-'? int)?
//! ```
//!
//! Numbers fold into the coefficient. `I` stays an imaginary-unit factor so
//! the engine folds it. Identifiers resolve through a [`SymbolTable`]: the
//! built-in Pauli symbols `X<n>`, `Y<n>`, `Z<n>` plus any user symbols.

use num_complex::Complex64;
use qterm_core::{Factor, Operand, Pauli, Symbol};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// One product term: `coefficient · factors[0] · factors[1] · …`.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    /// Numeric prefactor, sign included.
    pub coefficient: Complex64,
    /// Factors in order of occurrence.
    pub factors: Vec<Factor>,
}

impl Monomial {
    /// Create a monomial.
    pub fn new(coefficient: impl Into<Complex64>, factors: Vec<Factor>) -> Self {
        Self {
            coefficient: coefficient.into(),
            factors,
        }
    }
}

/// Name resolution for expression identifiers.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    /// Table with only the built-in Pauli symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as a symbol on `qubit` with local value `value`.
    ///
    /// User symbols shadow built-in Pauli names.
    pub fn insert(&mut self, name: impl Into<String>, qubit: i64, value: impl Into<Operand>) {
        let name = name.into();
        let symbol = Symbol::new(name.clone(), qubit, value);
        self.symbols.insert(name, symbol);
    }

    /// Builder form of [`SymbolTable::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, qubit: i64, value: impl Into<Operand>) -> Self {
        self.insert(name, qubit, value);
        self
    }

    /// Resolve an identifier.
    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.symbols.get(name) {
            return Some(symbol.clone());
        }
        let mut chars = name.chars();
        let op = match chars.next()? {
            'X' => Pauli::X,
            'Y' => Pauli::Y,
            'Z' => Pauli::Z,
            _ => return None,
        };
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok().map(|q| Symbol::pauli(op, q))
    }

    /// Number of user symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if no user symbols are registered.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Parse an expression into monomials.
pub fn parse_expression(source: &str, table: &SymbolTable) -> SimResult<Vec<Monomial>> {
    let mut parser = Parser::new(source, table)?;
    let monomials = parser.parse_sum()?;
    trace!(n_monomials = monomials.len(), "parsed Hamiltonian expression");
    Ok(monomials)
}

struct Parser<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    end: usize,
    table: &'a SymbolTable,
}

impl<'a> Parser<'a> {
    fn new(source: &str, table: &'a SymbolTable) -> SimResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(SimError::Parse {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            end: source.len(),
            table,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span.start)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn error(&self, message: impl Into<String>) -> SimError {
        SimError::Parse {
            position: self.position(),
            message: message.into(),
        }
    }

    fn parse_sum(&mut self) -> SimResult<Vec<Monomial>> {
        if self.peek().is_none() {
            return Err(self.error("empty expression"));
        }
        let mut monomials = Vec::new();
        let mut sign = match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                -1.0
            }
            Some(Token::Plus) => {
                self.advance();
                1.0
            }
            _ => 1.0,
        };
        loop {
            let mut monomial = self.parse_monomial()?;
            monomial.coefficient *= sign;
            monomials.push(monomial);

            sign = match self.advance() {
                None => return Ok(monomials),
                Some(Token::Plus) => 1.0,
                Some(Token::Minus) => -1.0,
                Some(other) => {
                    self.pos -= 1;
                    return Err(self.error(format!("expected '+' or '-', found '{other}'")));
                }
            };
        }
    }

    fn parse_monomial(&mut self) -> SimResult<Monomial> {
        let mut monomial = Monomial::new(1.0, Vec::new());
        self.parse_factor(&mut monomial)?;
        while matches!(self.peek(), Some(Token::Star)) {
            self.advance();
            self.parse_factor(&mut monomial)?;
        }
        Ok(monomial)
    }

    fn parse_factor(&mut self, monomial: &mut Monomial) -> SimResult<()> {
        let position = self.position();
        match self.advance() {
            Some(Token::FloatLiteral(v)) => monomial.coefficient *= v,
            Some(Token::IntLiteral(v)) => monomial.coefficient *= v as f64,
            Some(Token::ImaginaryUnit) => {
                let exponent = self.parse_exponent()?.unwrap_or(1);
                if exponent < 0 {
                    return Err(SimError::Parse {
                        position,
                        message: "negative power of I".into(),
                    });
                }
                for _ in 0..exponent {
                    monomial.factors.push(Factor::ImaginaryUnit);
                }
            }
            Some(Token::Identifier(name)) => {
                let symbol = self
                    .table
                    .resolve(&name)
                    .ok_or(SimError::UnknownSymbol(name))?;
                let factor = match self.parse_exponent()? {
                    Some(exponent) => Factor::power(symbol, exponent),
                    None => Factor::Symbol(symbol),
                };
                monomial.factors.push(factor);
            }
            Some(other) => {
                return Err(SimError::Parse {
                    position,
                    message: format!("expected a factor, found '{other}'"),
                });
            }
            None => return Err(self.error("expected a factor, found end of input")),
        }
        Ok(())
    }

    fn parse_exponent(&mut self) -> SimResult<Option<i64>> {
        if !matches!(self.peek(), Some(Token::Power)) {
            return Ok(None);
        }
        self.advance();
        let negative = matches!(self.peek(), Some(Token::Minus));
        if negative {
            self.advance();
        }
        match self.peek() {
            Some(&Token::IntLiteral(v)) => {
                self.advance();
                Ok(Some(if negative { -v } else { v }))
            }
            _ => Err(self.error("exponent must be an integer")),
        }
    }
}
