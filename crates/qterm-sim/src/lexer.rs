//! Lexer for Hamiltonian expressions.

use logos::Logos;

/// Tokens of a Hamiltonian expression such as `-1.0*Z0*Z1 + 0.5*I*X2^2`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// The imaginary unit.
    #[token("I", priority = 3)]
    ImaginaryUnit,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntLiteral(i64),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("^")]
    #[token("**")]
    Power,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::ImaginaryUnit => write!(f, "I"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Power => write!(f, "^"),
        }
    }
}

/// A token with its byte span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Tokenize an expression.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(Result::ok)
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_monomial_tokens() {
        assert_eq!(
            tokens("-0.5*X0"),
            vec![
                Token::Minus,
                Token::FloatLiteral(0.5),
                Token::Star,
                Token::Identifier("X0".into()),
            ]
        );
    }

    #[test]
    fn test_imaginary_unit_is_not_an_identifier() {
        assert_eq!(tokens("I"), vec![Token::ImaginaryUnit]);
        assert_eq!(tokens("Ix"), vec![Token::Identifier("Ix".into())]);
    }

    #[test]
    fn test_power_spellings() {
        assert_eq!(tokens("Z1^2")[1], Token::Power);
        assert_eq!(tokens("Z1**2")[1], Token::Power);
        assert_eq!(tokens("Z1**2")[2], Token::IntLiteral(2));
    }

    #[test]
    fn test_invalid_character() {
        let results = tokenize("X0 $ Z1");
        assert!(results.iter().any(|r| matches!(r, Err((span, _)) if span.start == 3)));
    }
}
