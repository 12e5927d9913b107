//! Token adapter
//!
//! Pulls tokens from the [`Lexer`] one at a time and reduces them to the six
//! classes the grammar cares about. The adapter holds exactly one current
//! token; [`TokenAdapter::next`] overwrites it.

use super::ast::SourceLocation;
use super::lexer::{LexError, LexToken, Lexer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// Single punctuation character
    Char,
    Identifier,
    Int,
    Float,
    String,
    #[default]
    Eof,
}

/// The current token: class, text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text for literals and identifiers, the character itself for
    /// punctuation, unescaped contents for strings, empty at end of input.
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn is_char(&self, c: char) -> bool {
        self.kind == TokenKind::Char && self.text.starts_with(c)
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Int | TokenKind::Float | TokenKind::String
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "{}", self.text),
        }
    }
}

impl From<LexToken> for Token {
    fn from(token: LexToken) -> Self {
        let location = token.location();
        let (kind, text) = match token {
            LexToken::IntLiteral(s, _) => (TokenKind::Int, s),
            LexToken::FloatLiteral(s, _) => (TokenKind::Float, s),
            LexToken::StringLiteral(s, _) => (TokenKind::String, s),
            LexToken::Ident(s, _) => (TokenKind::Identifier, s),
            LexToken::Punct(c, _) => (TokenKind::Char, c.to_string()),
            LexToken::Eof(_) => (TokenKind::Eof, String::new()),
        };
        Token {
            kind,
            text,
            location,
        }
    }
}

pub struct TokenAdapter<'a> {
    lexer: Lexer<'a>,
    token: Token,
}

impl<'a> TokenAdapter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            token: Token::default(),
        }
    }

    /// Advances to the next token. Returns `Ok(false)` at end of input,
    /// leaving an empty [`TokenKind::Eof`] token located at the end.
    pub fn next(&mut self) -> Result<bool, LexError> {
        self.token = self.lexer.next_token()?.into();
        Ok(self.token.kind != TokenKind::Eof)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn source(&self) -> &'a str {
        self.lexer.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let mut tokens = TokenAdapter::new("[Name(1, 2.0, \"s\")]");
        let mut seen = Vec::new();
        while tokens.next().unwrap() {
            seen.push((tokens.token().kind, tokens.token().text.clone()));
        }

        assert_eq!(
            seen,
            vec![
                (TokenKind::Char, "[".to_string()),
                (TokenKind::Identifier, "Name".to_string()),
                (TokenKind::Char, "(".to_string()),
                (TokenKind::Int, "1".to_string()),
                (TokenKind::Char, ",".to_string()),
                (TokenKind::Float, "2.0".to_string()),
                (TokenKind::Char, ",".to_string()),
                (TokenKind::String, "s".to_string()),
                (TokenKind::Char, ")".to_string()),
                (TokenKind::Char, "]".to_string()),
            ]
        );
    }

    #[test]
    fn test_eof_resets_token() {
        let mut tokens = TokenAdapter::new("x");
        assert!(tokens.next().unwrap());
        assert!(tokens.token().is_identifier());
        assert!(!tokens.next().unwrap());
        assert_eq!(tokens.token().kind, TokenKind::Eof);
        assert!(tokens.token().text.is_empty());
        assert!(!tokens.next().unwrap());
    }
}
