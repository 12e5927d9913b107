//! Lexer (tokenizer) for shading description source
//!
//! Converts raw source text into [`LexToken`]s on demand. The parser never
//! looks at characters directly; it pulls one token at a time through the
//! [`TokenAdapter`](super::token::TokenAdapter).
//!
//! Operators are not combined: `+=` arrives as `+` followed by `=`. Function
//! bodies are captured verbatim from the source, so only the delimiter
//! characters matter to the grammar.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that diagnostics can report
/// an accurate line, column and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub enum LexToken {
    // Literals, kept as raw source text
    IntLiteral(String, SourceLocation),
    FloatLiteral(String, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers (keywords are resolved by the symbol table, not here)
    Ident(String, SourceLocation),

    // Any other single character, including non-ASCII ones
    Punct(char, SourceLocation),

    // End of input
    Eof(SourceLocation),
}

impl LexToken {
    /// Returns the source location where this token starts.
    pub fn location(&self) -> SourceLocation {
        match self {
            LexToken::IntLiteral(_, loc)
            | LexToken::FloatLiteral(_, loc)
            | LexToken::StringLiteral(_, loc)
            | LexToken::Ident(_, loc)
            | LexToken::Punct(_, loc)
            | LexToken::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for LexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexToken::IntLiteral(s, _) | LexToken::FloatLiteral(s, _) => write!(f, "{}", s),
            LexToken::StringLiteral(s, _) => write!(f, "\"{}\"", s),
            LexToken::Ident(s, _) => write!(f, "{}", s),
            LexToken::Punct(c, _) => write!(f, "{}", c),
            LexToken::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lex error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Pull-based lexer over a borrowed source string.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The full text being tokenized.
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Collects every token up to and including [`LexToken::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<LexToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = matches!(token, LexToken::Eof(_));
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get next token. Returns [`LexToken::Eof`] once the input is exhausted,
    /// and keeps returning it on further calls.
    pub fn next_token(&mut self) -> Result<LexToken, LexError> {
        self.skip_trivia()?;

        let loc = self.current_location();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(LexToken::Eof(loc)),
        };

        match ch {
            '"' => {
                self.advance();
                self.string_literal(loc)
            }
            '0'..='9' => self.number_literal(loc),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(loc)
            }
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier(loc)),
            // Everything else passes through, so bodies can hold any text
            c => {
                self.advance();
                Ok(LexToken::Punct(c, loc))
            }
        }
    }

    /// Parse string literal; the opening quote is already consumed
    fn string_literal(&mut self, loc: SourceLocation) -> Result<LexToken, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance();
                return Ok(LexToken::StringLiteral(string, loc));
            }

            if ch == '\n' {
                break;
            }

            if ch == '\\' {
                self.advance();
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of file in string literal".to_string(),
                    location: self.current_location(),
                })?;

                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    '0' => '\0',
                    _ => {
                        return Err(LexError {
                            message: format!("Unknown escape sequence: \\{}", escaped),
                            location: self.current_location(),
                        });
                    }
                };
                string.push(unescaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal, keeping the raw text (suffixes included)
    fn number_literal(&mut self, loc: SourceLocation) -> Result<LexToken, LexError> {
        let start = self.position;

        if self.peek() == Some('0') && matches!(self.peek_ahead(1), Some('x') | Some('X')) {
            self.advance();
            self.advance();
            let digits = self.eat_while(|c| c.is_ascii_hexdigit());
            if digits == 0 {
                return Err(LexError {
                    message: "Hex literal has no digits".to_string(),
                    location: loc,
                });
            }
            self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            return Ok(LexToken::IntLiteral(self.slice_from(start), loc));
        }

        let mut is_float = false;
        self.eat_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            self.eat_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = usize::from(matches!(self.peek_ahead(1), Some('+') | Some('-')));
            if self.peek_ahead(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..=sign {
                    self.advance();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }

        if is_float {
            if matches!(self.peek(), Some('f' | 'F' | 'h' | 'H' | 'l' | 'L')) {
                self.advance();
            }
            Ok(LexToken::FloatLiteral(self.slice_from(start), loc))
        } else {
            self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            Ok(LexToken::IntLiteral(self.slice_from(start), loc))
        }
    }

    /// Parse identifier
    fn identifier(&mut self, loc: SourceLocation) -> LexToken {
        let start = self.position;
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        LexToken::Ident(self.slice_from(start), loc)
    }

    /// Whitespace, `//` and `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.current_location();
        self.advance();
        self.advance();

        while self.peek().is_some() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start,
        })
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    fn slice_from(&self, start: usize) -> String {
        self.input[start..self.position].to_string()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    /// Consumes one character, tracking line and column.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Where the next token would start.
    pub fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }
}
