//! Error kinds, parse errors and diagnostic sinks
//!
//! Every grammar rule returns [`ParseResult`]. The first error aborts the
//! parse; the driver hands it to a [`DiagnosticSink`] once and returns it to
//! the caller. Errors carry the source line so a sink can draw a caret
//! without access to the text.

use super::ast::SourceLocation;
use std::fmt;

/// Diagnostic categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedToken,
    UnexpectedEof,
    ReservedKeyword,
    TypeMissing,
    TypeRedefinition,
    InvalidValue,
    InvalidType,
    IdentifierMissing,
    InvalidMember,
    UnmatchedParenthesis,
    UnmatchedBracket,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnexpectedToken => "UNEXPECTED_TOKEN",
            ErrorKind::UnexpectedEof => "UNEXPECTED_EOF",
            ErrorKind::ReservedKeyword => "RESERVED_KEYWORD",
            ErrorKind::TypeMissing => "TYPE_MISSING",
            ErrorKind::TypeRedefinition => "TYPE_REDEFINITION",
            ErrorKind::InvalidValue => "INVALID_VALUE",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::IdentifierMissing => "IDENTIFIER_MISSING",
            ErrorKind::InvalidMember => "INVALID_MEMBER",
            ErrorKind::UnmatchedParenthesis => "UNMATCHED_PARENTHESIS",
            ErrorKind::UnmatchedBracket => "UNMATCHED_BRACKET",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}({}-{}): error: {kind}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub file: String,
    /// Position in the parsed text; lines include the prelude.
    pub location: SourceLocation,
    /// The full source line containing `location`, without its newline.
    pub line_text: String,
    pub message: String,
    /// Lines the prelude added ahead of the caller's text.
    pub prelude_lines: usize,
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Line number in the caller's own text, or `None` if the error lies in
    /// the prelude.
    pub fn user_line(&self) -> Option<usize> {
        self.location
            .line
            .checked_sub(self.prelude_lines)
            .filter(|&line| line > 0)
    }

    /// Caret line pointing at `location.column` under `line_text`.
    pub fn caret(&self) -> String {
        caret_line(&self.line_text, self.location.column)
    }

    /// Header, offending line and caret.
    pub fn render(&self) -> String {
        format!("{}\n{}\n{}", self, self.line_text, self.caret())
    }
}

/// Caret under `column` of `line_text`. Tabs in the source line are kept so
/// the caret lines up in a terminal.
pub fn caret_line(line_text: &str, column: usize) -> String {
    let mut caret: String = line_text
        .chars()
        .take(column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    caret.push('^');
    caret
}

/// Caret report built from raw diagnostic fields, in the same layout as
/// [`ParseError::render`].
pub fn render_report(
    kind: ErrorKind,
    file: &str,
    line: usize,
    column: usize,
    line_text: &str,
    message: &str,
) -> String {
    format!(
        "{}({}-{}): error: {}: {}\n{}\n{}",
        file,
        line,
        column,
        kind,
        message,
        line_text,
        caret_line(line_text, column)
    )
}

/// Full text of the line containing byte `offset`.
pub(crate) fn line_at(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    source[start..end].trim_end_matches('\r')
}

/// Receives parse errors as they are raised.
///
/// Called synchronously on the parsing thread; implementations must not
/// block. The parser calls [`report`](Self::report) with the full error.
/// `on_error` is the raw path: it only sees the line as counted in the
/// parsed text, so errors rebuilt from it have `prelude_lines == 0` and
/// [`ParseError::user_line`] returns that line unchanged.
pub trait DiagnosticSink {
    fn on_error(
        &mut self,
        kind: ErrorKind,
        file: &str,
        line: usize,
        column: usize,
        line_text: &str,
        message: &str,
    );

    fn report(&mut self, error: &ParseError) {
        self.on_error(
            error.kind,
            &error.file,
            error.location.line,
            error.location.column,
            &error.line_text,
            &error.message,
        );
    }
}

/// Default sink: writes the caret report through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn on_error(
        &mut self,
        kind: ErrorKind,
        file: &str,
        line: usize,
        column: usize,
        line_text: &str,
        message: &str,
    ) {
        log::error!(
            "{}",
            render_report(kind, file, line, column, line_text, message)
        );
    }

    fn report(&mut self, error: &ParseError) {
        log::error!("{}", error.render());
    }
}

/// Collects every reported error.
impl DiagnosticSink for Vec<ParseError> {
    fn on_error(
        &mut self,
        kind: ErrorKind,
        file: &str,
        line: usize,
        column: usize,
        line_text: &str,
        message: &str,
    ) {
        self.push(ParseError {
            kind,
            file: file.to_string(),
            location: SourceLocation::new(line, column, 0),
            line_text: line_text.to_string(),
            message: message.to_string(),
            prelude_lines: 0,
        });
    }

    fn report(&mut self, error: &ParseError) {
        self.push(error.clone());
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&ParseError)> DiagnosticSink for FnSink<F> {
    fn on_error(
        &mut self,
        kind: ErrorKind,
        file: &str,
        line: usize,
        column: usize,
        line_text: &str,
        message: &str,
    ) {
        (self.0)(&ParseError {
            kind,
            file: file.to_string(),
            location: SourceLocation::new(line, column, 0),
            line_text: line_text.to_string(),
            message: message.to_string(),
            prelude_lines: 0,
        });
    }

    fn report(&mut self, error: &ParseError) {
        (self.0)(error);
    }
}
