//! Main parser coordinator
//!
//! This module provides the public [`ShaderParser`], the crate-internal
//! [`Parser`] state, its token helpers and the file-level grammar.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, the file loop and attributes
//! - `declarations`: type references, declarations, structs, function bodies
//! - `values`: initializer values
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! The parser always holds one current token. Rules start on their first
//! token and leave the token after their last one current, except where a
//! rule ends on a terminator it does not own (`;`, `]`, the closing brace of
//! a function body), which stays current for the caller to check.

use crate::parser::arena::Handle;
use crate::parser::ast::*;
use crate::parser::builtins::{self, BuiltinSet};
use crate::parser::diagnostics::{
    line_at, DiagnosticSink, ErrorKind, LogSink, ParseError, ParseResult,
};
use crate::parser::module::ShaderModule;
use crate::parser::symbols::SymbolTable;
use crate::parser::token::{Token, TokenAdapter, TokenKind};

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Prepend the built-in prelude (sampler, blend, render state and
    /// technique structs) to the source.
    pub include_prelude: bool,
    /// Keywords and types the symbol table starts with.
    pub builtins: BuiltinSet,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            include_prelude: true,
            builtins: BuiltinSet::standard(),
        }
    }
}

/// Parses shading description files.
///
/// Each call to [`parse`](Self::parse) starts from a fresh arena and symbol
/// table; the nodes of the previous parse are dropped together. After a
/// failed parse, [`ast`](Self::ast) and [`symbols`](Self::symbols) still show
/// whatever had been built before the error.
#[derive(Debug)]
pub struct ShaderParser {
    config: ParserConfig,
    ast: Ast,
    symbols: SymbolTable,
    root: ShaderFile,
}

impl Default for ShaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let mut ast = Ast::new();
        let symbols = SymbolTable::with_builtins(&mut ast, &config.builtins);
        ShaderParser {
            config,
            ast,
            symbols,
            root: ShaderFile::default(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `source` (after the prelude, if enabled). The first error is
    /// handed to `sink`, or to [`LogSink`] when no sink is given, and then
    /// returned.
    pub fn parse(
        &mut self,
        file: &str,
        source: &str,
        sink: Option<&mut dyn DiagnosticSink>,
    ) -> ParseResult<ShaderFile> {
        self.ast = Ast::new();
        self.symbols = SymbolTable::with_builtins(&mut self.ast, &self.config.builtins);
        self.root = ShaderFile::default();

        let include_prelude = self.config.include_prelude;
        let text = builtins::patch_source(source, include_prelude);
        let prelude_lines = if include_prelude {
            builtins::prelude_line_count()
        } else {
            0
        };

        log::debug!(
            "parsing '{}' ({} bytes, prelude: {})",
            file,
            source.len(),
            include_prelude
        );

        let result = Parser::new(file, &text, &mut self.ast, &mut self.symbols, prelude_lines)
            .parse_shader_file();

        match result {
            Ok(root) => {
                log::debug!(
                    "parsed '{}': {} structs, {} functions, {} variables, {} symbols",
                    file,
                    root.structs.len(),
                    root.functions.len(),
                    root.variables.len(),
                    self.symbols.len()
                );
                self.root = root.clone();
                Ok(root)
            }
            Err(err) => {
                match sink {
                    Some(sink) => sink.report(&err),
                    None => LogSink.report(&err),
                }
                Err(err)
            }
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Root of the last successful parse (empty otherwise).
    pub fn root(&self) -> &ShaderFile {
        &self.root
    }

    pub fn into_module(self) -> ShaderModule {
        ShaderModule::new(self.ast, self.symbols, self.root)
    }
}

/// Parses one file with the default configuration.
pub fn parse(
    file: &str,
    source: &str,
    sink: Option<&mut dyn DiagnosticSink>,
) -> ParseResult<ShaderModule> {
    let mut parser = ShaderParser::new();
    parser.parse(file, source, sink)?;
    Ok(parser.into_module())
}

/// State of one parse
pub(crate) struct Parser<'a> {
    pub(crate) file: &'a str,
    pub(crate) tokens: TokenAdapter<'a>,
    pub(crate) ast: &'a mut Ast,
    pub(crate) symbols: &'a mut SymbolTable,
    pub(crate) shader_file: ShaderFile,
    /// Attributes waiting for the next struct, declaration or member.
    pub(crate) pending_attributes: Vec<Handle<Attribute>>,
    pub(crate) prelude_lines: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        file: &'a str,
        source: &'a str,
        ast: &'a mut Ast,
        symbols: &'a mut SymbolTable,
        prelude_lines: usize,
    ) -> Self {
        Self {
            file,
            tokens: TokenAdapter::new(source),
            ast,
            symbols,
            shader_file: ShaderFile::default(),
            pending_attributes: Vec::new(),
            prelude_lines,
        }
    }

    /// Parse the whole file: `{ attribute | struct | declaration }*`
    pub(crate) fn parse_shader_file(mut self) -> ParseResult<ShaderFile> {
        while self.next_token()? {
            let kind = self.token().kind;
            match kind {
                TokenKind::Char if self.token().is_char('[') => {
                    let attribute = self.parse_attribute()?;
                    self.pending_attributes.push(attribute);
                }
                TokenKind::Char if self.token().is_char(';') => {}
                TokenKind::Identifier if self.token().text == "struct" => {
                    let node = self.parse_struct()?;
                    self.shader_file.structs.push(node);
                }
                TokenKind::Identifier => {
                    let decl = self.parse_declaration()?;
                    if self.ast.declarations[decl].is_function {
                        // Prototypes end with ;
                        if self.ast.declarations[decl].body.is_none() {
                            self.check_char(';')?;
                        }
                        self.shader_file.functions.push(decl);
                    } else {
                        // Trailing ;
                        self.check_char(';')?;
                        self.shader_file.variables.push(decl);
                    }
                }
                _ => return Err(self.unexpected_token()),
            }
        }

        if !self.pending_attributes.is_empty() {
            log::warn!(
                "{}: {} attribute(s) at end of file are not attached to anything",
                self.file,
                self.pending_attributes.len()
            );
        }

        Ok(self.shader_file)
    }

    /// Parse `[Name]` or `[Name(literal, ...)]`. Leaves `]` current.
    pub(crate) fn parse_attribute(&mut self) -> ParseResult<Handle<Attribute>> {
        let location = self.token().location;
        self.check_char('[')?;

        self.advance()?;
        let name = self.current_identifier()?;

        let mut parameters = Vec::new();
        self.advance()?;
        if self.token().is_char('(') {
            self.advance()?;
            while !self.token().is_char(')') {
                if !self.token().is_literal() {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        format!(
                            "'{}': Unexpected token. Should be uint, int, float or string value.",
                            self.token()
                        ),
                    ));
                }
                parameters.push(self.token().text.clone());
                self.advance()?;

                if self.token().is_char(',') {
                    self.advance()?;
                }
            }
            self.advance()?;
        }
        self.check_char(']')?;

        Ok(self.ast.attributes.append(Attribute {
            name,
            parameters,
            location,
        }))
    }

    // ===== Helper methods =====

    pub(crate) fn token(&self) -> &Token {
        self.tokens.token()
    }

    /// Moves to the next token; `Ok(false)` at end of input.
    pub(crate) fn next_token(&mut self) -> ParseResult<bool> {
        self.tokens.next().map_err(|e| {
            self.error_at(ErrorKind::UnexpectedToken, e.location, e.message)
        })
    }

    /// Moves to the next token, which must exist.
    pub(crate) fn advance(&mut self) -> ParseResult<()> {
        if self.next_token()? {
            Ok(())
        } else {
            Err(self.error(ErrorKind::UnexpectedEof, "Unexpected EOF"))
        }
    }

    /// Requires the current token to be the punctuation `expected`, without
    /// consuming it.
    pub(crate) fn check_char(&self, expected: char) -> ParseResult<()> {
        let token = self.token();
        if token.is_char(expected) {
            return Ok(());
        }
        if token.kind == TokenKind::Eof {
            return Err(self.error(ErrorKind::UnexpectedEof, "Unexpected EOF"));
        }
        Err(self.error(
            ErrorKind::UnexpectedToken,
            format!("'{}': Unexpected token. Did you mean '{}'?", token, expected),
        ))
    }

    /// Requires the current token to be an identifier and returns its text,
    /// without consuming it.
    pub(crate) fn current_identifier(&self) -> ParseResult<String> {
        if self.token().is_identifier() {
            Ok(self.token().text.clone())
        } else {
            Err(self.unexpected_token())
        }
    }

    /// Fails with RESERVED_KEYWORD if `name` is reserved. `expected` names
    /// what should have been there instead.
    pub(crate) fn check_not_reserved(&self, name: &str, expected: Option<&str>) -> ParseResult<()> {
        if !self.symbols.is_reserved(name) {
            return Ok(());
        }
        let message = match expected {
            Some(what) => format!("'{}': is a reserved keyword. {} expected.", name, what),
            None => format!("'{}': is a reserved keyword.", name),
        };
        Err(self.error(ErrorKind::ReservedKeyword, message))
    }

    pub(crate) fn unexpected_token(&self) -> ParseError {
        if self.token().kind == TokenKind::Eof {
            return self.error(ErrorKind::UnexpectedEof, "Unexpected EOF");
        }
        self.error(
            ErrorKind::UnexpectedToken,
            format!("'{}': Unexpected token.", self.token()),
        )
    }

    /// Error located at the current token.
    pub(crate) fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        self.error_at(kind, self.token().location, message)
    }

    pub(crate) fn error_at(
        &self,
        kind: ErrorKind,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError {
            kind,
            file: self.file.to_string(),
            location,
            line_text: line_at(self.tokens.source(), location.offset).to_string(),
            message: message.into(),
            prelude_lines: self.prelude_lines,
        }
    }

    pub(crate) fn find_variable(&self, name: &str) -> Option<Handle<Declaration>> {
        self.shader_file
            .variables
            .iter()
            .copied()
            .find(|&v| self.ast.declarations[v].name == name)
    }

    pub(crate) fn find_function(&self, name: &str) -> Option<Handle<Declaration>> {
        self.shader_file
            .functions
            .iter()
            .copied()
            .find(|&f| self.ast.declarations[f].name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bare(source: &str) -> ParseResult<(ShaderParser, ShaderFile)> {
        let mut parser = ShaderParser::with_config(ParserConfig {
            include_prelude: false,
            ..ParserConfig::default()
        });
        let mut sink: Vec<ParseError> = Vec::new();
        let root = parser.parse("unit.fx", source, Some(&mut sink))?;
        Ok((parser, root))
    }

    #[test]
    fn test_parse_attributes() {
        let (parser, root) =
            parse_bare("[numthreads(8, 8, 1)] [entry] void main() {}").unwrap();

        assert_eq!(root.functions.len(), 1);
        let main = &parser.ast().declarations[root.functions[0]];
        assert_eq!(main.attributes.len(), 2);

        let numthreads = &parser.ast().attributes[main.attributes[0]];
        assert_eq!(numthreads.name, "numthreads");
        assert_eq!(numthreads.parameters, vec!["8", "8", "1"]);
        assert!(parser.ast().attributes[main.attributes[1]].parameters.is_empty());
    }

    #[test]
    fn test_attribute_rejects_identifiers() {
        let err = parse_bare("[Name(x)] void main() {}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_stray_semicolon_is_ignored() {
        let (_, root) = parse_bare("; uint x; ;").unwrap();
        assert_eq!(root.variables.len(), 1);
    }

    #[test]
    fn test_literal_at_file_scope() {
        let err = parse_bare("42").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert_eq!(err.location.line, 1);
    }

    #[test]
    fn test_lex_error_is_unexpected_token() {
        let err = parse_bare("uint x = \"open;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_bare("uint x uint y;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert!(err.message.contains("Did you mean ';'"));
    }

    #[test]
    fn test_prototype_needs_semicolon() {
        let err = parse_bare("float helper(float x) uint y;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_reparse_starts_fresh() {
        let mut parser = ShaderParser::new();
        parser.parse("a.fx", "struct A { uint x; };", None).unwrap();
        parser.parse("b.fx", "struct A { uint y; };", None).unwrap();

        let a = parser.symbols().lookup_type("A").unwrap();
        let member = parser.ast().types[a].members[0];
        assert_eq!(parser.ast().declarations[member].name, "y");
    }
}
