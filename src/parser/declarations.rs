//! Declaration parsing implementation
//!
//! This module handles the declaration half of the grammar:
//!
//! - Storage classes and modifiers: reserved keyword leaves
//! - Type references: `const float4`, `StructuredBuffer<Particle>`
//! - Declarations: variables, members, parameters and functions
//! - Struct definitions: `struct Name { members };`
//! - Function bodies: captured verbatim, not parsed
//!
//! # Grammar
//!
//! ```text
//! struct_def  ::= "struct" identifier [ "{" { attribute* declaration ";" } "}" ] ";"
//! declaration ::= storage_class* type_ident identifier
//!                 [ "(" [ declaration { "," declaration } ] ")" ]
//!                 [ ":" semantic ] [ "=" value ] [ body ]
//! type_ident  ::= modifier* type [ "<" modifier* type ">" ]
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::arena::Handle;
use crate::parser::ast::*;
use crate::parser::diagnostics::{ErrorKind, ParseResult};
use crate::parser::parse::Parser;
use crate::parser::symbols::{Symbol, SymbolKind};
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// Consume a storage-class keyword if one is current.
    pub(crate) fn parse_storage_class(&mut self) -> ParseResult<Option<Handle<StorageClass>>> {
        if !self.token().is_identifier() {
            return Ok(None);
        }
        match self.symbols.lookup_storage_class(&self.token().text) {
            Some(handle) => {
                self.advance()?;
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Consume a modifier keyword if one is current.
    pub(crate) fn parse_modifier(&mut self) -> ParseResult<Option<Handle<Modifier>>> {
        if !self.token().is_identifier() {
            return Ok(None);
        }
        match self.symbols.lookup_modifier(&self.token().text) {
            Some(handle) => {
                self.advance()?;
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Resolve the current identifier as a known type. Does not consume it.
    pub(crate) fn parse_type(&mut self) -> ParseResult<Handle<Type>> {
        let name = self.current_identifier()?;
        self.check_not_reserved(&name, Some("Type"))?;

        self.symbols.lookup_type(&name).ok_or_else(|| {
            self.error(ErrorKind::TypeMissing, format!("'{}': type missing", name))
        })
    }

    /// Parse type reference: modifier* type [< modifier* type >]
    pub(crate) fn parse_type_ident(&mut self) -> ParseResult<Handle<TypeIdent>> {
        let mut base_modifiers = Vec::new();
        while let Some(modifier) = self.parse_modifier()? {
            base_modifiers.push(modifier);
        }

        let base_type = self.parse_type()?;

        let mut template_modifiers = Vec::new();
        let mut template_type = None;

        self.advance()?;
        if self.token().is_char('<') {
            self.advance()?;
            while let Some(modifier) = self.parse_modifier()? {
                template_modifiers.push(modifier);
            }
            template_type = Some(self.parse_type()?);

            self.advance()?;
            self.check_char('>')?;
            self.advance()?;
        }

        Ok(self.ast.type_idents.append(TypeIdent {
            base_modifiers,
            base_type,
            template_modifiers,
            template_type,
        }))
    }

    /// Parse struct definition: struct Name [{ members }];
    ///
    /// The type is registered only once the whole definition, including the
    /// trailing `;`, has parsed. Leaves the `;` current.
    pub(crate) fn parse_struct(&mut self) -> ParseResult<Handle<Struct>> {
        let location = self.token().location;

        self.advance()?;
        let name = self.current_identifier()?;
        self.check_not_reserved(&name, Some("Type"))?;

        if self.symbols.lookup_type(&name).is_some() {
            return Err(self.error(
                ErrorKind::TypeRedefinition,
                format!("'{}': 'struct' type redefinition.", name),
            ));
        }

        let ty = self.ast.types.append(Type::new(&name, None, TypeKind::Struct));
        let attributes = std::mem::take(&mut self.pending_attributes);

        self.advance()?;
        if self.token().is_char('{') {
            self.advance()?;
            while !self.token().is_char('}') {
                while self.token().is_char('[') {
                    let attribute = self.parse_attribute()?;
                    self.advance()?;
                    self.pending_attributes.push(attribute);
                }

                self.current_identifier()?;
                let member = self.parse_declaration()?;

                // Trailing ;
                self.check_char(';')?;
                self.ast.types[ty].members.push(member);

                self.advance()?;
            }
            self.advance()?;
        } else if !self.token().is_char(';') {
            self.check_char('{')?;
        }

        self.check_char(';')?;

        if let Err(existing) = self.symbols.register(&name, Symbol::Type(ty), SymbolKind::StructType)
        {
            // Keywords are reserved and types were checked above; only a
            // hand-built table can get here.
            return Err(self.error(
                ErrorKind::TypeRedefinition,
                format!("'{}': already declared as {:?}.", name, existing.kind),
            ));
        }
        log::debug!(
            "registered struct '{}' with {} member(s)",
            name,
            self.ast.types[ty].members.len()
        );

        Ok(self.ast.structs.append(Struct {
            name,
            ty,
            attributes,
            location,
        }))
    }

    /// Parse a variable, member, parameter or function declaration.
    ///
    /// Variables leave the token after their last part current (normally `;`,
    /// `,` or `)`); functions with a body leave the closing `}` current.
    pub(crate) fn parse_declaration(&mut self) -> ParseResult<Handle<Declaration>> {
        let mut storage_classes = Vec::new();
        while let Some(storage_class) = self.parse_storage_class()? {
            storage_classes.push(storage_class);
        }

        let type_ident = self.parse_type_ident()?;

        let name = self.current_identifier()?;
        let location = self.token().location;
        self.check_not_reserved(&name, None)?;

        let attributes = std::mem::take(&mut self.pending_attributes);

        let mut decl = Declaration {
            name,
            storage_classes,
            type_ident,
            semantic: None,
            value: None,
            is_function: false,
            parameters: Vec::new(),
            body: None,
            attributes,
            location,
        };

        // Check for params/semantic/assignment/end.
        self.advance()?;
        if self.token().is_char('(') {
            decl.is_function = true;

            self.advance()?;
            while !self.token().is_char(')') {
                self.current_identifier()?;
                let parameter = self.parse_declaration()?;
                decl.parameters.push(parameter);

                if self.token().is_char(',') {
                    self.advance()?;
                } else {
                    self.check_char(')')?;
                }
            }

            self.advance()?;
        }

        if self.token().is_char(':') {
            self.advance()?;
            let semantic = self.current_identifier()?;
            self.check_not_reserved(&semantic, Some("Semantic"))?;
            decl.semantic = Some(semantic);

            self.advance()?;
        }

        if self.token().is_char('=') {
            self.advance()?;
            let base_type = self.ast.type_idents[type_ident].base_type;
            decl.value = Some(self.parse_value(base_type)?);
        }

        if decl.is_function && self.token().is_char('{') {
            decl.body = Some(self.capture_body()?);
        }

        Ok(self.ast.declarations.append(decl))
    }

    /// Capture a function body verbatim. The current token is the opening
    /// `{`; on return the matching `}` is current.
    ///
    /// Braces, parentheses and brackets are counted independently. A closer
    /// without an opener is fatal as soon as it is seen, and the body must
    /// not close while a parenthesis or bracket is still open.
    pub(crate) fn capture_body(&mut self) -> ParseResult<String> {
        let start = self.token().location.offset + 1;
        let mut end = start;

        let mut scope_level = 1i32;
        let mut paren_level = 0i32;
        let mut bracket_level = 0i32;

        while scope_level > 0 {
            self.advance()?;

            let token = self.token();
            if token.kind == TokenKind::Char {
                match token.text.as_str() {
                    "{" => scope_level += 1,
                    "}" => {
                        scope_level -= 1;
                        end = token.location.offset;
                    }
                    "(" => paren_level += 1,
                    ")" => paren_level -= 1,
                    "[" => bracket_level += 1,
                    "]" => bracket_level -= 1,
                    _ => {}
                }
            }

            if paren_level < 0 {
                return Err(self.error(
                    ErrorKind::UnmatchedParenthesis,
                    format!("'{}': Unmatched parenthesis.", self.token()),
                ));
            }
            if bracket_level < 0 {
                return Err(self.error(
                    ErrorKind::UnmatchedBracket,
                    format!("'{}': Unmatched bracket.", self.token()),
                ));
            }
        }

        if paren_level > 0 {
            return Err(self.error(
                ErrorKind::UnmatchedParenthesis,
                format!("'{}': Missing ')'.", self.token()),
            ));
        }
        if bracket_level > 0 {
            return Err(self.error(
                ErrorKind::UnmatchedBracket,
                format!("'{}': Missing ']'.", self.token()),
            ));
        }

        Ok(self.tokens.source()[start..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::diagnostics::{ErrorKind, ParseError};
    use crate::parser::parse::{ParserConfig, ShaderParser};

    fn parse_bare(source: &str) -> Result<ShaderParser, ParseError> {
        let mut parser = ShaderParser::with_config(ParserConfig {
            include_prelude: false,
            ..ParserConfig::default()
        });
        let mut sink: Vec<ParseError> = Vec::new();
        parser.parse("unit.fx", source, Some(&mut sink))?;
        Ok(parser)
    }

    #[test]
    fn test_type_ident_with_template() {
        let parser = parse_bare("struct P { float3 pos; }; RWStructuredBuffer<const P> particles;")
            .unwrap();
        let ast = parser.ast();
        let var = parser.root().variables[0];
        let ident = &ast.type_idents[ast.declarations[var].type_ident];

        assert_eq!(ast.types[ident.base_type].name, "RWStructuredBuffer");
        assert_eq!(ident.template_modifiers.len(), 1);
        assert_eq!(ast.modifiers[ident.template_modifiers[0]].name, "const");
        let inner = ident.template_type.expect("template type");
        assert_eq!(ast.types[inner].name, "P");
    }

    #[test]
    fn test_storage_classes_and_modifiers() {
        let parser = parse_bare("static const row_major float4x4 world;").unwrap();
        let ast = parser.ast();
        let decl = &ast.declarations[parser.root().variables[0]];

        assert_eq!(decl.storage_classes.len(), 1);
        assert_eq!(ast.storage_classes[decl.storage_classes[0]].name, "static");
        let modifiers: Vec<_> = ast.type_idents[decl.type_ident]
            .base_modifiers
            .iter()
            .map(|&m| ast.modifiers[m].name.as_str())
            .collect();
        assert_eq!(modifiers, vec!["const", "row_major"]);
    }

    #[test]
    fn test_function_with_parameters_and_semantic() {
        let parser = parse_bare(
            "float4 main(float4 pos : SV_Position, uint id : SV_InstanceID) : SV_Target { return pos; }",
        )
        .unwrap();
        let ast = parser.ast();
        let main = &ast.declarations[parser.root().functions[0]];

        assert!(main.is_function);
        assert_eq!(main.semantic.as_deref(), Some("SV_Target"));
        assert_eq!(main.parameters.len(), 2);
        assert_eq!(ast.declarations[main.parameters[1]].name, "id");
        assert_eq!(
            ast.declarations[main.parameters[1]].semantic.as_deref(),
            Some("SV_InstanceID")
        );
        assert_eq!(main.body.as_deref(), Some(" return pos; "));
    }

    #[test]
    fn test_function_prototype() {
        let parser = parse_bare("float helper(float x);").unwrap();
        let decl = &parser.ast().declarations[parser.root().functions[0]];
        assert!(decl.is_function);
        assert!(decl.body.is_none());
    }

    #[test]
    fn test_unknown_type() {
        let err = parse_bare("flaot x;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMissing);
        assert_eq!(err.message, "'flaot': type missing");
    }

    #[test]
    fn test_reserved_semantic() {
        let err = parse_bare("float x : uniform;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReservedKeyword);
        assert!(err.message.contains("Semantic expected"));
    }

    #[test]
    fn test_reserved_struct_name() {
        let err = parse_bare("struct static { uint x; };").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReservedKeyword);
    }

    #[test]
    fn test_forward_declared_struct() {
        let parser = parse_bare("struct Empty;").unwrap();
        let ty = parser.symbols().lookup_type("Empty").expect("registered");
        assert!(parser.ast().types[ty].members.is_empty());
    }

    #[test]
    fn test_struct_cannot_contain_itself() {
        let err = parse_bare("struct Node { Node next; };").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMissing);
    }

    #[test]
    fn test_unmatched_bracket() {
        let err = parse_bare("void f() { ] }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnmatchedBracket);

        let err = parse_bare("void f() { [ }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnmatchedBracket);
    }

    #[test]
    fn test_unterminated_body() {
        let err = parse_bare("void f() { { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_body_ignores_delimiters_in_strings() {
        let parser = parse_bare("void f() { g(\")\"); }").unwrap();
        let f = &parser.ast().declarations[parser.root().functions[0]];
        assert_eq!(f.body.as_deref(), Some(" g(\")\"); "));
    }
}
