//! Initializer value parsing
//!
//! Values are parsed against the type of the declaration (or member) they
//! initialize:
//!
//! - struct types accept `{ ... }` aggregates and `.member = value`
//! - enum types accept their symbols only
//! - any type accepts int, float and string literals
//! - other identifiers must name an earlier file-scope variable of exactly
//!   the same type; the result is that variable's own value node
//!
//! # Grammar
//!
//! ```text
//! value        ::= values | member_value | literal | identifier
//! values       ::= "{" [ element { "," element } ] "}"
//! element      ::= member_value | value
//! member_value ::= "." identifier "=" value
//! ```

use crate::parser::arena::Handle;
use crate::parser::ast::*;
use crate::parser::diagnostics::{ErrorKind, ParseResult};
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

/// Type name whose declarations hold shader-stage function references.
const STAGE_SLOT_TYPE: &str = "void";

impl Parser<'_> {
    /// Parse a value for a declaration of type `ty`. Leaves the token after
    /// the value current.
    pub(crate) fn parse_value(&mut self, ty: Handle<Type>) -> ParseResult<Handle<Value>> {
        if !self.ast.types[ty].members.is_empty() {
            if let Some(values) = self.parse_values(ty)? {
                return Ok(values);
            }
            if let Some(member_value) = self.parse_member_value(ty)? {
                return Ok(member_value);
            }
        }

        self.parse_scalar(ty)
    }

    /// Parse `{ element, ... }`. Returns `None` without consuming anything if
    /// the current token is not `{`.
    ///
    /// A `;` after an element ends the aggregate early and stays current, so
    /// the enclosing declaration sees its terminator.
    pub(crate) fn parse_values(&mut self, ty: Handle<Type>) -> ParseResult<Option<Handle<Value>>> {
        if !self.token().is_char('{') {
            return Ok(None);
        }

        let mut values = Vec::new();
        self.advance()?;
        while !self.token().is_char('}') {
            let value = match self.parse_member_value(ty)? {
                Some(value) => value,
                None => self.parse_positional_value(ty, values.len())?,
            };
            values.push(value);

            if self.token().is_char(';') {
                return Ok(Some(self.ast.values.append(Value::Values(Values { values }))));
            }

            if self.token().is_char(',') {
                self.advance()?;
            } else {
                self.check_char('}')?;
            }
        }
        self.advance()?;

        Ok(Some(self.ast.values.append(Value::Values(Values { values }))))
    }

    /// Parse `.member = value`. Returns `None` without consuming anything if
    /// the current token is not `.`.
    pub(crate) fn parse_member_value(
        &mut self,
        ty: Handle<Type>,
    ) -> ParseResult<Option<Handle<Value>>> {
        if !self.token().is_char('.') {
            return Ok(None);
        }

        self.advance()?;
        let member_name = self.current_identifier()?;

        let Some(member) = self.ast.find_member(ty, &member_name) else {
            return Err(self.error(
                ErrorKind::InvalidMember,
                format!(
                    "'{}': Invalid member. Valid values are:\n{}",
                    member_name,
                    self.member_list(ty)
                ),
            ));
        };

        self.advance()?;
        self.check_char('=')?;

        self.advance()?;
        let member_type = self.ast.declaration_type(member);
        let value = self.parse_value(member_type)?;

        Ok(Some(self.ast.values.append(Value::Member(MemberValue {
            member: member_name,
            value,
        }))))
    }

    /// Element `index` of an aggregate without a member name.
    fn parse_positional_value(
        &mut self,
        ty: Handle<Type>,
        index: usize,
    ) -> ParseResult<Handle<Value>> {
        let Some(&member) = self.ast.types[ty].members.get(index) else {
            return Err(self.error(
                ErrorKind::InvalidMember,
                format!(
                    "'{}': Too many initializers for '{}'. Members are:\n{}",
                    self.token(),
                    self.ast.types[ty].name,
                    self.member_list(ty)
                ),
            ));
        };

        let member_type = self.ast.declaration_type(member);
        self.parse_value(member_type)
    }

    fn parse_scalar(&mut self, ty: Handle<Type>) -> ParseResult<Handle<Value>> {
        let kind = self.token().kind;
        match kind {
            TokenKind::Float | TokenKind::Int | TokenKind::String => {
                let literal = Literal {
                    kind: literal_kind(kind),
                    data: self.token().text.clone(),
                };
                self.advance()?;
                Ok(self.ast.values.append(Value::Literal(literal)))
            }
            TokenKind::Char if self.token().is_char('-') => self.parse_negative_literal(),
            TokenKind::Identifier => self.parse_identifier_value(ty),
            _ => Err(self.unexpected_token()),
        }
    }

    /// `-` directly followed by a numeric literal.
    fn parse_negative_literal(&mut self) -> ParseResult<Handle<Value>> {
        let sign_offset = self.token().location.offset;
        self.advance()?;

        let kind = self.token().kind;
        let adjacent = self.token().location.offset == sign_offset + 1;
        if !matches!(kind, TokenKind::Int | TokenKind::Float) || !adjacent {
            return Err(self.unexpected_token());
        }

        let literal = Literal {
            kind: literal_kind(kind),
            data: format!("-{}", self.token().text),
        };
        self.advance()?;
        Ok(self.ast.values.append(Value::Literal(literal)))
    }

    fn parse_identifier_value(&mut self, ty: Handle<Type>) -> ParseResult<Handle<Value>> {
        let name = self.token().text.clone();

        let enum_type = &self.ast.types[ty];
        if let Some(resolver) = enum_type.enum_resolver() {
            if resolver.value_for_name(&name).is_none() {
                let mut message = format!(
                    "'{}': Invalid value. Expecting enum value for '{}'. Valid values are:\n",
                    name, enum_type.name
                );
                for value in 0..enum_type.max_enum_value() {
                    if let Some(symbol) = resolver.name_for_value(value) {
                        message.push_str(&format!(" - {}\n", symbol));
                    }
                }
                return Err(self.error(ErrorKind::InvalidValue, message));
            }

            self.advance()?;
            return Ok(self.ast.values.append(Value::Literal(Literal {
                kind: ValueKind::Enum,
                data: name,
            })));
        }

        if let Some(variable) = self.find_variable(&name) {
            if self.ast.declaration_type(variable) != ty {
                return Err(self.error(
                    ErrorKind::InvalidType,
                    format!(
                        "'{}': has invalid type. Expecting type '{}'",
                        name, self.ast.types[ty].name
                    ),
                ));
            }

            let Some(value) = self.ast.declarations[variable].value else {
                return Err(self.error(
                    ErrorKind::InvalidValue,
                    format!("'{}': has no value to reference.", name),
                ));
            };

            self.advance()?;
            return Ok(value);
        }

        if self.ast.types[ty].name == STAGE_SLOT_TYPE && self.find_function(&name).is_some() {
            self.advance()?;
            return Ok(self.ast.values.append(Value::Literal(Literal {
                kind: ValueKind::Function,
                data: name,
            })));
        }

        Err(self.error(
            ErrorKind::IdentifierMissing,
            format!("'{}': Identifier missing.", name),
        ))
    }

    fn member_list(&self, ty: Handle<Type>) -> String {
        self.ast.types[ty]
            .members
            .iter()
            .map(|&m| format!(" - {}\n", self.ast.declarations[m].name))
            .collect()
    }
}

fn literal_kind(kind: TokenKind) -> ValueKind {
    match kind {
        TokenKind::Float => ValueKind::Float,
        TokenKind::String => ValueKind::String,
        _ => ValueKind::Int,
    }
}
