// AST (Abstract Syntax Tree) definitions for shading description files

use super::arena::{Arena, Generation, Handle};
use super::enums::EnumResolver;
use std::fmt;
use std::sync::Arc;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    /// Byte offset into the parsed text (prelude included).
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Reserved storage-class keyword (`static`, `uniform`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageClass {
    pub name: String,
}

/// Reserved type modifier keyword (`const`, `row_major`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
}

/// What a [`Type`] stands for
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Scalar, vector and matrix types
    Base,
    /// Shader resource views (`Texture2D`, `StructuredBuffer`, ...)
    ReadOnlyResource,
    /// Unordered access views (`RWTexture2D`, ...)
    ReadWriteResource,
    Enum(Arc<dyn EnumResolver>),
    Struct,
}

/// A named type: built-in, enum, or user struct
#[derive(Debug, Clone)]
pub struct Type {
    pub name: String,
    /// Byte size; `None` for structs, resources and enums.
    pub size: Option<u32>,
    /// Members in declaration order (structs only).
    pub members: Vec<Handle<Declaration>>,
    pub kind: TypeKind,
}

impl Type {
    pub fn new(name: impl Into<String>, size: Option<u32>, kind: TypeKind) -> Self {
        Type {
            name: name.into(),
            size,
            members: Vec::new(),
            kind,
        }
    }

    pub fn enum_resolver(&self) -> Option<&dyn EnumResolver> {
        match &self.kind {
            TypeKind::Enum(resolver) => Some(resolver.as_ref()),
            _ => None,
        }
    }

    /// One past the largest enum value, or 0 for non-enum types.
    pub fn max_enum_value(&self) -> i32 {
        self.enum_resolver().map_or(0, |r| r.max_value())
    }
}

/// A concrete type reference: `modifiers Type < modifiers Inner >`
#[derive(Debug, Clone)]
pub struct TypeIdent {
    pub base_modifiers: Vec<Handle<Modifier>>,
    pub base_type: Handle<Type>,
    pub template_modifiers: Vec<Handle<Modifier>>,
    pub template_type: Option<Handle<Type>>,
}

/// `[Name(params...)]` annotation
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    /// Literal parameters as raw text (strings unescaped).
    pub parameters: Vec<String>,
    pub location: SourceLocation,
}

/// A variable, struct member, parameter or function
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub storage_classes: Vec<Handle<StorageClass>>,
    pub type_ident: Handle<TypeIdent>,
    pub semantic: Option<String>,
    pub value: Option<Handle<Value>>,
    pub is_function: bool,
    pub parameters: Vec<Handle<Declaration>>,
    /// Verbatim text between a function's outer braces.
    pub body: Option<String>,
    pub attributes: Vec<Handle<Attribute>>,
    pub location: SourceLocation,
}

/// User struct declaration
#[derive(Debug, Clone)]
pub struct Struct {
    pub name: String,
    pub ty: Handle<Type>,
    pub attributes: Vec<Handle<Attribute>>,
    pub location: SourceLocation,
}

/// Tag of a scalar [`Literal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Int,
    String,
    Enum,
    /// Name of a previously declared function bound to a shader stage slot.
    Function,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::String => "string",
            ValueKind::Enum => "enum",
            ValueKind::Function => "function",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: ValueKind,
    /// Raw token text.
    pub data: String,
}

/// `{ v1, v2, ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    pub values: Vec<Handle<Value>>,
}

/// `.member = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberValue {
    pub member: String,
    pub value: Handle<Value>,
}

/// Initializer values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal(Literal),
    Values(Values),
    Member(MemberValue),
}

/// Parse root
#[derive(Debug, Clone, Default)]
pub struct ShaderFile {
    pub structs: Vec<Handle<Struct>>,
    pub functions: Vec<Handle<Declaration>>,
    pub variables: Vec<Handle<Declaration>>,
}

/// Owns every node created during one parse.
#[derive(Debug, Clone)]
pub struct Ast {
    pub storage_classes: Arena<StorageClass>,
    pub modifiers: Arena<Modifier>,
    pub types: Arena<Type>,
    pub type_idents: Arena<TypeIdent>,
    pub attributes: Arena<Attribute>,
    pub declarations: Arena<Declaration>,
    pub structs: Arena<Struct>,
    pub values: Arena<Value>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        let generation = Generation::fresh();
        Ast {
            storage_classes: Arena::new(generation),
            modifiers: Arena::new(generation),
            types: Arena::new(generation),
            type_idents: Arena::new(generation),
            attributes: Arena::new(generation),
            declarations: Arena::new(generation),
            structs: Arena::new(generation),
            values: Arena::new(generation),
        }
    }

    /// Resolved base type of a declaration.
    pub fn declaration_type(&self, decl: Handle<Declaration>) -> Handle<Type> {
        self.type_idents[self.declarations[decl].type_ident].base_type
    }

    /// Member of `ty` named `name`.
    pub fn find_member(&self, ty: Handle<Type>, name: &str) -> Option<Handle<Declaration>> {
        self.types[ty]
            .members
            .iter()
            .copied()
            .find(|&m| self.declarations[m].name == name)
    }

    pub fn has_attribute(&self, attributes: &[Handle<Attribute>], name: &str) -> bool {
        attributes.iter().any(|&a| self.attributes[a].name == name)
    }
}
