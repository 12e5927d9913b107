//! # Introduction
//!
//! fxparse is the front end for an HLSL-like shading description language.
//! It reads declarations (structs, global variables with initializers,
//! function signatures with verbatim bodies and `[attributes]`) and builds a
//! typed node arena backed by a symbol table of built-in and user types.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Prelude → Lexer → Token Adapter → Parser → Ast + SymbolTable
//! ```
//!
//! 1. [`parser::builtins`]: the built-in keyword and type set, and the
//!    prelude library of render-state structs prepended to every file.
//! 2. [`parser::lexer`] and [`parser::token`]: tokens with one current
//!    token at a time.
//! 3. [`parser::parse`]: the recursive descent parser. The first error stops
//!    the parse and is handed to a [`DiagnosticSink`].
//! 4. [`parser::module`]: the owned result, with lookups and a text dump.
//!
//! ## Example
//!
//! ```
//! let module = fxparse::parse("demo.fx", "struct Light { float3 dir; };", None).unwrap();
//! assert!(module.find_struct("Light").is_some());
//! ```

pub mod parser;

pub use parser::ast::{Ast, ShaderFile, SourceLocation, Value, ValueKind};
pub use parser::builtins::{BuiltinSet, PRELUDE, PRELUDE_VERSION};
pub use parser::diagnostics::{
    DiagnosticSink, ErrorKind, FnSink, LogSink, ParseError, ParseResult,
};
pub use parser::enums::{EnumResolver, TableEnum};
pub use parser::module::ShaderModule;
pub use parser::parse::{parse, ParserConfig, ShaderParser};
pub use parser::symbols::SymbolTable;
