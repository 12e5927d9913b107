//! Shading description parser
//!
//! This module turns shading description text into a node arena plus a
//! symbol table:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`token`]: Current-token adapter over the lexer
//! - [`parse`]: Parser driver, configuration and file-level grammar
//! - [`ast`]: Node definitions, stored in [`arena`]s
//! - [`symbols`]: Names of keywords and types
//! - [`builtins`]: Built-in keywords, types and the prelude library
//! - [`enums`]: Enum types and their value tables
//! - [`diagnostics`]: Error kinds, parse errors and sinks
//! - [`module`]: Owned parse result and queries
//!
//! # Supported Language
//!
//! Only the declaration layer of an HLSL-like language is understood:
//! - Structs with attributed members
//! - Global variables with storage classes, modifiers, template types,
//!   semantics and initializer values
//! - Functions: parameters and semantic are parsed, bodies are kept as text
//! - `[attribute(args)]` annotations on any of the above
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, fail-fast on the first error.
//! No external parser generator dependencies.

pub mod arena;
pub mod ast;
pub mod builtins;
mod declarations;
pub mod diagnostics;
pub mod display;
pub mod enums;
pub mod lexer;
pub mod module;
pub mod parse;
pub mod symbols;
pub mod token;
mod values;
