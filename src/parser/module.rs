//! Owned parse result with lookups

use crate::parser::arena::Handle;
use crate::parser::ast::*;
use crate::parser::builtins::{INTERNAL_ATTRIBUTE, TECHNIQUE_STAGES, TECHNIQUE_STRUCT};
use crate::parser::display;
use crate::parser::symbols::SymbolTable;

/// Everything one successful parse produced: the node arena, the symbol
/// table it filled and the file root.
#[derive(Debug, Clone)]
pub struct ShaderModule {
    ast: Ast,
    symbols: SymbolTable,
    file: ShaderFile,
}

impl ShaderModule {
    pub fn new(ast: Ast, symbols: SymbolTable, file: ShaderFile) -> Self {
        ShaderModule { ast, symbols, file }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn file(&self) -> &ShaderFile {
        &self.file
    }

    pub fn find_struct(&self, name: &str) -> Option<Handle<Struct>> {
        self.file
            .structs
            .iter()
            .copied()
            .find(|&s| self.ast.structs[s].name == name)
    }

    pub fn find_function(&self, name: &str) -> Option<Handle<Declaration>> {
        self.file
            .functions
            .iter()
            .copied()
            .find(|&f| self.ast.declarations[f].name == name)
    }

    pub fn find_variable(&self, name: &str) -> Option<Handle<Declaration>> {
        self.file
            .variables
            .iter()
            .copied()
            .find(|&v| self.ast.declarations[v].name == name)
    }

    /// Structs declared by the caller (prelude structs carry `[internal]`).
    pub fn user_structs(&self) -> impl Iterator<Item = Handle<Struct>> + '_ {
        self.file.structs.iter().copied().filter(|&s| {
            !self
                .ast
                .has_attribute(&self.ast.structs[s].attributes, INTERNAL_ATTRIBUTE)
        })
    }

    /// `(stage, function)` pairs bound in a `Technique` variable, in the
    /// order they were written. Empty if `variable` is not a technique or has
    /// no value.
    pub fn technique_stages(&self, variable: Handle<Declaration>) -> Vec<(String, String)> {
        let ty = self.ast.declaration_type(variable);
        if self.ast.types[ty].name != TECHNIQUE_STRUCT {
            return Vec::new();
        }
        let Some(value) = self.ast.declarations[variable].value else {
            return Vec::new();
        };

        let elements = match &self.ast.values[value] {
            Value::Values(values) => values.values.clone(),
            Value::Member(_) => vec![value],
            Value::Literal(_) => return Vec::new(),
        };

        let members = &self.ast.types[ty].members;
        let mut stages = Vec::new();
        for (index, element) in elements.into_iter().enumerate() {
            let (member, bound) = match &self.ast.values[element] {
                Value::Member(m) => (m.member.clone(), m.value),
                _ => match members.get(index) {
                    Some(&m) => (self.ast.declarations[m].name.clone(), element),
                    None => continue,
                },
            };
            if !TECHNIQUE_STAGES.contains(&member.as_str()) {
                continue;
            }
            if let Value::Literal(literal) = &self.ast.values[bound] {
                if literal.kind == ValueKind::Function {
                    stages.push((member, literal.data.clone()));
                }
            }
        }
        stages
    }

    /// Text listing of structs, functions and variables.
    pub fn dump(&self) -> String {
        display::dump_module(self)
    }
}
