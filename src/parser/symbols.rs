//! Symbol/type table
//!
//! Maps names to storage classes, modifiers and types. The table is an
//! explicit value owned by one parse; it is seeded from a [`BuiltinSet`] and
//! grows only when a struct finishes parsing. There is no removal.

use super::arena::Handle;
use super::ast::{Ast, Modifier, StorageClass, Type, TypeKind};
use super::builtins::BuiltinSet;
use rustc_hash::{FxHashMap, FxHashSet};

/// What a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    StorageClass(Handle<StorageClass>),
    Modifier(Handle<Modifier>),
    Type(Handle<Type>),
}

/// Category of a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    StorageClass,
    Modifier,
    BaseType,
    EnumType,
    StructType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub symbol: Symbol,
    pub kind: SymbolKind,
}

impl SymbolEntry {
    pub fn as_type(&self) -> Option<Handle<Type>> {
        match self.symbol {
            Symbol::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: FxHashMap<String, SymbolEntry>,
    reserved: FxHashSet<String>,
}

impl SymbolTable {
    /// An empty table with nothing reserved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `builtins`, allocating the keyword and type nodes
    /// in `ast`. Storage classes and modifiers are also reserved words.
    pub fn with_builtins(ast: &mut Ast, builtins: &BuiltinSet) -> Self {
        let mut table = Self::new();

        for &name in &builtins.storage_classes {
            let handle = ast.storage_classes.append(StorageClass {
                name: name.to_string(),
            });
            table.seed(name, Symbol::StorageClass(handle), SymbolKind::StorageClass);
            table.reserve(name);
        }

        for &name in &builtins.modifiers {
            let handle = ast.modifiers.append(Modifier {
                name: name.to_string(),
            });
            table.seed(name, Symbol::Modifier(handle), SymbolKind::Modifier);
            table.reserve(name);
        }

        for &(name, size) in &builtins.base_types {
            let handle = ast.types.append(Type::new(name, Some(size), TypeKind::Base));
            table.seed(name, Symbol::Type(handle), SymbolKind::BaseType);
        }

        for &name in &builtins.read_only_resources {
            let handle = ast
                .types
                .append(Type::new(name, None, TypeKind::ReadOnlyResource));
            table.seed(name, Symbol::Type(handle), SymbolKind::BaseType);
        }

        for &name in &builtins.read_write_resources {
            let handle = ast
                .types
                .append(Type::new(name, None, TypeKind::ReadWriteResource));
            table.seed(name, Symbol::Type(handle), SymbolKind::BaseType);
        }

        for (name, resolver) in &builtins.enums {
            let handle = ast
                .types
                .append(Type::new(*name, None, TypeKind::Enum(resolver.clone())));
            table.seed(name, Symbol::Type(handle), SymbolKind::EnumType);
        }

        table
    }

    // Built-in lists are trusted; a later duplicate simply shadows.
    fn seed(&mut self, name: &str, symbol: Symbol, kind: SymbolKind) {
        if self.register(name, symbol, kind).is_err() {
            log::warn!("built-in '{}' declared more than once", name);
            self.entries
                .insert(name.to_string(), SymbolEntry { symbol, kind });
        }
    }

    /// Adds `name`. If the name is already known the table is left untouched
    /// and the existing entry is returned.
    pub fn register(
        &mut self,
        name: &str,
        symbol: Symbol,
        kind: SymbolKind,
    ) -> Result<(), SymbolEntry> {
        if let Some(existing) = self.entries.get(name) {
            return Err(*existing);
        }
        log::trace!("registered {:?} '{}'", kind, name);
        self.entries
            .insert(name.to_string(), SymbolEntry { symbol, kind });
        Ok(())
    }

    /// Marks `name` as unusable for identifiers, type names, members and
    /// semantics.
    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_string());
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolEntry> {
        self.entries.get(name).copied()
    }

    pub fn lookup_type(&self, name: &str) -> Option<Handle<Type>> {
        self.lookup(name).and_then(|e| e.as_type())
    }

    pub fn lookup_storage_class(&self, name: &str) -> Option<Handle<StorageClass>> {
        match self.lookup(name)?.symbol {
            Symbol::StorageClass(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn lookup_modifier(&self, name: &str) -> Option<Handle<Modifier>> {
        match self.lookup(name)?.symbol {
            Symbol::Modifier(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> (Ast, SymbolTable) {
        let mut ast = Ast::new();
        let table = SymbolTable::with_builtins(&mut ast, &BuiltinSet::standard());
        (ast, table)
    }

    #[test]
    fn test_builtin_kinds() {
        let (ast, table) = standard();

        assert_eq!(table.lookup("static").map(|e| e.kind), Some(SymbolKind::StorageClass));
        assert_eq!(table.lookup("row_major").map(|e| e.kind), Some(SymbolKind::Modifier));
        assert_eq!(table.lookup("float4").map(|e| e.kind), Some(SymbolKind::BaseType));
        assert_eq!(table.lookup("CullMode").map(|e| e.kind), Some(SymbolKind::EnumType));
        assert_eq!(table.lookup("SamplerState"), None);

        let float4x4 = table.lookup_type("float4x4").expect("float4x4 is built in");
        assert_eq!(ast.types[float4x4].size, Some(64));
        let texture = table.lookup_type("Texture2D").expect("Texture2D is built in");
        assert!(matches!(ast.types[texture].kind, TypeKind::ReadOnlyResource));
        let rw = table.lookup_type("RWBuffer").expect("RWBuffer is built in");
        assert!(matches!(ast.types[rw].kind, TypeKind::ReadWriteResource));
    }

    #[test]
    fn test_reserved_words() {
        let (_, table) = standard();

        assert!(table.is_reserved("uniform"));
        assert!(table.is_reserved("const"));
        assert!(!table.is_reserved("float"));
        assert!(!table.is_reserved("CullMode"));
    }

    #[test]
    fn test_register_keeps_first_entry() {
        let (mut ast, mut table) = standard();
        let original = table.lookup("float").expect("float is built in");
        let other = ast.types.append(Type::new("float", Some(8), TypeKind::Struct));

        let err = table
            .register("float", Symbol::Type(other), SymbolKind::StructType)
            .unwrap_err();

        assert_eq!(err, original);
        assert_eq!(table.lookup("float"), Some(original));
    }

    #[test]
    fn test_register_grows_table() {
        let (mut ast, mut table) = standard();
        let before = table.len();
        let light = ast.types.append(Type::new("Light", None, TypeKind::Struct));

        table
            .register("Light", Symbol::Type(light), SymbolKind::StructType)
            .unwrap();

        assert_eq!(table.len(), before + 1);
        assert_eq!(table.lookup_type("Light"), Some(light));
    }

    #[test]
    fn test_empty_builtins() {
        let mut ast = Ast::new();
        let table = SymbolTable::with_builtins(&mut ast, &BuiltinSet::empty());
        assert!(table.is_empty());
        assert!(ast.types.is_empty());
    }
}
