//! Name/value resolvers for enum-typed declarations
//!
//! An enum type in the symbol table carries an [`EnumResolver`]. The value
//! parser uses it to accept symbols, and diagnostics use the reverse lookup
//! to list every valid symbol in declared order.

use std::fmt;

/// Bidirectional mapping between enum symbol names and their values.
///
/// Implementations must be consistent: every name accepted by
/// [`value_for_name`](Self::value_for_name) must come back from
/// [`name_for_value`](Self::name_for_value), and every value in
/// `0..max_value()` must have a name.
pub trait EnumResolver: fmt::Debug + Send + Sync {
    fn value_for_name(&self, name: &str) -> Option<i32>;
    fn name_for_value(&self, value: i32) -> Option<&'static str>;
    /// One past the largest valid value.
    fn max_value(&self) -> i32;

    /// All symbol names, in value order.
    fn names(&self) -> Vec<&'static str> {
        (0..self.max_value())
            .filter_map(|v| self.name_for_value(v))
            .collect()
    }
}

/// Resolver over a fixed, ordered list of names. Value `i` is `names[i]`.
#[derive(Debug, Clone, Copy)]
pub struct TableEnum {
    names: &'static [&'static str],
}

impl TableEnum {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }
}

impl EnumResolver for TableEnum {
    fn value_for_name(&self, name: &str) -> Option<i32> {
        self.names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| i32::try_from(i).ok())
    }

    fn name_for_value(&self, value: i32) -> Option<&'static str> {
        usize::try_from(value)
            .ok()
            .and_then(|i| self.names.get(i))
            .copied()
    }

    fn max_value(&self) -> i32 {
        i32::try_from(self.names.len()).unwrap_or(i32::MAX)
    }
}

pub static ADDRESSING_MODE: TableEnum = TableEnum::new(&["WRAP", "MIRROR", "CLAMP", "BORDER"]);

pub static FILTERING_MODE: TableEnum = TableEnum::new(&["NEAREST", "LINEAR"]);

pub static FILL_MODE: TableEnum = TableEnum::new(&["SOLID", "WIREFRAME"]);

pub static CULL_MODE: TableEnum = TableEnum::new(&["NONE", "CCW", "CW"]);

pub static BLEND_TYPE: TableEnum = TableEnum::new(&[
    "ZERO",
    "ONE",
    "SRC_COLOR",
    "INV_SRC_COLOR",
    "SRC_ALPHA",
    "INV_SRC_ALPHA",
    "DEST_COLOR",
    "INV_DEST_COLOR",
    "DEST_ALPHA",
    "INV_DEST_ALPHA",
]);

pub static BLEND_FUNC: TableEnum =
    TableEnum::new(&["ADD", "SUBTRACT", "REV_SUBTRACT", "MINIMUM", "MAXIMUM"]);

pub static COMPARE_MODE: TableEnum = TableEnum::new(&[
    "NEVER",
    "LESS",
    "EQUAL",
    "LESS_EQUAL",
    "GREATER",
    "NOT_EQUAL",
    "GREATER_EQUAL",
    "ALWAYS",
]);

pub static STENCIL_FUNC: TableEnum = TableEnum::new(&[
    "KEEP", "ZERO", "REPLACE", "INCR_SAT", "DECR_SAT", "INVERT", "INCR", "DECR",
]);
