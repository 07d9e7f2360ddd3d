//! Global symbols and name bindings.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::{ErrorTag, Function, IntKind, Integer, Label, Operand, Ssa, TypeId};

/// The value held by a symbol or an evaluation stack slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Nil,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Function(Function),
    Error(ErrorTag),
}

impl Value {
    pub fn as_integer(&self) -> Option<Integer> {
        Some(match *self {
            Value::U8(v) => v.into(),
            Value::U16(v) => v.into(),
            Value::U32(v) => v.into(),
            Value::U64(v) => v.into(),
            Value::I8(v) => v.into(),
            Value::I16(v) => v.into(),
            Value::I32(v) => v.into(),
            Value::I64(v) => v.into(),
            _ => return None,
        })
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The literal operand for an integer value.
    pub fn to_operand(&self) -> Option<Operand> {
        match self {
            Value::Error(tag) => Some(Operand::Error(*tag)),
            other => other.as_integer().map(Operand::from),
        }
    }
}

impl From<Integer> for Value {
    fn from(integer: Integer) -> Self {
        let v = integer.value();
        match integer.kind() {
            IntKind::U8 => Value::U8(v as u8),
            IntKind::U16 => Value::U16(v as u16),
            IntKind::U32 => Value::U32(v as u32),
            IntKind::U64 => Value::U64(v as u64),
            IntKind::I8 => Value::I8(v as i8),
            IntKind::I16 => Value::I16(v as i16),
            IntKind::I32 => Value::I32(v as i32),
            IntKind::I64 => Value::I64(v as i64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Function(function) => write!(f, "fn[{} locals]", function.local_count()),
            Value::Error(tag) => write!(f, "{tag}"),
            other => match other.as_integer() {
                Some(integer) => write!(f, "{integer}"),
                None => f.write_str("?"),
            },
        }
    }
}

/// A named, typed entry of the global symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Label,
    pub ty: TypeId,
    pub value: Value,
}

/// Global name to symbol map.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<Label, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, returning the one it replaces.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.symbols.insert(symbol.name, symbol)
    }

    pub fn get(&self, name: Label) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn get_mut(&mut self, name: Label) -> Option<&mut Symbol> {
        self.symbols.get_mut(&name)
    }

    pub fn contains(&self, name: Label) -> bool {
        self.symbols.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}

/// Where a resolved name lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// A local of the current function.
    Local(Ssa),
    /// A global symbol.
    Global(Label),
}

/// Result of resolving a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub ty: TypeId,
    pub storage: Storage,
}
