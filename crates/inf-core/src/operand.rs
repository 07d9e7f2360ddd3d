//! The operand: the single value passed between parser and compiler.
//!
//! An operand is either known at compile time (one of the eight literal
//! variants), known only at run time (a virtual register or a label), a
//! recorded failure, or empty.

use std::fmt;

use crate::{ErrorTag, IntKind, Integer, Label};

/// Virtual register: index into the current function's local table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Ssa(pub u32);

impl Ssa {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Ssa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operand {
    #[default]
    Empty,
    Ssa(Ssa),
    Label(Label),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Error(ErrorTag),
}

impl Operand {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Operand::Error(_))
    }

    #[inline]
    pub fn as_error(&self) -> Option<ErrorTag> {
        match self {
            Operand::Error(tag) => Some(*tag),
            _ => None,
        }
    }

    /// The literal value carried by this operand, if any.
    pub fn as_integer(&self) -> Option<Integer> {
        Some(match *self {
            Operand::U8(v) => v.into(),
            Operand::U16(v) => v.into(),
            Operand::U32(v) => v.into(),
            Operand::U64(v) => v.into(),
            Operand::I8(v) => v.into(),
            Operand::I16(v) => v.into(),
            Operand::I32(v) => v.into(),
            Operand::I64(v) => v.into(),
            _ => return None,
        })
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.as_integer().is_some()
    }

    /// Whether the value is only known at run time.
    #[inline]
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Operand::Ssa(_) | Operand::Label(_))
    }

    /// The kind of a literal operand.
    pub fn literal_kind(&self) -> Option<IntKind> {
        self.as_integer().map(|i| i.kind())
    }
}

impl From<Integer> for Operand {
    fn from(integer: Integer) -> Self {
        // Integer keeps its value inside its kind's range, so the casts are exact.
        let v = integer.value();
        match integer.kind() {
            IntKind::U8 => Operand::U8(v as u8),
            IntKind::U16 => Operand::U16(v as u16),
            IntKind::U32 => Operand::U32(v as u32),
            IntKind::U64 => Operand::U64(v as u64),
            IntKind::I8 => Operand::I8(v as i8),
            IntKind::I16 => Operand::I16(v as i16),
            IntKind::I32 => Operand::I32(v as i32),
            IntKind::I64 => Operand::I64(v as i64),
        }
    }
}

impl From<Ssa> for Operand {
    fn from(ssa: Ssa) -> Self {
        Operand::Ssa(ssa)
    }
}

impl From<Label> for Operand {
    fn from(label: Label) -> Self {
        Operand::Label(label)
    }
}

impl From<ErrorTag> for Operand {
    fn from(tag: ErrorTag) -> Self {
        Operand::Error(tag)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Empty => f.write_str("_"),
            Operand::Ssa(ssa) => write!(f, "{ssa}"),
            Operand::Label(label) => write!(f, "@{}", label.0),
            Operand::Error(tag) => write!(f, "{tag}"),
            literal => match literal.as_integer() {
                Some(integer) => write!(f, "{integer}"),
                None => f.write_str("?"),
            },
        }
    }
}
