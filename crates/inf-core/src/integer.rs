//! The eight fixed-width integer kinds and their promotion lattice.
//!
//! Unsigned kinds order `u8 < u16 < u32 < u64`, signed kinds order
//! `i8 < i16 < i32 < i64`. An unsigned kind below 64 bits fits exactly in the
//! signed kind one rank wider (`u8 -> i16`, `u16 -> i32`, `u32 -> i64`).
//!
//! [`Integer`] pairs a kind with its exact value held in an `i128`, which is
//! wide enough for every value of every kind.

use std::fmt;

/// Width and signedness of an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl IntKind {
    /// All kinds, unsigned first, each group narrowest first.
    pub const ALL: [IntKind; 8] = [
        IntKind::U8,
        IntKind::U16,
        IntKind::U32,
        IntKind::U64,
        IntKind::I8,
        IntKind::I16,
        IntKind::I32,
        IntKind::I64,
    ];

    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }

    /// Position within its signedness group (0 for 8-bit .. 3 for 64-bit).
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            IntKind::U8 | IntKind::I8 => 0,
            IntKind::U16 | IntKind::I16 => 1,
            IntKind::U32 | IntKind::I32 => 2,
            IntKind::U64 | IntKind::I64 => 3,
        }
    }

    /// The kind with the given signedness and rank, if the rank exists.
    pub fn from_rank(signed: bool, rank: u8) -> Option<IntKind> {
        Some(match (signed, rank) {
            (false, 0) => IntKind::U8,
            (false, 1) => IntKind::U16,
            (false, 2) => IntKind::U32,
            (false, 3) => IntKind::U64,
            (true, 0) => IntKind::I8,
            (true, 1) => IntKind::I16,
            (true, 2) => IntKind::I32,
            (true, 3) => IntKind::I64,
            _ => return None,
        })
    }

    #[inline]
    pub fn bits(self) -> u32 {
        8 << self.rank()
    }

    pub fn min(self) -> i128 {
        match self {
            IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 => 0,
            IntKind::I8 => i8::MIN as i128,
            IntKind::I16 => i16::MIN as i128,
            IntKind::I32 => i32::MIN as i128,
            IntKind::I64 => i64::MIN as i128,
        }
    }

    pub fn max(self) -> i128 {
        match self {
            IntKind::U8 => u8::MAX as i128,
            IntKind::U16 => u16::MAX as i128,
            IntKind::U32 => u32::MAX as i128,
            IntKind::U64 => u64::MAX as i128,
            IntKind::I8 => i8::MAX as i128,
            IntKind::I16 => i16::MAX as i128,
            IntKind::I32 => i32::MAX as i128,
            IntKind::I64 => i64::MAX as i128,
        }
    }

    /// Whether `value` is representable in this kind.
    #[inline]
    pub fn contains(self, value: i128) -> bool {
        self.min() <= value && value <= self.max()
    }

    /// The 64-bit kind of the same signedness.
    #[inline]
    pub fn widest(self) -> IntKind {
        if self.is_signed() { IntKind::I64 } else { IntKind::U64 }
    }

    /// The next wider signed kind: `u8 -> i16`, `i8 -> i16`, ... `u32/i32 -> i64`.
    ///
    /// 64-bit kinds have no wider signed kind.
    pub fn next_signed(self) -> Option<IntKind> {
        IntKind::from_rank(true, self.rank() + 1)
    }

    /// The literal suffix naming this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
        }
    }

    /// Parse a literal suffix.
    pub fn from_suffix(suffix: &str) -> Option<IntKind> {
        IntKind::ALL.into_iter().find(|k| k.suffix() == suffix)
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// An integer value together with its kind.
///
/// The value is always within the kind's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    kind: IntKind,
    value: i128,
}

impl Integer {
    /// Create an integer, or `None` if `value` does not fit `kind`.
    pub fn new(kind: IntKind, value: i128) -> Option<Self> {
        kind.contains(value).then_some(Self { kind, value })
    }

    #[inline]
    pub fn kind(&self) -> IntKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> i128 {
        self.value
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.kind.suffix())
    }
}

macro_rules! integer_from {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$ty> for Integer {
                fn from(value: $ty) -> Self {
                    Integer { kind: IntKind::$kind, value: value as i128 }
                }
            }
        )*
    };
}

integer_from! {
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert_eq!(IntKind::U8.max(), 255);
        assert_eq!(IntKind::I8.min(), -128);
        assert_eq!(IntKind::U64.max(), u64::MAX as i128);
        assert_eq!(IntKind::I64.min(), i64::MIN as i128);
        assert!(IntKind::U16.contains(65535));
        assert!(!IntKind::U16.contains(-1));
        assert!(!IntKind::I32.contains(i32::MAX as i128 + 1));
    }

    #[test]
    fn lattice() {
        assert_eq!(IntKind::U8.next_signed(), Some(IntKind::I16));
        assert_eq!(IntKind::U32.next_signed(), Some(IntKind::I64));
        assert_eq!(IntKind::I16.next_signed(), Some(IntKind::I32));
        assert_eq!(IntKind::U64.next_signed(), None);
        assert_eq!(IntKind::I64.next_signed(), None);

        assert_eq!(IntKind::U16.widest(), IntKind::U64);
        assert_eq!(IntKind::I8.widest(), IntKind::I64);
        assert_eq!(IntKind::U32.bits(), 32);
    }

    #[test]
    fn suffixes() {
        for kind in IntKind::ALL {
            assert_eq!(IntKind::from_suffix(kind.suffix()), Some(kind));
        }
        assert_eq!(IntKind::from_suffix("u7"), None);
    }

    #[test]
    fn integer_checks_range() {
        assert!(Integer::new(IntKind::U8, 256).is_none());
        assert!(Integer::new(IntKind::I8, -128).is_some());
        assert_eq!(Integer::from(300u32).to_string(), "300u32");
        assert_eq!(Integer::from(-5i16).value(), -5);
    }
}
