//! Type model and the type interner.
//!
//! Types are interned: structurally identical types share one [`TypeId`], so
//! after interning equality is a handle comparison. Interning itself hashes a
//! canonical byte encoding of the type with XXHash64 and does one structural
//! comparison per bucket entry.

use rustc_hash::FxHashMap;
use std::fmt;
use xxhash_rust::xxh64::xxh64;

use crate::IntKind;

/// Seed for the canonical type encoding hash.
const TYPE_SEED: u64 = 0x2fac10b63a6cc57c;

/// Interned type handle.
///
/// Valid for the lifetime of the [`TypeInterner`] (and so of the context)
/// that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The nil type, always interned first.
    pub const NIL: TypeId = TypeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A type: nil, one of the eight integer kinds, or a function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Integer(IntKind),
    Function {
        return_type: TypeId,
        arguments: Vec<TypeId>,
    },
}

impl Type {
    /// Whether values of this type take part in arithmetic.
    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Integer(_))
    }

    pub fn as_integer(&self) -> Option<IntKind> {
        match self {
            Type::Integer(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Canonical byte encoding used for hashing.
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Type::Nil => out.push(0),
            Type::Integer(kind) => {
                out.push(1);
                out.push(*kind as u8);
            }
            Type::Function {
                return_type,
                arguments,
            } => {
                out.push(2);
                out.extend_from_slice(&return_type.0.to_le_bytes());
                out.extend_from_slice(&(arguments.len() as u32).to_le_bytes());
                for arg in arguments {
                    out.extend_from_slice(&arg.0.to_le_bytes());
                }
            }
        }
    }

    fn canonical_hash(&self) -> u64 {
        let mut bytes = Vec::with_capacity(16);
        self.encode(&mut bytes);
        xxh64(&bytes, TYPE_SEED)
    }
}

/// Deduplicating store of types.
///
/// Nil and the eight integer types are interned up front at fixed handles, so
/// [`integer`](Self::integer) never allocates.
#[derive(Debug)]
pub struct TypeInterner {
    types: Vec<Type>,
    buckets: FxHashMap<u64, Vec<TypeId>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = Self {
            types: Vec::with_capacity(16),
            buckets: FxHashMap::default(),
        };
        interner.intern(Type::Nil);
        for kind in IntKind::ALL {
            interner.intern(Type::Integer(kind));
        }
        interner
    }

    /// Return the handle for `ty`, inserting it if no equal type exists.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        let key = ty.canonical_hash();
        if let Some(bucket) = self.buckets.get(&key)
            && let Some(&id) = bucket.iter().find(|id| self.types[id.index()] == ty)
        {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        self.buckets.entry(key).or_default().push(id);
        id
    }

    #[inline]
    pub fn nil(&self) -> TypeId {
        TypeId::NIL
    }

    /// Handle of the integer type of `kind`.
    #[inline]
    pub fn integer(&self, kind: IntKind) -> TypeId {
        TypeId(1 + kind as u32)
    }

    /// Intern a function signature.
    pub fn function(&mut self, return_type: TypeId, arguments: Vec<TypeId>) -> TypeId {
        self.intern(Type::Function {
            return_type,
            arguments,
        })
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    /// The integer kind of `id`, if it is an integer type.
    pub fn integer_kind(&self, id: TypeId) -> Option<IntKind> {
        self.get(id).and_then(Type::as_integer)
    }

    pub fn is_integral(&self, id: TypeId) -> bool {
        self.get(id).is_some_and(Type::is_integral)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Render a type the way it would be written: `nil`, `u8`, `fn(i64, u8) -> nil`.
    pub fn describe(&self, id: TypeId) -> String {
        match self.get(id) {
            None => format!("<invalid {}>", id.0),
            Some(Type::Nil) => "nil".to_string(),
            Some(Type::Integer(kind)) => kind.suffix().to_string(),
            Some(Type::Function {
                return_type,
                arguments,
            }) => {
                let args: Vec<String> = arguments.iter().map(|a| self.describe(*a)).collect();
                format!("fn({}) -> {}", args.join(", "), self.describe(*return_type))
            }
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
