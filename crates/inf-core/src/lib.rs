//! Core data model for the inf expression compiler.
//!
//! This crate holds everything the scanner, parser and arithmetic compiler
//! share:
//!
//! - [`IntKind`] / [`Integer`]: the eight integer kinds and exact values
//! - [`Type`] / [`TypeId`] / [`TypeInterner`]: interned types
//! - [`Label`] / [`StringInterner`]: interned identifiers
//! - [`Operand`], [`Instruction`], [`Function`], [`Local`]: the IR
//! - [`Symbol`] / [`Value`] / [`SymbolTable`]: globals
//! - [`CompileError`] / [`ErrorList`] / [`Location`]: diagnostics
//! - [`Context`]: the environment that owns all of the above

pub mod context;
pub mod error;
pub mod function;
pub mod instruction;
pub mod integer;
pub mod interner;
pub mod location;
pub mod operand;
pub mod properties;
pub mod symbol;
pub mod types;

pub use context::{Context, Frame};
pub use error::{CompileError, Diagnostic, ErrorCategory, ErrorList, ErrorTag};
pub use function::{Function, Local, LocalKind};
pub use instruction::{Instruction, Opcode};
pub use integer::{IntKind, Integer};
pub use interner::{Label, StringInterner};
pub use location::{Location, LocationList, LocationTag, Position};
pub use operand::{Operand, Ssa};
pub use properties::{ContextProperty, Properties};
pub use symbol::{Binding, Storage, Symbol, SymbolTable, Value};
pub use types::{Type, TypeId, TypeInterner};
