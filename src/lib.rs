//! inf: a small expression language front end and constant-aware code
//! generator.
//!
//! Source text is scanned and parsed in one pass that lowers straight into a
//! typed, width-specific IR. Arithmetic on known values is folded at compile
//! time with exact promotion and overflow rules; everything else becomes one
//! instruction per operation.
//!
//! The [`Unit`] driver is the usual entry point. The component crates are
//! re-exported for direct use:
//!
//! - [`core`]: IR data model and [`Context`]
//! - [`compiler`]: the `compile_*` fold-or-emit entry points and the evaluator
//! - [`parser`]: scanner and precedence-climbing parser

pub mod unit;

pub use inf_compiler as compiler;
pub use inf_core as core;
pub use inf_parser as parser;

pub use inf_core::{
    CompileError, Context, ContextProperty, Function, Instruction, IntKind, Integer, Label,
    Opcode, Operand, Ssa, Value,
};
pub use inf_parser::Parser;
pub use unit::{BuildError, EvalError, Unit, UnitError};

pub mod prelude {
    pub use crate::unit::{BuildError, EvalError, Unit, UnitError};
    pub use inf_compiler::{
        compile_add, compile_div, compile_mod, compile_mul, compile_neg, compile_sub, evaluate,
    };
    pub use inf_core::{
        CompileError, Context, ContextProperty, Function, Instruction, IntKind, Integer, Label,
        Location, Opcode, Operand, Ssa, Type, TypeId, Value,
    };
    pub use inf_parser::{Lexer, Parser, Token, TokenKind};
}
