//! Constant-aware arithmetic compiler.
//!
//! For every arithmetic operation the compiler either folds the result at
//! compile time, when both operands are literals, or emits one instruction
//! into the function under construction.
//!
//! ## Modules
//!
//! - [`arith`]: the `compile_*` entry points (fold-or-emit dispatch)
//! - [`fold`]: exact-value folding with promotion and overflow rules
//! - [`eval`]: straight-line evaluation of finished functions

pub mod arith;
pub mod eval;
pub mod fold;

pub use arith::{
    compile_add, compile_binary, compile_div, compile_mod, compile_mul, compile_neg, compile_sub,
};
pub use eval::evaluate;
pub use fold::{fold_binary, fold_neg, natural_kind};
