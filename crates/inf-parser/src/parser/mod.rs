//! Expression parsing with precedence climbing.
//!
//! Each [`TokenKind`](crate::lexer::TokenKind) has a [`Rule`]: an optional
//! prefix handler, an optional infix handler and the infix handler's binding
//! [`Precedence`]. Parsing and lowering happen in the same pass.

mod parser;
mod rules;

pub use parser::Parser;
pub use rules::{Infix, Precedence, Prefix, Rule, rule_of};
