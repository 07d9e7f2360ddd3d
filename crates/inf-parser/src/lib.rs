//! Scanner and parser for the inf expression language.
//!
//! This crate provides:
//! - Lexical analysis: one located [`Token`] per call, literals and labels
//!   resolved while scanning
//! - A precedence-climbing [`Parser`] that lowers as it parses, calling the
//!   arithmetic compiler at every reduction
//!
//! # Example
//!
//! ```
//! use inf_core::{Context, Operand};
//! use inf_parser::Parser;
//!
//! let mut ctx = Context::new();
//! let mut parser = Parser::new(&mut ctx);
//! parser.set_source("200u8 + 100u8; 1 + 2 * 3", None);
//! parser.prime();
//!
//! assert_eq!(parser.parse(), Operand::U64(300));
//! assert_eq!(parser.parse(), Operand::I64(7));
//! assert!(parser.done());
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, Precedence};
