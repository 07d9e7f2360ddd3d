//! Opcodes and instructions.

use std::fmt;

use crate::{Operand, Ssa};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Opcode {
    /// Number of source operands.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Neg => 1,
            _ => 2,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Neg => "neg",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One straight-line instruction: `dest = opcode first[, second]`.
///
/// Unary instructions leave `second` as [`Operand::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: Opcode,
    pub dest: Ssa,
    pub first: Operand,
    pub second: Operand,
}

impl Instruction {
    pub fn unary(opcode: Opcode, dest: Ssa, operand: Operand) -> Self {
        debug_assert_eq!(opcode.arity(), 1);
        Self {
            opcode,
            dest,
            first: operand,
            second: Operand::Empty,
        }
    }

    pub fn binary(opcode: Opcode, dest: Ssa, first: Operand, second: Operand) -> Self {
        debug_assert_eq!(opcode.arity(), 2);
        Self {
            opcode,
            dest,
            first,
            second,
        }
    }

    /// The source operands the opcode reads, in source order.
    pub fn sources(&self) -> impl Iterator<Item = Operand> + '_ {
        [self.first, self.second]
            .into_iter()
            .take(self.opcode.arity())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} {}", self.dest, self.opcode, self.first)?;
        if self.opcode.arity() == 2 {
            write!(f, ", {}", self.second)?;
        }
        Ok(())
    }
}
