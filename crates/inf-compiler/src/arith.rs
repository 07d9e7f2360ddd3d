//! Fold-or-emit entry points for the arithmetic operators.
//!
//! Each entry point looks at the runtime variant of its operands:
//!
//! | operands                      | result                                    |
//! |-------------------------------|-------------------------------------------|
//! | any error                     | that error, unchanged (left wins)         |
//! | any empty                     | "operation unsupported on type"           |
//! | literal (op) literal          | folded literal, see [`crate::fold`]       |
//! | otherwise                     | one new local plus one instruction        |
//!
//! Emission checks that every symbolic operand resolves to an integer type.
//! The new local takes the type of the left operand when it is symbolic and
//! of the right operand otherwise.

use inf_core::{CompileError, Context, Instruction, Integer, Label, Opcode, Operand, Ssa, TypeId};
use tracing::trace;

use crate::fold::{fold_binary, fold_neg};

/// Compile `-operand`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_neg(ctx: &mut Context, operand: Operand) -> Operand {
    match operand {
        Operand::Error(_) => operand,
        Operand::Empty => ctx.fail(CompileError::UnsupportedType),
        Operand::Ssa(_) | Operand::Label(_) => emit(ctx, Opcode::Neg, operand, Operand::Empty),
        literal => match literal.as_integer() {
            Some(value) => fold_result(ctx, Opcode::Neg, fold_neg(value)),
            None => ctx.fail(CompileError::UnsupportedType),
        },
    }
}

/// Compile `left + right`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_add(ctx: &mut Context, left: Operand, right: Operand) -> Operand {
    compile_binary(ctx, Opcode::Add, left, right)
}

/// Compile `left - right`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_sub(ctx: &mut Context, left: Operand, right: Operand) -> Operand {
    compile_binary(ctx, Opcode::Sub, left, right)
}

/// Compile `left * right`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_mul(ctx: &mut Context, left: Operand, right: Operand) -> Operand {
    compile_binary(ctx, Opcode::Mul, left, right)
}

/// Compile `left / right`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_div(ctx: &mut Context, left: Operand, right: Operand) -> Operand {
    compile_binary(ctx, Opcode::Div, left, right)
}

/// Compile `left % right`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_mod(ctx: &mut Context, left: Operand, right: Operand) -> Operand {
    compile_binary(ctx, Opcode::Mod, left, right)
}

/// Dispatch a binary opcode to its entry point.
pub fn compile_binary(ctx: &mut Context, op: Opcode, left: Operand, right: Operand) -> Operand {
    if left.is_error() {
        return left;
    }
    if right.is_error() {
        return right;
    }
    if matches!(left, Operand::Empty) || matches!(right, Operand::Empty) {
        return ctx.fail(CompileError::UnsupportedType);
    }
    if op == Opcode::Neg {
        return ctx.fail(CompileError::UnexpectedBinop);
    }

    match (left.as_integer(), right.as_integer()) {
        (Some(a), Some(b)) => fold_result(ctx, op, fold_binary(op, a, b)),
        _ => emit(ctx, op, left, right),
    }
}

fn fold_result(ctx: &mut Context, op: Opcode, result: Result<Integer, CompileError>) -> Operand {
    match result {
        Ok(value) => {
            trace!(%op, %value, "fold");
            value.into()
        }
        Err(error) => {
            trace!(%op, %error, "fold failed");
            ctx.fail(error)
        }
    }
}

/// The integer type of a symbolic operand, and its name when it is a label.
fn symbolic_type(ctx: &Context, operand: Operand) -> Result<(TypeId, Option<Label>), CompileError> {
    let (ty, name) = match operand {
        Operand::Ssa(ssa) => {
            if ctx.current_function().is_none() {
                return Err(CompileError::NoActiveFunction);
            }
            let local = ctx.local(ssa).ok_or(CompileError::LocalNotFound)?;
            (local.ty, None)
        }
        Operand::Label(label) => {
            let binding = ctx.lookup_binding(label).ok_or(CompileError::LocalNotFound)?;
            (binding.ty, Some(label))
        }
        _ => return Err(CompileError::UnsupportedType),
    };
    if ctx.integer_kind(ty).is_none() {
        return Err(CompileError::UnsupportedType);
    }
    Ok((ty, name))
}

fn is_zero(operand: Operand) -> bool {
    operand.as_integer().is_some_and(|i| i.value() == 0)
}

fn emit(ctx: &mut Context, op: Opcode, first: Operand, second: Operand) -> Operand {
    match try_emit(ctx, op, first, second) {
        Ok(dest) => {
            trace!(%op, %first, %second, %dest, "emit");
            Operand::Ssa(dest)
        }
        Err(error) => ctx.fail(error),
    }
}

fn try_emit(
    ctx: &mut Context,
    op: Opcode,
    first: Operand,
    second: Operand,
) -> Result<Ssa, CompileError> {
    let left = first
        .is_symbolic()
        .then(|| symbolic_type(ctx, first))
        .transpose()?;
    let right = second
        .is_symbolic()
        .then(|| symbolic_type(ctx, second))
        .transpose()?;

    if matches!(op, Opcode::Div | Opcode::Mod) && is_zero(second) {
        return Err(CompileError::DivisionByZero);
    }

    let (ty, name) = left.or(right).ok_or(CompileError::UnsupportedType)?;
    ctx.emit(ty, name, |dest| match op {
        Opcode::Neg => Instruction::unary(op, dest, first),
        _ => Instruction::binary(op, dest, first, second),
    })
}
