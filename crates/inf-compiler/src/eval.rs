//! Straight-line evaluation of finished functions.
//!
//! Evaluation pushes a frame for the function, stores the arguments in its
//! leading slots and runs the instructions in order. Every instruction is
//! computed with the same folding routines the compiler uses, so run-time
//! values promote and fail exactly as constant expressions do.

use inf_core::{
    CompileError, Context, Instruction, Integer, Label, Opcode, Operand, Ssa, Storage, Value,
};
use tracing::{debug, trace};

use crate::fold::{fold_binary, fold_neg};

/// Run the function named `name` with `arguments` and return the final value
/// of every local, in register order.
///
/// The function must not be under construction: while its frame is active its
/// symbol holds no body.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn evaluate(
    ctx: &mut Context,
    name: Label,
    arguments: &[Value],
) -> Result<Vec<Value>, CompileError> {
    ctx.begin_function(name)?;
    let result = run(ctx, arguments);
    ctx.end_function()?;
    if let Err(error) = &result {
        debug!(name = name.0, %error, "evaluation failed");
    }
    result
}

fn run(ctx: &mut Context, arguments: &[Value]) -> Result<Vec<Value>, CompileError> {
    let function = ctx.current_function().ok_or(CompileError::NoActiveFunction)?;
    if arguments.len() != function.parameter_count() {
        return Err(CompileError::ArgumentMismatch);
    }

    let parameters: Vec<_> = function.locals()[..arguments.len()].iter().map(|l| l.ty).collect();
    let body: Vec<Instruction> = function.instructions().to_vec();

    for (index, (argument, ty)) in arguments.iter().zip(parameters).enumerate() {
        let kind = ctx.integer_kind(ty).ok_or(CompileError::UnsupportedType)?;
        let value = argument.as_integer().ok_or(CompileError::UnsupportedType)?;
        let value = Integer::new(kind, value.value()).ok_or(CompileError::IntegerOutOfBounds)?;
        ctx.set_slot(Ssa(index as u32), value.into())?;
    }

    for instruction in body {
        let value = step(ctx, &instruction)?;
        trace!(%instruction, %value, "step");
        ctx.set_slot(instruction.dest, value.into())?;
    }

    Ok(ctx.frame_slots().to_vec())
}

fn step(ctx: &Context, instruction: &Instruction) -> Result<Integer, CompileError> {
    let first = read(ctx, instruction.first)?;
    match instruction.opcode {
        Opcode::Neg => fold_neg(first),
        op => fold_binary(op, first, read(ctx, instruction.second)?),
    }
}

/// The run-time value of an instruction source.
fn read(ctx: &Context, operand: Operand) -> Result<Integer, CompileError> {
    if let Some(literal) = operand.as_integer() {
        return Ok(literal);
    }
    let value = match operand {
        Operand::Ssa(ssa) => ctx.slot(ssa).ok_or(CompileError::LocalNotFound)?,
        Operand::Label(label) => match ctx.lookup_binding(label).map(|b| b.storage) {
            Some(Storage::Local(ssa)) => ctx.slot(ssa).ok_or(CompileError::LocalNotFound)?,
            Some(Storage::Global(name)) => {
                &ctx.symbol(name).ok_or(CompileError::LocalNotFound)?.value
            }
            None => return Err(CompileError::LocalNotFound),
        },
        _ => return Err(CompileError::UnsupportedType),
    };
    value.as_integer().ok_or(CompileError::UnsupportedType)
}
