//! Exact-value constant folding.
//!
//! Both operands are lifted to `i128`, which holds every value of every kind,
//! the operation is performed exactly, and the result is range-checked against
//! the natural kind of the operation and then once more against the widest
//! kind of the same signedness. Nothing wraps.

use inf_core::{CompileError, IntKind, Integer, Opcode};

/// Negate a literal.
///
/// Unsigned kinds become signed: `u8`, `u16` and `u32` move to the next wider
/// signed kind, which always holds the result; `u64` becomes `i64` when the
/// value allows it. A signed value equal to its kind's minimum moves to the
/// next wider signed kind, except at 64 bits.
pub fn fold_neg(value: Integer) -> Result<Integer, CompileError> {
    let kind = value.kind();
    let negated = -value.value();

    let target = if !kind.is_signed() {
        match kind.next_signed() {
            Some(signed) => signed,
            None if value.value() <= IntKind::I64.max() => IntKind::I64,
            None => return Err(CompileError::IntegerOverflow),
        }
    } else if value.value() == kind.min() {
        kind.next_signed().ok_or(CompileError::IntegerOverflow)?
    } else {
        kind
    };

    Integer::new(target, negated).ok_or(CompileError::IntegerOverflow)
}

/// Combine two literals with a binary opcode.
pub fn fold_binary(op: Opcode, left: Integer, right: Integer) -> Result<Integer, CompileError> {
    let natural = natural_kind(left, right)?;
    let exact = exact(op, left.value(), right.value())?;
    fit(natural, exact)
}

/// The kind an operation on `left` and `right` is first attempted in.
///
/// Same signedness picks the wider kind. Mixed signedness lifts the unsigned
/// side to the signed kind one rank wider, except for `u64`, which can only
/// meet a signed operand as `i64` (value up to `i64::MAX`) or as `u64`
/// (signed operand non-negative).
pub fn natural_kind(left: Integer, right: Integer) -> Result<IntKind, CompileError> {
    let (lk, rk) = (left.kind(), right.kind());
    if lk.is_signed() == rk.is_signed() {
        return Ok(if lk.rank() >= rk.rank() { lk } else { rk });
    }

    let (unsigned, signed) = if lk.is_signed() { (right, left) } else { (left, right) };
    match unsigned.kind().next_signed() {
        Some(lifted) => Ok(if lifted.rank() >= signed.kind().rank() {
            lifted
        } else {
            signed.kind()
        }),
        None if unsigned.value() <= IntKind::I64.max() => Ok(IntKind::I64),
        None if signed.value() < 0 => Err(CompileError::IntegerOutOfBounds),
        None => Ok(IntKind::U64),
    }
}

fn exact(op: Opcode, a: i128, b: i128) -> Result<i128, CompileError> {
    let result = match op {
        Opcode::Add => a.checked_add(b),
        Opcode::Sub => a.checked_sub(b),
        Opcode::Mul => a.checked_mul(b),
        Opcode::Div | Opcode::Mod if b == 0 => return Err(CompileError::DivisionByZero),
        // i128 division truncates toward zero and the remainder follows the dividend.
        Opcode::Div => a.checked_div(b),
        Opcode::Mod => a.checked_rem(b),
        Opcode::Neg => return Err(CompileError::UnexpectedBinop),
    };
    result.ok_or(CompileError::IntegerOverflow)
}

/// Place an exact result in `natural`, or failing that in the widest kind of
/// the same signedness.
fn fit(natural: IntKind, value: i128) -> Result<Integer, CompileError> {
    if let Some(integer) = Integer::new(natural, value) {
        return Ok(integer);
    }
    if let Some(integer) = Integer::new(natural.widest(), value) {
        return Ok(integer);
    }
    if !natural.is_signed() && value < 0 {
        Err(CompileError::IntegerOutOfBounds)
    } else {
        Err(CompileError::IntegerOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(kind: IntKind, value: i128) -> Integer {
        Integer::new(kind, value).unwrap()
    }

    fn add(a: Integer, b: Integer) -> Result<Integer, CompileError> {
        fold_binary(Opcode::Add, a, b)
    }

    // ========================================================================
    // Negation
    // ========================================================================

    #[test]
    fn neg_unsigned_promotes_to_next_signed() {
        assert_eq!(fold_neg(5u8.into()), Ok(int(IntKind::I16, -5)));
        assert_eq!(fold_neg(u16::MAX.into()), Ok(int(IntKind::I32, -65535)));
        assert_eq!(fold_neg(u32::MAX.into()), Ok(int(IntKind::I64, -(u32::MAX as i128))));
    }

    #[test]
    fn neg_u64_fits_only_up_to_i64_max() {
        assert_eq!(fold_neg((i64::MAX as u64).into()), Ok(int(IntKind::I64, -(i64::MAX as i128))));
        assert_eq!(fold_neg((i64::MAX as u64 + 1).into()), Err(CompileError::IntegerOverflow));
    }

    #[test]
    fn neg_signed_minimum_promotes() {
        assert_eq!(fold_neg(i8::MIN.into()), Ok(int(IntKind::I16, 128)));
        assert_eq!(fold_neg(i32::MIN.into()), Ok(int(IntKind::I64, 2147483648)));
        assert_eq!(fold_neg(i64::MIN.into()), Err(CompileError::IntegerOverflow));
    }

    #[test]
    fn neg_signed_keeps_kind() {
        assert_eq!(fold_neg((-7i8).into()), Ok(int(IntKind::I8, 7)));
        assert_eq!(fold_neg(i64::MAX.into()), Ok(int(IntKind::I64, -(i64::MAX as i128))));
    }

    #[test]
    fn double_negation_preserves_value() {
        for kind in IntKind::ALL {
            for value in [kind.min(), kind.min() + 1, 0, 1, kind.max() / 2, kind.max()] {
                let x = int(kind, value);
                if let Ok(once) = fold_neg(x)
                    && let Ok(twice) = fold_neg(once)
                {
                    assert_eq!(twice.value(), value, "{x}");
                }
            }
        }
    }

    // ========================================================================
    // Natural Kind
    // ========================================================================

    #[test]
    fn natural_kind_same_signedness_is_wider() {
        assert_eq!(natural_kind(5u8.into(), 300u32.into()), Ok(IntKind::U32));
        assert_eq!(natural_kind(1i64.into(), 1i16.into()), Ok(IntKind::I64));
    }

    #[test]
    fn natural_kind_mixed_lifts_unsigned() {
        assert_eq!(natural_kind(1u8.into(), 1i8.into()), Ok(IntKind::I16));
        assert_eq!(natural_kind(1i32.into(), 1u16.into()), Ok(IntKind::I32));
        assert_eq!(natural_kind(1u32.into(), 1i8.into()), Ok(IntKind::I64));
    }

    #[test]
    fn natural_kind_mixed_u64() {
        assert_eq!(natural_kind(10u64.into(), (-1i8).into()), Ok(IntKind::I64));
        assert_eq!(natural_kind(u64::MAX.into(), 1i32.into()), Ok(IntKind::U64));
        assert_eq!(
            natural_kind(u64::MAX.into(), (-1i32).into()),
            Err(CompileError::IntegerOutOfBounds)
        );
    }

    // ========================================================================
    // Binary Operations
    // ========================================================================

    #[test]
    fn add_in_natural_kind() {
        assert_eq!(add(5u8.into(), 300u32.into()), Ok(int(IntKind::U32, 305)));
        assert_eq!(add((-3i8).into(), 2u8.into()), Ok(int(IntKind::I16, -1)));
    }

    #[test]
    fn add_widens_once() {
        assert_eq!(add(200u8.into(), 100u8.into()), Ok(int(IntKind::U64, 300)));
        assert_eq!(add(i32::MAX.into(), 1i32.into()), Ok(int(IntKind::I64, 1 << 31)));
    }

    #[test]
    fn add_fails_past_widest() {
        assert_eq!(add(u64::MAX.into(), 1u64.into()), Err(CompileError::IntegerOverflow));
        assert_eq!(add(i64::MIN.into(), (-1i64).into()), Err(CompileError::IntegerOverflow));
    }

    #[test]
    fn unsigned_negative_result_is_out_of_bounds() {
        assert_eq!(
            fold_binary(Opcode::Sub, 3u8.into(), 5u8.into()),
            Err(CompileError::IntegerOutOfBounds)
        );
    }

    #[test]
    fn mul_uses_exact_arithmetic() {
        assert_eq!(
            fold_binary(Opcode::Mul, 300u16.into(), 300u16.into()),
            Ok(int(IntKind::U64, 90000))
        );
        assert_eq!(
            fold_binary(Opcode::Mul, u64::MAX.into(), u64::MAX.into()),
            Err(CompileError::IntegerOverflow)
        );
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(fold_binary(Opcode::Div, (-7i32).into(), 2i32.into()), Ok(int(IntKind::I32, -3)));
        assert_eq!(fold_binary(Opcode::Mod, (-7i32).into(), 2i32.into()), Ok(int(IntKind::I32, -1)));
        assert_eq!(fold_binary(Opcode::Mod, 7i32.into(), (-2i32).into()), Ok(int(IntKind::I32, 1)));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            fold_binary(Opcode::Div, 1u8.into(), 0u8.into()),
            Err(CompileError::DivisionByZero)
        );
        assert_eq!(
            fold_binary(Opcode::Mod, 1i64.into(), 0i8.into()),
            Err(CompileError::DivisionByZero)
        );
    }

    #[test]
    fn signed_minimum_divided_by_minus_one_widens() {
        assert_eq!(
            fold_binary(Opcode::Div, i8::MIN.into(), (-1i8).into()),
            Ok(int(IntKind::I64, 128))
        );
        assert_eq!(
            fold_binary(Opcode::Div, i64::MIN.into(), (-1i64).into()),
            Err(CompileError::IntegerOverflow)
        );
    }

    #[test]
    fn results_land_in_smallest_candidate() {
        for a in IntKind::ALL {
            for b in IntKind::ALL {
                let (x, y) = (int(a, 1), int(b, 1));
                let Ok(natural) = natural_kind(x, y) else { continue };
                let sum = add(x, y).unwrap();
                assert_eq!(sum.value(), 2);
                assert_eq!(sum.kind(), natural, "{a} + {b}");
            }
        }
    }
}
