// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Eager constant folding for index and extent arithmetic.
//!
//! Builders used while emitting arithmetic:
//! - Integer literals on both sides are folded (unless the result overflows)
//! - Multiplication by a literal `1` is elided
//! - Addition of a literal `0` is elided

use crate::data::expressions::{BinOp, TargetExpr};

/// `lhs + rhs`
pub fn add(lhs: TargetExpr, rhs: TargetExpr) -> TargetExpr {
    match (lhs.as_int(), rhs.as_int()) {
        (Some(0), _) => rhs,
        (_, Some(0)) => lhs,
        _ => fold_binary(BinOp::Add, lhs, rhs),
    }
}

/// `lhs - rhs`
pub fn sub(lhs: TargetExpr, rhs: TargetExpr) -> TargetExpr {
    match rhs.as_int() {
        Some(0) => lhs,
        _ => fold_binary(BinOp::Sub, lhs, rhs),
    }
}

/// `lhs * rhs`
pub fn mul(lhs: TargetExpr, rhs: TargetExpr) -> TargetExpr {
    match (lhs.as_int(), rhs.as_int()) {
        (Some(1), _) => rhs,
        (_, Some(1)) => lhs,
        _ => fold_binary(BinOp::Mul, lhs, rhs),
    }
}

/// Build a binary node, folding it when both operands are integer literals
pub fn fold_binary(op: BinOp, lhs: TargetExpr, rhs: TargetExpr) -> TargetExpr {
    if let (Some(a), Some(b)) = (lhs.as_int(), rhs.as_int()) {
        if let Some(result) = fold_int(op, a, b) {
            return TargetExpr::Int(result);
        }
    }
    TargetExpr::binary(op, lhs, rhs)
}

fn fold_int(op: BinOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        _ => None,
    }
}
