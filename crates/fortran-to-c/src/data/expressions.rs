// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Target expressions
//!
//! `Display` renders C syntax with the minimum parentheses needed to keep the
//! tree shape. It is used for log lines and assertions, not for emitting files.

use crate::data::types::TargetType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetExpr {
    Var(String),
    Int(i64),
    Float(f64),
    Double(f64),
    Char(char),
    Str(String),
    Unary {
        op: UnOp,
        operand: Box<TargetExpr>,
        #[serde(default)]
        postfix: bool,
    },
    Binary {
        op: BinOp,
        lhs: Box<TargetExpr>,
        rhs: Box<TargetExpr>,
    },
    Deref(Box<TargetExpr>),
    AddressOf(Box<TargetExpr>),
    Index {
        array: Box<TargetExpr>,
        index: Box<TargetExpr>,
    },
    Call {
        function: String,
        args: Vec<TargetExpr>,
    },
    Cast {
        ty: TargetType,
        value: Box<TargetExpr>,
    },
    Conditional {
        condition: Box<TargetExpr>,
        then_value: Box<TargetExpr>,
        else_value: Box<TargetExpr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    AndAssign,
    XorAssign,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Assign => "=",
            BinOp::AddAssign => "+=",
            BinOp::SubAssign => "-=",
            BinOp::MulAssign => "*=",
            BinOp::DivAssign => "/=",
            BinOp::AndAssign => "&=",
            BinOp::XorAssign => "^=",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div => 13,
            BinOp::Add | BinOp::Sub => 12,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 10,
            BinOp::Eq | BinOp::Neq => 9,
            BinOp::BitAnd => 8,
            BinOp::BitXor => 7,
            BinOp::BitOr => 6,
            BinOp::And => 5,
            BinOp::Or => 4,
            _ => ASSIGN_PRECEDENCE,
        }
    }

    fn is_right_associative(&self) -> bool {
        self.precedence() == ASSIGN_PRECEDENCE
    }
}

const PRIMARY_PRECEDENCE: u8 = 16;
const POSTFIX_PRECEDENCE: u8 = 15;
const PREFIX_PRECEDENCE: u8 = 14;
const CONDITIONAL_PRECEDENCE: u8 = 3;
const ASSIGN_PRECEDENCE: u8 = 2;

impl TargetExpr {
    pub fn var(name: impl Into<String>) -> Self {
        TargetExpr::Var(name.into())
    }

    pub fn binary(op: BinOp, lhs: TargetExpr, rhs: TargetExpr) -> Self {
        TargetExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(lhs: TargetExpr, rhs: TargetExpr) -> Self {
        Self::binary(BinOp::Assign, lhs, rhs)
    }

    pub fn deref(inner: TargetExpr) -> Self {
        TargetExpr::Deref(Box::new(inner))
    }

    pub fn address_of(inner: TargetExpr) -> Self {
        TargetExpr::AddressOf(Box::new(inner))
    }

    pub fn call(function: impl Into<String>, args: Vec<TargetExpr>) -> Self {
        TargetExpr::Call {
            function: function.into(),
            args,
        }
    }

    pub fn cast(ty: TargetType, value: TargetExpr) -> Self {
        TargetExpr::Cast {
            ty,
            value: Box::new(value),
        }
    }

    pub fn conditional(condition: TargetExpr, then_value: TargetExpr, else_value: TargetExpr) -> Self {
        TargetExpr::Conditional {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TargetExpr::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Pass an lvalue by reference: `*p` becomes `p`, anything else `&value`
    pub fn into_reference(self) -> TargetExpr {
        match self {
            TargetExpr::Deref(inner) => *inner,
            other => TargetExpr::address_of(other),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            TargetExpr::Binary { op, .. } => op.precedence(),
            TargetExpr::Conditional { .. } => CONDITIONAL_PRECEDENCE,
            TargetExpr::Unary { postfix: true, .. } | TargetExpr::Index { .. } => POSTFIX_PRECEDENCE,
            TargetExpr::Unary { .. }
            | TargetExpr::Deref(_)
            | TargetExpr::AddressOf(_)
            | TargetExpr::Cast { .. } => PREFIX_PRECEDENCE,
            // a negative literal prints with its sign
            TargetExpr::Int(value) if *value < 0 => PREFIX_PRECEDENCE,
            TargetExpr::Float(value) | TargetExpr::Double(value) if *value < 0.0 => PREFIX_PRECEDENCE,
            _ => PRIMARY_PRECEDENCE,
        }
    }
}

/// Write `expr`, parenthesized when it binds looser than `min`
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &TargetExpr, min: u8) -> fmt::Result {
    if expr.precedence() < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for TargetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetExpr::Var(name) => write!(f, "{}", name),
            TargetExpr::Int(value) => write!(f, "{}", value),
            TargetExpr::Float(value) => write!(f, "{:?}f", value),
            TargetExpr::Double(value) => write!(f, "{:?}", value),
            TargetExpr::Char(value) => write!(f, "'{}'", value.escape_default()),
            TargetExpr::Str(value) => write!(f, "\"{}\"", value.escape_default()),
            TargetExpr::Unary { op, operand, postfix } => {
                let symbol = match op {
                    UnOp::Neg => "-",
                    UnOp::Not => "!",
                    UnOp::BitNot => "~",
                    UnOp::Increment => "++",
                    UnOp::Decrement => "--",
                };
                if *postfix {
                    write_operand(f, operand, POSTFIX_PRECEDENCE)?;
                    write!(f, "{}", symbol)
                } else {
                    write!(f, "{}", symbol)?;
                    write_operand(f, operand, PREFIX_PRECEDENCE)
                }
            }
            TargetExpr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                let (lhs_min, rhs_min) = if op.is_right_associative() {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                write_operand(f, lhs, lhs_min)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, rhs, rhs_min)
            }
            TargetExpr::Deref(inner) => {
                write!(f, "*")?;
                write_operand(f, inner, PREFIX_PRECEDENCE)
            }
            TargetExpr::AddressOf(inner) => {
                write!(f, "&")?;
                write_operand(f, inner, PREFIX_PRECEDENCE)
            }
            TargetExpr::Index { array, index } => {
                write_operand(f, array, POSTFIX_PRECEDENCE)?;
                write!(f, "[{}]", index)
            }
            TargetExpr::Call { function, args } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            TargetExpr::Cast { ty, value } => {
                write!(f, "({})", ty)?;
                write_operand(f, value, PREFIX_PRECEDENCE)
            }
            TargetExpr::Conditional { condition, then_value, else_value } => {
                write_operand(f, condition, CONDITIONAL_PRECEDENCE + 1)?;
                write!(f, " ? ")?;
                write_operand(f, then_value, ASSIGN_PRECEDENCE + 1)?;
                write!(f, " : ")?;
                write_operand(f, else_value, CONDITIONAL_PRECEDENCE)
            }
        }
    }
}
