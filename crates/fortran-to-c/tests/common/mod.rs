// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use fortran_to_c::data::expressions::{BinOp, UnOp};
use fortran_to_c::data::source::{
    DeclaredVariable, Parameter, Procedure, ProcedureKind, VariableDeclaration,
};
use fortran_to_c::data::statements::Block;
use fortran_to_c::{Intent, SourceNode, SourceType, TargetExpr, TargetStmt, TranslatorOptions};
use std::collections::BTreeMap;

pub fn options() -> TranslatorOptions {
    TranslatorOptions::default().with_runtime_root("/opt/ftc")
}

pub fn declare(intent: Intent, name: &str, ty: SourceType) -> SourceNode {
    SourceNode::VariableDeclaration(VariableDeclaration {
        intent,
        variables: vec![DeclaredVariable {
            name: name.to_string(),
            ty,
            initializer: None,
        }],
    })
}

pub fn subroutine(name: &str, params: &[(&str, SourceType)], body: Vec<SourceNode>) -> SourceNode {
    SourceNode::Procedure(Procedure {
        name: name.to_string(),
        kind: ProcedureKind::Subroutine,
        params: params
            .iter()
            .map(|(name, ty)| Parameter {
                name: name.to_string(),
                ty: ty.clone(),
            })
            .collect(),
        body,
    })
}

/// C-like rendering of a statement list, one line per statement
pub fn render(block: &[TargetStmt]) -> Vec<String> {
    let mut lines = Vec::new();
    for stmt in block {
        match stmt {
            TargetStmt::Declaration(decl) => {
                let storage = if decl.is_extern { "extern " } else { "" };
                match &decl.initializer {
                    Some(init) => lines.push(format!("{}{} = {};", storage, decl.ty.declarator(&decl.name), init)),
                    None => lines.push(format!("{}{};", storage, decl.ty.declarator(&decl.name))),
                }
            }
            TargetStmt::Function(function) if function.body.is_none() => {
                lines.push(format!("{};", function.signature()))
            }
            TargetStmt::Function(function) => lines.push(format!("{} {{", function.signature())),
            TargetStmt::Expr(expr) => lines.push(format!("{};", expr)),
            TargetStmt::Return(Some(value)) => lines.push(format!("return {};", value)),
            TargetStmt::Return(None) => lines.push("return;".to_string()),
            TargetStmt::If { condition, .. } => lines.push(format!("if ({}) {{", condition)),
            TargetStmt::For { test, step, .. } => lines.push(format!("for (; {}; {}) {{", test, step)),
        }
        for nested in stmt.blocks() {
            lines.extend(render(&nested.statements).into_iter().map(|line| format!("  {}", line)));
        }
    }
    lines
}

pub fn body(statements: &[TargetStmt]) -> &Block {
    statements
        .iter()
        .find_map(|stmt| match stmt {
            TargetStmt::Function(function) => function.body.as_ref(),
            _ => None,
        })
        .expect("no function definition")
}

/// Integer evaluation of index and loop-control expressions
pub fn evaluate(expr: &TargetExpr, env: &BTreeMap<&str, i64>) -> Option<i64> {
    Some(match expr {
        TargetExpr::Int(value) => *value,
        TargetExpr::Var(name) => *env.get(name.as_str())?,
        TargetExpr::Unary { op: UnOp::Neg, operand, .. } => -evaluate(operand, env)?,
        TargetExpr::Unary { op: UnOp::Not, operand, .. } => i64::from(evaluate(operand, env)? == 0),
        TargetExpr::Binary { op, lhs, rhs } => {
            let (l, r) = (evaluate(lhs, env)?, evaluate(rhs, env)?);
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Lt => i64::from(l < r),
                BinOp::Le => i64::from(l <= r),
                BinOp::Gt => i64::from(l > r),
                BinOp::Ge => i64::from(l >= r),
                BinOp::Eq => i64::from(l == r),
                BinOp::Neq => i64::from(l != r),
                _ => return None,
            }
        }
        TargetExpr::Conditional { condition, then_value, else_value } => {
            if evaluate(condition, env)? != 0 {
                evaluate(then_value, env)?
            } else {
                evaluate(else_value, env)?
            }
        }
        _ => return None,
    })
}
