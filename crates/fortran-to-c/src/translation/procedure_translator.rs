// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Procedure and counting loop lowering

use crate::analysis::resolve_intents;
use crate::data::expressions::{BinOp, TargetExpr, UnOp};
use crate::data::scope::Symbol;
use crate::data::source::{BinaryOperator, DoLoop, Procedure, SourceExpr};
use crate::data::statements::{Block, FunctionDeclaration, Parameter, TargetStmt, VariableDeclaration};
use crate::data::types::{LoweredType, TargetType};
use crate::error::{TranslateError, TranslateResult};
use crate::translation::statement_translator::{EnclosingProcedure, UnitTranslator, RETURN_VALUE};
use crate::translation::walker::walk;
use itertools::Itertools;
use log::debug;

impl UnitTranslator<'_, '_> {
    /// Lower a subroutine or function into a function definition
    ///
    /// By-reference parameters become pointers. Functions get a `__retv`
    /// accumulator as their first statement, which `return` hands back.
    pub(crate) fn lower_procedure(&mut self, procedure: &Procedure) -> TranslateResult<()> {
        let intents = resolve_intents(procedure)?;
        self.scopes.push();

        // scalars first so that array bounds can refer to them
        let mut params: Vec<Option<Parameter>> = vec![None; procedure.params.len()];
        for index in (0..procedure.params.len()).sorted_by_key(|i| procedure.params[*i].ty.is_array()) {
            let param = &procedure.params[index];
            let LoweredType { ty, dims } = self.lower_type(&param.ty, true)?;
            let ty = if intents[index].is_by_reference() {
                TargetType::pointer_to(ty)
            } else {
                ty
            };
            self.scopes.declare(
                param.name.clone(),
                Symbol {
                    ty: ty.clone(),
                    source_ty: param.ty.clone(),
                    dims: dims.clone(),
                },
            );
            params[index] = Some(Parameter {
                name: param.name.clone(),
                ty,
                dims,
            });
        }
        let params: Vec<Parameter> = params.into_iter().flatten().collect();

        let return_type = match procedure.return_type() {
            Some(source_ty) => {
                let ty = self.lower_type(source_ty, false)?.ty;
                self.scopes.declare(
                    RETURN_VALUE,
                    Symbol {
                        ty: ty.clone(),
                        source_ty: source_ty.clone(),
                        dims: None,
                    },
                );
                self.scopes.append(TargetStmt::Declaration(VariableDeclaration::new(
                    RETURN_VALUE,
                    ty.clone(),
                    None,
                )));
                ty
            }
            None => TargetType::Void,
        };

        self.enclosing.push(EnclosingProcedure {
            name: procedure.name.clone(),
            return_type: procedure.return_type().cloned(),
            params: procedure.param_names().map(str::to_string).collect(),
        });
        let walked = walk(self, &procedure.body);
        self.enclosing.pop();
        let body = self.scopes.pop().unwrap_or_default();
        walked?;

        let function = FunctionDeclaration {
            name: procedure.name.clone(),
            return_type,
            params,
            body: Some(Block::new(body)),
        };
        debug!("lowered {}", function.signature());
        self.scopes.append(TargetStmt::Function(function));
        Ok(())
    }

    /// Lower `do counter = init, bound [, step]`
    ///
    /// Bound and step are evaluated once into temporaries. With an explicit
    /// step the direction is fixed before the first iteration.
    pub(crate) fn lower_do_loop(&mut self, do_loop: &DoLoop) -> TranslateResult<()> {
        let SourceExpr::Binary { op: BinaryOperator::Assign, lhs: counter, .. } = &do_loop.init else {
            return Err(TranslateError::UnsupportedForm(format!(
                "do loop initialization is a {}, not an assignment",
                do_loop.init.kind_name()
            )));
        };
        if !matches!(**counter, SourceExpr::Var(_)) {
            return Err(TranslateError::UnsupportedForm(format!(
                "do loop counter is a {}, not a variable",
                counter.kind_name()
            )));
        }

        let init = self.translate_expr(&do_loop.init, None)?;
        let counter = self.translate_expr(counter, None)?;
        self.scopes.append(TargetStmt::Expr(init));

        let bound_name = self.context.names.fresh("__fbound");
        let bound_ty = self.temporary_type(&do_loop.bound)?;
        let bound = self.translate_expr(&do_loop.bound, None)?;
        self.scopes.append(TargetStmt::Declaration(VariableDeclaration::new(
            bound_name.clone(),
            bound_ty.clone(),
            Some(bound),
        )));

        let ascending = TargetExpr::binary(BinOp::Le, counter.clone(), TargetExpr::var(bound_name.clone()));
        let (test, step) = match &do_loop.step {
            None => (
                ascending,
                TargetExpr::Unary {
                    op: UnOp::Increment,
                    operand: Box::new(counter),
                    postfix: false,
                },
            ),
            Some(step) => {
                let direction_name = self.context.names.fresh("__fdir");
                self.scopes.append(TargetStmt::Declaration(VariableDeclaration::new(
                    direction_name.clone(),
                    TargetType::int(),
                    Some(ascending.clone()),
                )));
                let descending = TargetExpr::binary(BinOp::Ge, counter.clone(), TargetExpr::var(bound_name));
                let test = TargetExpr::conditional(TargetExpr::var(direction_name), ascending, descending);

                let step_name = self.context.names.fresh("__fstep");
                let step = self.translate_expr(step, None)?;
                self.scopes.append(TargetStmt::Declaration(VariableDeclaration::new(
                    step_name.clone(),
                    bound_ty,
                    Some(step),
                )));
                (test, TargetExpr::binary(BinOp::AddAssign, counter, TargetExpr::var(step_name)))
            }
        };

        let body = self.translate_block(&do_loop.body)?;
        debug!("lowered do loop: for (; {}; {})", test, step);
        self.scopes.append(TargetStmt::For { test, step, body });
        Ok(())
    }
}
