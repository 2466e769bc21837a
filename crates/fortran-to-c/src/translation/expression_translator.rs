// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Expression lowering
//!
//! Translation is pure except for argument lists: when a by-reference argument
//! has no address, every argument of that call is hoisted into an `__argN`
//! temporary in the currently open scope, preserving evaluation order.

use crate::analysis::resolve_intents;
use crate::data::expressions::{BinOp, TargetExpr, UnOp};
use crate::data::source::{BinaryOperator, Literal, Parameter, SourceExpr, SourceType, UnaryOperator};
use crate::data::statements::{Include, TargetStmt, VariableDeclaration};
use crate::data::types::{Intent, TargetType};
use crate::error::{TranslateError, TranslateResult};
use crate::translation::linearizer::linearize;
use crate::translation::type_mapper::lower_scalar;
use crate::translation::statement_translator::{UnitTranslator, RETURN_VALUE};
use log::{debug, warn};

impl UnitTranslator<'_, '_> {
    /// Lower `expr`; `call_intents` is only meaningful for argument lists
    pub fn translate_expr(&mut self, expr: &SourceExpr, call_intents: Option<&[Intent]>) -> TranslateResult<TargetExpr> {
        match expr {
            SourceExpr::Var(name) => Ok(self.translate_var(name)),
            SourceExpr::Literal(literal) => Ok(translate_literal(literal)),
            SourceExpr::Unary { op, operand, postfix } => {
                let operand = self.translate_expr(operand, None)?;
                Ok(translate_unary(*op, operand, *postfix))
            }
            SourceExpr::Binary { op, lhs, rhs } => {
                let lhs = self.translate_expr(lhs, None)?;
                let rhs = self.translate_expr(rhs, None)?;
                match map_binary(*op) {
                    Some(op) => Ok(TargetExpr::binary(op, lhs, rhs)),
                    None => Ok(self.translate_power(expr, lhs, rhs)),
                }
            }
            SourceExpr::Subscript { array, indices } => self.translate_subscript(array, indices),
            // a function's own name used as a value is its result variable
            SourceExpr::FunctionRef(_) => Ok(TargetExpr::var(RETURN_VALUE)),
            SourceExpr::Call { callee, args } => self.translate_call(callee, args, call_intents),
            SourceExpr::Unknown { kind } => Err(TranslateError::unhandled_construct(kind.clone())),
        }
    }

    /// `pow(lhs, rhs)`, cast back to `int` when the source result is integral
    fn translate_power(&self, expr: &SourceExpr, lhs: TargetExpr, rhs: TargetExpr) -> TargetExpr {
        let power = TargetExpr::call("pow", vec![lhs, rhs]);
        if self.static_type(expr).is_some_and(|ty| ty.is_integral()) {
            TargetExpr::cast(TargetType::int(), power)
        } else {
            power
        }
    }

    fn translate_var(&self, name: &str) -> TargetExpr {
        match self.scopes.lookup(name) {
            None => {
                warn!("unresolved reference to '{}'", name);
                TargetExpr::var(name)
            }
            // by-reference scalar
            Some(symbol) if symbol.ty.is_pointer() && symbol.dims.is_none() => {
                TargetExpr::deref(TargetExpr::var(name))
            }
            Some(_) => TargetExpr::var(name),
        }
    }

    fn translate_subscript(&mut self, array: &SourceExpr, indices: &[SourceExpr]) -> TranslateResult<TargetExpr> {
        let SourceExpr::Var(name) = array else {
            return Err(TranslateError::UnsupportedForm(format!(
                "subscript applied to {}",
                array.kind_name()
            )));
        };
        let dims = self
            .scopes
            .lookup(name)
            .and_then(|symbol| symbol.dims.clone())
            .ok_or_else(|| TranslateError::MissingArrayMetadata(name.clone()))?;

        let indices = indices
            .iter()
            .map(|index| self.translate_expr(index, None))
            .collect::<TranslateResult<Vec<_>>>()?;
        let offset = linearize(name, &dims, indices)?;
        Ok(TargetExpr::Index {
            array: Box::new(TargetExpr::var(name.clone())),
            index: Box::new(offset),
        })
    }

    fn translate_call(
        &mut self,
        callee: &str,
        args: &[SourceExpr],
        call_intents: Option<&[Intent]>,
    ) -> TranslateResult<TargetExpr> {
        if let Some(procedure) = self.context.procedures.get(callee) {
            let intents = resolve_intents(procedure)?;
            if intents.len() != args.len() {
                return Err(TranslateError::UnsupportedForm(format!(
                    "'{}' takes {} arguments but is called with {}",
                    callee,
                    intents.len(),
                    args.len()
                )));
            }
            let args = self.translate_arguments(args, Some((intents.as_slice(), procedure.params.as_slice())))?;
            return Ok(TargetExpr::call(callee, args));
        }

        if call_intents.is_some() {
            debug!("intents supplied for intrinsic call '{}' are ignored", callee);
        }
        let translated = self.translate_arguments(args, None)?;
        self.redirect_intrinsic(callee, args, translated)
    }

    /// Intrinsics that have no same-named C counterpart
    fn redirect_intrinsic(
        &mut self,
        callee: &str,
        source_args: &[SourceExpr],
        mut args: Vec<TargetExpr>,
    ) -> TranslateResult<TargetExpr> {
        let arity = match callee {
            "abs" | "int" | "logical" | "ichar" | "real" => Some(1),
            "get_environment_variable" => Some(2),
            _ => None,
        };
        if let Some(arity) = arity {
            if args.len() != arity {
                return Err(TranslateError::UnsupportedForm(format!(
                    "intrinsic '{}' takes {} arguments, got {}",
                    callee,
                    arity,
                    args.len()
                )));
            }
        }

        match callee {
            "abs" => {
                let integral = self.static_type(&source_args[0]).is_some_and(|ty| ty.is_integral());
                Ok(TargetExpr::call(if integral { "abs" } else { "fabs" }, args))
            }
            "int" | "logical" | "ichar" => Ok(TargetExpr::cast(TargetType::int(), args.remove(0))),
            "real" => Ok(TargetExpr::cast(TargetType::double(), args.remove(0))),
            "get_environment_variable" => {
                self.includes.insert(Include::system("stdlib.h"));
                let value = args.remove(1);
                let name = args.remove(0);
                Ok(TargetExpr::assign(value, TargetExpr::call("getenv", vec![name])))
            }
            _ => Ok(TargetExpr::call(callee, args)),
        }
    }

    /// Lower a call's argument list against the callee's intents and parameters
    pub(crate) fn translate_arguments(
        &mut self,
        args: &[SourceExpr],
        signature: Option<(&[Intent], &[Parameter])>,
    ) -> TranslateResult<Vec<TargetExpr>> {
        // each argument is translated exactly once, nested calls may hoist
        let translated = args
            .iter()
            .map(|arg| self.translate_expr(arg, None))
            .collect::<TranslateResult<Vec<_>>>()?;

        let Some((intents, params)) = signature else {
            return Ok(translated);
        };

        let needs_temporary: Vec<bool> = translated
            .iter()
            .zip(intents)
            .map(|(value, intent)| {
                intent.is_by_reference() && !matches!(value, TargetExpr::Deref(_) | TargetExpr::Var(_))
            })
            .collect();

        if !needs_temporary.iter().any(|needs| *needs) {
            return Ok(translated
                .into_iter()
                .zip(intents)
                .map(|(value, intent)| if intent.is_by_reference() { value.into_reference() } else { value })
                .collect());
        }

        // hoist every argument so evaluation order stays left to right
        let mut result = Vec::with_capacity(translated.len());
        for ((value, needs), param) in translated.into_iter().zip(needs_temporary).zip(params) {
            let name = self.context.names.fresh("__arg");
            // the temporary must match what the callee receives
            let ty = argument_type(&param.ty)?;
            debug!("hoisting argument into {} {}", ty, name);
            self.scopes.append(TargetStmt::Declaration(VariableDeclaration::new(
                name.clone(),
                ty,
                Some(value),
            )));
            let temporary = TargetExpr::var(name);
            result.push(if needs { TargetExpr::address_of(temporary) } else { temporary });
        }
        Ok(result)
    }

    /// Type of a temporary holding `expr`, `int` when it cannot be inferred
    pub(crate) fn temporary_type(&mut self, expr: &SourceExpr) -> TranslateResult<TargetType> {
        match self.static_type(expr) {
            Some(ty) => Ok(self.lower_type(&ty, true)?.ty),
            None => Ok(TargetType::int()),
        }
    }

    /// Source type of `expr` as far as it can be determined statically
    pub fn static_type(&self, expr: &SourceExpr) -> Option<SourceType> {
        match expr {
            SourceExpr::Var(name) => self.scopes.lookup(name).map(|symbol| symbol.source_ty.clone()),
            SourceExpr::Literal(literal) => Some(match literal {
                Literal::Bool(_) => SourceType::Logical,
                Literal::Int(_) => SourceType::integer(),
                Literal::Real(_) => SourceType::real(),
                Literal::Double(_) => SourceType::real_kind(8),
                Literal::Char(_) => SourceType::Character,
                Literal::Str(_) => SourceType::String,
            }),
            SourceExpr::Unary { op: UnaryOperator::Not, .. } => Some(SourceType::Logical),
            SourceExpr::Unary { operand, .. } => self.static_type(operand),
            SourceExpr::Binary { op, lhs, rhs } => {
                if op.is_relational() {
                    return Some(SourceType::Logical);
                }
                let lhs = self.static_type(lhs);
                if op.is_assignment() {
                    return lhs;
                }
                promote(lhs, self.static_type(rhs))
            }
            SourceExpr::Subscript { array, .. } => match self.static_type(array)? {
                SourceType::Array { base, .. } => Some(*base),
                _ => None,
            },
            SourceExpr::FunctionRef(_) => self
                .enclosing
                .last()
                .and_then(|procedure| procedure.return_type.clone()),
            SourceExpr::Call { callee, args } => match self.context.procedures.get(callee) {
                Some(procedure) => procedure.return_type().cloned(),
                None => match callee.as_str() {
                    "int" | "ichar" => Some(SourceType::integer()),
                    "logical" => Some(SourceType::Logical),
                    "real" => Some(SourceType::real_kind(8)),
                    "abs" => args.first().and_then(|arg| self.static_type(arg)),
                    _ => None,
                },
            },
            SourceExpr::Unknown { .. } => None,
        }
    }
}

/// Type of the value a parameter of type `ty` receives, arrays decayed
fn argument_type(ty: &SourceType) -> TranslateResult<TargetType> {
    match ty {
        SourceType::Array { base, .. } => Ok(TargetType::pointer_to(lower_scalar(base)?)),
        scalar => lower_scalar(scalar),
    }
}

/// Arithmetic result type: reals win over integers, wider kinds over narrower
fn promote(lhs: Option<SourceType>, rhs: Option<SourceType>) -> Option<SourceType> {
    match (lhs, rhs) {
        (Some(l @ SourceType::Real { .. }), Some(r @ SourceType::Real { .. })) => {
            if r.literal_kind().unwrap_or(4) > l.literal_kind().unwrap_or(4) {
                Some(r)
            } else {
                Some(l)
            }
        }
        (Some(SourceType::Integer { .. }), Some(r @ SourceType::Real { .. })) => Some(r),
        (Some(l), _) => Some(l),
        (None, r) => r,
    }
}

fn translate_literal(literal: &Literal) -> TargetExpr {
    match literal {
        Literal::Bool(value) => TargetExpr::Int(i64::from(*value)),
        Literal::Int(value) => TargetExpr::Int(*value),
        Literal::Real(value) => TargetExpr::Float(*value),
        Literal::Double(value) => TargetExpr::Double(*value),
        Literal::Char(value) => TargetExpr::Char(*value),
        Literal::Str(value) => TargetExpr::Str(value.clone()),
    }
}

fn translate_unary(op: UnaryOperator, operand: TargetExpr, postfix: bool) -> TargetExpr {
    let op = match op {
        UnaryOperator::Plus => return operand,
        UnaryOperator::Minus => match operand {
            TargetExpr::Int(value) => match value.checked_neg() {
                Some(negated) => return TargetExpr::Int(negated),
                None => UnOp::Neg,
            },
            TargetExpr::Float(value) => return TargetExpr::Float(-value),
            TargetExpr::Double(value) => return TargetExpr::Double(-value),
            _ => UnOp::Neg,
        },
        UnaryOperator::Not => UnOp::Not,
        UnaryOperator::BitComplement => UnOp::BitNot,
        UnaryOperator::Increment => UnOp::Increment,
        UnaryOperator::Decrement => UnOp::Decrement,
    };
    let postfix = postfix && matches!(op, UnOp::Increment | UnOp::Decrement);
    TargetExpr::Unary {
        op,
        operand: Box::new(operand),
        postfix,
    }
}

/// One-to-one operator mapping; `None` for exponentiation
fn map_binary(op: BinaryOperator) -> Option<BinOp> {
    let op = match op {
        BinaryOperator::Add => BinOp::Add,
        BinaryOperator::Subtract => BinOp::Sub,
        BinaryOperator::Multiply => BinOp::Mul,
        BinaryOperator::Divide => BinOp::Div,
        BinaryOperator::Power => return None,
        BinaryOperator::Equal => BinOp::Eq,
        BinaryOperator::NotEqual => BinOp::Neq,
        BinaryOperator::Less => BinOp::Lt,
        BinaryOperator::LessOrEqual => BinOp::Le,
        BinaryOperator::Greater => BinOp::Gt,
        BinaryOperator::GreaterOrEqual => BinOp::Ge,
        BinaryOperator::And => BinOp::And,
        BinaryOperator::Or => BinOp::Or,
        BinaryOperator::BitAnd => BinOp::BitAnd,
        BinaryOperator::BitOr => BinOp::BitOr,
        BinaryOperator::BitXor => BinOp::BitXor,
        BinaryOperator::Assign => BinOp::Assign,
        BinaryOperator::PlusAssign => BinOp::AddAssign,
        BinaryOperator::MinusAssign => BinOp::SubAssign,
        BinaryOperator::MultiplyAssign => BinOp::MulAssign,
        BinaryOperator::DivideAssign => BinOp::DivAssign,
        BinaryOperator::AndAssign => BinOp::AndAssign,
        BinaryOperator::XorAssign => BinOp::XorAssign,
    };
    Some(op)
}
