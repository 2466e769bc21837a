// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Statement-level lowering of one source unit
//!
//! `UnitTranslator` walks the unit top-down. Every construct with a lowering
//! rule translates its own children and tells the walker to skip them;
//! transparent markers let the walker descend. Expression lowering lives in
//! `expression_translator`, procedures and loops in `procedure_translator`.

use crate::data::expressions::TargetExpr;
use crate::data::scope::{ScopeStack, Symbol};
use crate::data::source::{
    Format, IfStatement, SourceExpr, SourceNode, SourceType, SourceUnit, VariableDeclaration,
};
use crate::data::statements::{self, Block, Include, TargetStmt};
use crate::data::types::LoweredType;
use crate::data::unit::TargetUnit;
use crate::data::{Language, UnitId};
use crate::error::{TranslateError, TranslateResult};
use crate::options::TranslatorOptions;
use crate::translation::context::TranslationContext;
use crate::translation::type_mapper;
use crate::translation::walker::{walk, Directive, Visitor};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Name of the implicit result variable of every function
pub const RETURN_VALUE: &str = "__retv";

/// Procedure whose body is being walked
pub(crate) struct EnclosingProcedure {
    pub name: String,
    /// `Some` for functions
    pub return_type: Option<SourceType>,
    /// Parameters must not be re-declared inside the body
    pub params: Vec<String>,
}

pub struct UnitTranslator<'a, 'src> {
    pub(crate) context: &'a mut TranslationContext<'src>,
    pub(crate) options: &'a TranslatorOptions,
    pub(crate) scopes: ScopeStack,
    /// Includes required by the statements lowered so far
    pub(crate) includes: BTreeSet<Include>,
    pub(crate) enclosing: Vec<EnclosingProcedure>,
    unit_id: UnitId,
    /// Modules defined and used by this unit, committed on success only
    modules: Vec<String>,
    uses: Vec<String>,
}

/// Translate one source unit into a target unit
///
/// On failure nothing is recorded in `context`; the partial output is dropped.
pub fn translate_unit(
    context: &mut TranslationContext<'_>,
    options: &TranslatorOptions,
    unit_id: UnitId,
    source: &SourceUnit,
) -> TranslateResult<TargetUnit> {
    if source.language != Language::Fortran {
        return Err(TranslateError::WrongLanguage {
            unit: source.file_name.clone(),
            expected: Language::Fortran,
        });
    }
    let template = options.template_path()?;

    info!("Translating {}", source.file_name);
    let mut translator = UnitTranslator::new(context, options, unit_id);
    walk(&mut translator, &source.body)?;
    Ok(translator.finish(options.target_file_name(&source.file_name), template))
}

impl<'a, 'src> UnitTranslator<'a, 'src> {
    pub(crate) fn new(
        context: &'a mut TranslationContext<'src>,
        options: &'a TranslatorOptions,
        unit_id: UnitId,
    ) -> Self {
        Self {
            context,
            options,
            scopes: ScopeStack::new(),
            includes: BTreeSet::new(),
            enclosing: Vec::new(),
            unit_id,
            modules: Vec::new(),
            uses: Vec::new(),
        }
    }

    fn finish(self, file_name: String, template: PathBuf) -> TargetUnit {
        for module in self.modules {
            self.context.define_module(module, self.unit_id);
        }
        for module in self.uses {
            self.context.add_use(self.unit_id, module);
        }

        let mut unit = TargetUnit::new(file_name, template);
        for include in self.includes {
            unit.add_include(include);
        }
        unit.add_include(Include::system("math.h"));
        unit.globals = self.scopes.into_globals();
        unit
    }

    pub(crate) fn lower_type(&mut self, ty: &SourceType, is_parameter: bool) -> TranslateResult<LoweredType> {
        type_mapper::lower_type(ty, is_parameter, &mut |bound: &SourceExpr| self.translate_expr(bound, None))
    }

    /// Walk `nodes` in a fresh scope and return what they produced
    pub(crate) fn translate_block(&mut self, nodes: &[SourceNode]) -> TranslateResult<Block> {
        self.scopes.push();
        let walked = walk(self, nodes);
        let statements = self.scopes.pop().unwrap_or_default();
        walked?;
        Ok(Block::new(statements))
    }

    /// Enclosing procedure that owns a parameter called `name`
    fn parameter_owner(&self, name: &str) -> Option<&str> {
        self.enclosing
            .last()
            .filter(|procedure| procedure.params.iter().any(|p| p == name))
            .map(|procedure| procedure.name.as_str())
    }

    fn lower_declaration(&mut self, decl: &VariableDeclaration) -> TranslateResult<()> {
        for var in &decl.variables {
            if let Some(owner) = self.parameter_owner(&var.name) {
                debug!("skipping re-declaration of parameter '{}' of {}", var.name, owner);
                continue;
            }
            let LoweredType { ty, dims } = self.lower_type(&var.ty, false)?;
            let initializer = var
                .initializer
                .as_ref()
                .map(|init| self.translate_expr(init, None))
                .transpose()?;
            debug!("declaring {}", ty.declarator(&var.name));

            self.scopes.declare(
                var.name.clone(),
                Symbol {
                    ty: ty.clone(),
                    source_ty: var.ty.clone(),
                    dims: dims.clone(),
                },
            );
            let mut target = statements::VariableDeclaration::new(var.name.clone(), ty, initializer);
            target.dims = dims;
            self.scopes.append(TargetStmt::Declaration(target));
        }
        Ok(())
    }

    fn lower_return(&mut self) -> TranslateResult<()> {
        let value = match self.enclosing.last() {
            Some(procedure) if procedure.return_type.is_some() => Some(TargetExpr::var(RETURN_VALUE)),
            Some(_) => None,
            None => {
                return Err(TranslateError::UnsupportedForm(
                    "return outside of a procedure".to_string(),
                ))
            }
        };
        self.scopes.append(TargetStmt::Return(value));
        Ok(())
    }

    fn lower_if(&mut self, if_stmt: &IfStatement) -> TranslateResult<()> {
        let condition = self.translate_expr(&if_stmt.condition, None)?;
        let then_block = self.translate_block(&if_stmt.then_body)?;
        let else_block = match &if_stmt.else_body {
            Some(body) => Some(self.translate_block(body)?),
            None => None,
        };
        self.scopes.append(TargetStmt::If {
            condition,
            then_block,
            else_block,
        });
        Ok(())
    }

    /// Format string for list-directed I/O of `items`
    fn format_string(&self, format: &Format, items: &[SourceExpr]) -> TranslateResult<String> {
        if let Format::Explicit(format) = format {
            return Err(TranslateError::UnsupportedForm(format!("explicit format '{}'", format)));
        }
        let mut result = String::new();
        for item in items {
            result.push_str(self.format_specifier(item)?);
        }
        result.push('\n');
        Ok(result)
    }

    fn format_specifier(&self, item: &SourceExpr) -> TranslateResult<&'static str> {
        match self.static_type(item) {
            Some(SourceType::String) => Ok("%s"),
            Some(SourceType::Integer { .. }) => Ok("%d"),
            Some(ty @ SourceType::Real { .. }) => Ok(if ty.literal_kind() == Some(8) { "%lf" } else { "%f" }),
            Some(SourceType::Character) => Ok("%c"),
            Some(other) => Err(TranslateError::unhandled_type(format!("{} in I/O list", other.kind_name()))),
            None => Err(TranslateError::unhandled_type(format!("{} in I/O list", item.kind_name()))),
        }
    }

    fn runtime_file(&mut self, unit: &SourceExpr) -> TranslateResult<TargetExpr> {
        self.includes.insert(Include::system(self.options.runtime_header.clone()));
        Ok(TargetExpr::call("ftc__get_file", vec![self.translate_expr(unit, None)?]))
    }

    /// `print` and `write`; a unit number goes through the runtime file table
    fn lower_output(&mut self, unit: Option<&SourceExpr>, format: &Format, items: &[SourceExpr]) -> TranslateResult<()> {
        let format = self.format_string(format, items)?;
        let mut args = Vec::with_capacity(items.len() + 2);
        let function = match unit {
            Some(unit) => {
                args.push(self.runtime_file(unit)?);
                "fprintf"
            }
            None => "printf",
        };
        args.push(TargetExpr::Str(format));
        for item in items {
            args.push(self.translate_expr(item, None)?);
        }
        self.includes.insert(Include::system("stdio.h"));
        self.scopes.append(TargetStmt::Expr(TargetExpr::call(function, args)));
        Ok(())
    }

    fn lower_input(&mut self, unit: Option<&SourceExpr>, format: &Format, items: &[SourceExpr]) -> TranslateResult<()> {
        let format = self.format_string(format, items)?;
        let mut args = Vec::with_capacity(items.len() + 2);
        let function = match unit {
            Some(unit) => {
                args.push(self.runtime_file(unit)?);
                "fscanf"
            }
            None => "scanf",
        };
        args.push(TargetExpr::Str(format));
        for item in items {
            args.push(self.translate_expr(item, None)?.into_reference());
        }
        self.includes.insert(Include::system("stdio.h"));
        self.scopes.append(TargetStmt::Expr(TargetExpr::call(function, args)));
        Ok(())
    }

    fn lower_open(&mut self, unit: &SourceExpr, file: &SourceExpr) -> TranslateResult<()> {
        let args = vec![self.translate_expr(unit, None)?, self.translate_expr(file, None)?];
        self.includes.insert(Include::system(self.options.runtime_header.clone()));
        self.scopes.append(TargetStmt::Expr(TargetExpr::call("ftc__open_file", args)));
        Ok(())
    }

    fn lower_close(&mut self, unit: &SourceExpr) -> TranslateResult<()> {
        let args = vec![self.translate_expr(unit, None)?];
        self.includes.insert(Include::system(self.options.runtime_header.clone()));
        self.scopes.append(TargetStmt::Expr(TargetExpr::call("ftc__close_file", args)));
        Ok(())
    }
}

impl Visitor for UnitTranslator<'_, '_> {
    fn visit(&mut self, node: &SourceNode) -> TranslateResult<Directive> {
        match node {
            SourceNode::Module { name, .. } => {
                debug!("module {} defined by unit {}", name, self.unit_id);
                self.modules.push(name.clone());
                return Ok(Directive::Descend);
            }
            SourceNode::Use { module } => self.uses.push(module.clone()),
            SourceNode::Procedure(procedure) => self.lower_procedure(procedure)?,
            SourceNode::VariableDeclaration(decl) => self.lower_declaration(decl)?,
            SourceNode::ExprStatement(expr) => {
                let expr = self.translate_expr(expr, None)?;
                self.scopes.append(TargetStmt::Expr(expr));
            }
            SourceNode::Do(do_loop) => self.lower_do_loop(do_loop)?,
            SourceNode::Return => self.lower_return()?,
            SourceNode::If(if_stmt) => self.lower_if(if_stmt)?,
            SourceNode::Print { format, items } => self.lower_output(None, format, items)?,
            SourceNode::Write { unit, format, items } => self.lower_output(unit.as_ref(), format, items)?,
            SourceNode::Read { unit, format, items } => self.lower_input(unit.as_ref(), format, items)?,
            SourceNode::Open { unit, file } => self.lower_open(unit, file)?,
            SourceNode::Close { unit } => self.lower_close(unit)?,
            SourceNode::Contains
            | SourceNode::TypeDefinition { .. }
            | SourceNode::Implicit
            | SourceNode::Block(_) => return Ok(Directive::Descend),
            SourceNode::Unknown { kind } => return Err(TranslateError::unhandled_construct(kind.clone())),
        }
        Ok(Directive::Skip)
    }
}
