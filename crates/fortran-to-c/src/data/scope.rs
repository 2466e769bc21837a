// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Open target scopes during the translation of one unit
//!
//! The bottom frame is the unit's global scope and is never popped. Each frame
//! owns the statements appended to it and the symbols it declares.

use crate::data::source::SourceType;
use crate::data::statements::TargetStmt;
use crate::data::types::{DimInfo, TargetType};
use indexmap::IndexMap;

/// Declared name visible to expression translation
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Lowered type, pointer-wrapped for by-reference parameters
    pub ty: TargetType,
    /// Type as declared in the source, used for static typing
    pub source_ty: SourceType,
    /// Array layout; its presence marks a real array
    pub dims: Option<DimInfo>,
}

#[derive(Debug, Default)]
struct Frame {
    statements: Vec<TargetStmt>,
    symbols: IndexMap<String, Symbol>,
}

#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Close the innermost scope and return its statements
    ///
    /// Returns `None` when only the global scope is left.
    pub fn pop(&mut self) -> Option<Vec<TargetStmt>> {
        if self.frames.len() == 1 {
            return None;
        }
        self.frames.pop().map(|frame| frame.statements)
    }

    /// Append to the innermost open scope
    pub fn append(&mut self, stmt: TargetStmt) {
        if let Some(frame) = self.frames.last_mut() {
            frame.statements.push(stmt);
        }
    }

    pub fn declare(&mut self, name: impl Into<String>, symbol: Symbol) {
        if let Some(frame) = self.frames.last_mut() {
            frame.symbols.insert(name.into(), symbol);
        }
    }

    /// Innermost symbol with this name
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.symbols.get(name))
    }

    /// Consume the stack, returning the global scope statements
    pub fn into_globals(self) -> Vec<TargetStmt> {
        self.frames
            .into_iter()
            .next()
            .map(|frame| frame.statements)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::expressions::TargetExpr;

    fn int_symbol() -> Symbol {
        Symbol {
            ty: TargetType::int(),
            source_ty: SourceType::integer(),
            dims: None,
        }
    }

    #[test]
    fn test_inner_symbols_shadow_and_disappear() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", int_symbol());
        scopes.push();
        scopes.declare(
            "x",
            Symbol {
                ty: TargetType::pointer_to(TargetType::int()),
                ..int_symbol()
            },
        );
        assert!(scopes.lookup("x").is_some_and(|s| s.ty.is_pointer()));

        scopes.append(TargetStmt::Expr(TargetExpr::var("x")));
        let inner = scopes.pop().unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(scopes.lookup("x").map(|s| s.ty.clone()), Some(TargetType::int()));
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut scopes = ScopeStack::new();
        scopes.append(TargetStmt::Return(None));
        assert!(scopes.pop().is_none());
        assert_eq!(scopes.into_globals(), vec![TargetStmt::Return(None)]);
    }
}
