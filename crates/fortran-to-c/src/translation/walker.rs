// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Pre-order walk over source statements
//!
//! A visitor that fully handles a construct (including its own children)
//! answers `Skip`; structurally transparent nodes answer `Descend`.

use crate::data::source::SourceNode;
use crate::error::TranslateResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Skip,
    Descend,
}

pub trait Visitor {
    fn visit(&mut self, node: &SourceNode) -> TranslateResult<Directive>;
}

/// Visit `nodes` in order, stopping at the first error
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, nodes: &[SourceNode]) -> TranslateResult<()> {
    for node in nodes {
        walk_node(visitor, node)?;
    }
    Ok(())
}

fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &SourceNode) -> TranslateResult<()> {
    match visitor.visit(node)? {
        Directive::Skip => Ok(()),
        Directive::Descend => {
            for child in node.children() {
                walk_node(visitor, child)?;
            }
            Ok(())
        }
    }
}
