// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Parameter directionality resolution
//!
//! Intents are declared by qualifiers on declarations inside the procedure
//! body, in any order. The scan stops as soon as every parameter has been
//! seen and results are reported in parameter order.

use crate::data::source::{Procedure, SourceNode};
use crate::data::types::Intent;
use crate::error::{TranslateError, TranslateResult};
use indexmap::IndexMap;
use std::ops::ControlFlow;

/// Resolve one intent per parameter, aligned with the declared parameter order
pub fn resolve_intents(procedure: &Procedure) -> TranslateResult<Vec<Intent>> {
    let mut found: IndexMap<&str, Intent> = IndexMap::new();
    if !procedure.params.is_empty() {
        let _ = scan(&procedure.body, procedure, &mut found);
    }

    procedure
        .params
        .iter()
        .map(|param| {
            found.get(param.name.as_str()).copied().ok_or_else(|| TranslateError::MissingIntent {
                procedure: procedure.name.clone(),
                parameter: param.name.clone(),
            })
        })
        .collect()
}

fn scan<'a>(
    nodes: &'a [SourceNode],
    procedure: &Procedure,
    found: &mut IndexMap<&'a str, Intent>,
) -> ControlFlow<()> {
    for node in nodes {
        match node {
            SourceNode::VariableDeclaration(decl) => {
                for var in &decl.variables {
                    if procedure.param_names().any(|p| p == var.name) {
                        // arrays are never passed through an extra pointer
                        let intent = if var.ty.is_array() { Intent::In } else { decl.intent };
                        found.insert(var.name.as_str(), intent);
                    }
                }
                if found.len() == procedure.params.len() {
                    return ControlFlow::Break(());
                }
            }
            // contained procedures declare their own parameters
            SourceNode::Procedure(_) => {}
            other => {
                for child in other.children() {
                    scan(std::slice::from_ref(child), procedure, found)?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}
