// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! State shared by all units of one translation run

use crate::analysis::ProcedureTable;
use crate::data::naming::NameGenerator;
use crate::data::UnitId;
use indexmap::IndexMap;
use log::warn;

/// A `use` statement waiting for the link pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseEdge {
    /// Unit containing the `use`
    pub unit: UnitId,
    pub module: String,
}

pub struct TranslationContext<'src> {
    /// Module name -> defining unit
    pub module_map: IndexMap<String, UnitId>,

    /// Use edges in the order they were encountered
    pub use_edges: Vec<UseEdge>,

    pub names: NameGenerator,

    pub procedures: ProcedureTable<'src>,
}

impl<'src> TranslationContext<'src> {
    pub fn new(procedures: ProcedureTable<'src>) -> Self {
        Self {
            module_map: IndexMap::new(),
            use_edges: Vec::new(),
            names: NameGenerator::new(),
            procedures,
        }
    }

    pub fn define_module(&mut self, name: String, unit: UnitId) {
        if let Some(previous) = self.module_map.insert(name.clone(), unit) {
            warn!("module '{}' redefined (unit {} replaces unit {})", name, unit, previous);
        }
    }

    pub fn add_use(&mut self, unit: UnitId, module: String) {
        self.use_edges.push(UseEdge { unit, module });
    }
}
