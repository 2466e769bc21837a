// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Procedure signatures of every unit in a run
//!
//! Collected before any unit is translated so that a call can resolve a
//! callee defined in a unit that comes later in the run.

use crate::data::source::{Procedure, SourceUnit};
use indexmap::IndexMap;
use log::warn;

#[derive(Debug, Default)]
pub struct ProcedureTable<'src> {
    procedures: IndexMap<&'src str, &'src Procedure>,
}

impl<'src> ProcedureTable<'src> {
    pub fn collect(units: &'src [SourceUnit]) -> Self {
        let mut procedures = IndexMap::new();
        for unit in units {
            for procedure in unit.procedures() {
                if procedures.contains_key(procedure.name.as_str()) {
                    warn!(
                        "procedure '{}' in {} is already defined, keeping the first definition",
                        procedure.name, unit.file_name
                    );
                    continue;
                }
                procedures.insert(procedure.name.as_str(), procedure);
            }
        }
        Self { procedures }
    }

    pub fn get(&self, name: &str) -> Option<&'src Procedure> {
        self.procedures.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
