// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::data::statements::{FunctionDeclaration, Include, TargetStmt, VariableDeclaration};
use crate::data::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One translated (or synthesized header) compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetUnit {
    /// Output file name, e.g. `solver.c` or `solver.h`
    pub file_name: String,

    pub language: Language,

    /// Template input unit the external printer starts from
    pub template: PathBuf,

    /// Emit `#pragma once` (header units)
    #[serde(default)]
    pub pragma_once: bool,

    /// Prologue includes in emission order
    pub includes: Vec<Include>,

    /// Global scope statements
    pub globals: Vec<TargetStmt>,
}

impl TargetUnit {
    pub fn new(file_name: impl Into<String>, template: PathBuf) -> Self {
        Self {
            file_name: file_name.into(),
            language: Language::C,
            template,
            pragma_once: false,
            includes: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// Append an include unless an identical one is already present
    pub fn add_include(&mut self, include: Include) {
        if !self.includes.contains(&include) {
            self.includes.push(include);
        }
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDeclaration> {
        self.globals.iter().find_map(|stmt| match stmt {
            TargetStmt::Function(function) if function.name == name => Some(function),
            _ => None,
        })
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDeclaration> {
        self.globals.iter().find_map(|stmt| match stmt {
            TargetStmt::Declaration(decl) if decl.name == name => Some(decl),
            _ => None,
        })
    }
}
