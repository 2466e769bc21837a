// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Forward-declaration header synthesis

use crate::data::statements::{Include, TargetStmt, VariableDeclaration};
use crate::data::unit::TargetUnit;
use crate::data::Language;
use crate::error::{TranslateError, TranslateResult};
use crate::options::{base_name, TranslatorOptions};
use log::debug;

/// Build the header of a translated unit and include it from the unit
///
/// Only the global scope is visited: globals become `extern` declarations
/// and function definitions become prototypes.
pub fn generate_header(unit: &mut TargetUnit, options: &TranslatorOptions) -> TranslateResult<TargetUnit> {
    if unit.language != Language::C {
        return Err(TranslateError::WrongLanguage {
            unit: unit.file_name.clone(),
            expected: Language::C,
        });
    }

    let mut header = TargetUnit::new(options.header_file_name(&unit.file_name), unit.template.clone());
    header.pragma_once = true;
    header.globals = unit
        .globals
        .iter()
        .filter_map(|stmt| match stmt {
            TargetStmt::Declaration(decl) => Some(TargetStmt::Declaration(VariableDeclaration {
                initializer: None,
                is_extern: true,
                ..decl.clone()
            })),
            TargetStmt::Function(function) => Some(TargetStmt::Function(function.prototype())),
            _ => None,
        })
        .collect();

    debug!("{}: {} forward declarations", header.file_name, header.globals.len());
    unit.add_include(Include::local(base_name(&header.file_name)));
    Ok(header)
}
