// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation pipeline orchestrator
//!
//! Coordinates the translation of a set of source units into C units and
//! their headers. A failing unit is reported and dropped; the others go on.

use crate::analysis::ProcedureTable;
use crate::data::source::SourceUnit;
use crate::data::unit::TargetUnit;
use crate::error::TranslateError;
use crate::options::TranslatorOptions;
use crate::translation::context::TranslationContext;
use crate::translation::header_generator::generate_header;
use crate::translation::linker::link;
use crate::translation::statement_translator::translate_unit;
use log::{error, info};

/// A translated unit with its synthesized header
#[derive(Debug, Clone)]
pub struct TranslatedUnit {
    pub unit: TargetUnit,
    pub header: TargetUnit,
}

#[derive(Debug, Clone)]
pub struct UnitFailure {
    /// Source file the error is charged to
    pub file_name: String,
    pub error: TranslateError,
}

#[derive(Debug, Default)]
pub struct TranslationOutput {
    pub units: Vec<TranslatedUnit>,
    pub failures: Vec<UnitFailure>,
}

impl TranslationOutput {
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn unit(&self, file_name: &str) -> Option<&TranslatedUnit> {
        self.units.iter().find(|translated| translated.unit.file_name == file_name)
    }
}

pub struct TranslationPipeline<'opt> {
    options: &'opt TranslatorOptions,
}

impl<'opt> TranslationPipeline<'opt> {
    pub fn new(options: &'opt TranslatorOptions) -> Self {
        Self { options }
    }

    /// Run the full translation pipeline
    pub fn run(&self, sources: &[SourceUnit]) -> TranslationOutput {
        let mut failures = Vec::new();

        // Step 1: Collect every procedure so calls resolve regardless of unit order
        let procedures = ProcedureTable::collect(sources);
        info!("Collected {} procedures from {} units", procedures.len(), sources.len());
        let mut context = TranslationContext::new(procedures);

        // Step 2: Translate each unit; failed units leave no trace in the context
        let mut translated: Vec<Option<TargetUnit>> = Vec::with_capacity(sources.len());
        for (unit_id, source) in sources.iter().enumerate() {
            match translate_unit(&mut context, self.options, unit_id, source) {
                Ok(unit) => translated.push(Some(unit)),
                Err(err) => {
                    error!("{}: {}", source.file_name, err);
                    failures.push(UnitFailure {
                        file_name: source.file_name.clone(),
                        error: err,
                    });
                    translated.push(None);
                }
            }
        }

        // Step 3: Resolve `use` statements into header includes; units left
        // with an unresolved module are dropped by the linker
        for (unit_id, err) in link(&context, self.options, &mut translated) {
            error!("{}: {}", sources[unit_id].file_name, err);
            failures.push(UnitFailure {
                file_name: sources[unit_id].file_name.clone(),
                error: err,
            });
        }

        // Step 4: Synthesize one header per translated unit
        let mut units = Vec::new();
        for (unit_id, unit) in translated.into_iter().enumerate() {
            let Some(mut unit) = unit else {
                continue;
            };
            match generate_header(&mut unit, self.options) {
                Ok(header) => units.push(TranslatedUnit { unit, header }),
                Err(err) => {
                    error!("{}: {}", sources[unit_id].file_name, err);
                    failures.push(UnitFailure {
                        file_name: sources[unit_id].file_name.clone(),
                        error: err,
                    });
                }
            }
        }

        info!("Translated {} units, {} failed", units.len(), failures.len());
        TranslationOutput { units, failures }
    }
}
