// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation from Fortran source trees to C target trees
//!
//! - statement_translator: walks one unit and lowers statements
//! - expression_translator: expressions, calls and argument hoisting
//! - procedure_translator: procedures and counting loops
//! - type_mapper / linearizer: types, array layout and flat indexing
//! - linker / header_generator: cross-unit includes and headers
//! - pipeline: runs all of the above over a set of units

pub mod context;
pub mod expression_translator;
pub mod header_generator;
pub mod linearizer;
pub mod linker;
pub mod pipeline;
pub mod procedure_translator;
pub mod statement_translator;
pub mod type_mapper;
pub mod walker;

pub use context::{TranslationContext, UseEdge};
pub use pipeline::{TranslatedUnit, TranslationOutput, TranslationPipeline, UnitFailure};
pub use statement_translator::translate_unit;
