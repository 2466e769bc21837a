// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Fortran to C translation engine
//!
//! This crate lowers parsed Fortran units into C syntax trees plus one
//! forward-declaration header per unit. It does NOT parse Fortran nor print
//! C - the host hands over source trees and serializes the results.

pub mod analysis;
pub mod data;
pub mod error;
pub mod options;
pub mod translation;

// Public API exports
pub use error::{TranslateError, TranslateResult};
pub use options::TranslatorOptions;
pub use translation::{TranslatedUnit, TranslationOutput, TranslationPipeline, UnitFailure};

// Source tree (from data/source.rs)
pub use data::source::{SourceExpr, SourceNode, SourceType, SourceUnit};

// Target tree (from data/unit.rs, data/statements.rs, data/expressions.rs, data/types.rs)
pub use data::expressions::TargetExpr;
pub use data::statements::{FunctionDeclaration, Include, TargetStmt};
pub use data::types::{DimInfo, Intent, TargetType};
pub use data::unit::TargetUnit;
pub use data::Language;
