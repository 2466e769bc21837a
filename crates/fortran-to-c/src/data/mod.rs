// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

pub mod expressions;
pub mod naming;
pub mod scope;
pub mod source;
pub mod statements;
pub mod types;
pub mod unit;

/// Index of a source unit within one translation run
pub type UnitId = usize;

/// Output-mode tag carried by every unit
///
/// Source units must be tagged `Fortran` before translation, translated units
/// must be tagged `C` before header generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Fortran,
    C,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Fortran => write!(f, "fortran"),
            Language::C => write!(f, "c"),
        }
    }
}
