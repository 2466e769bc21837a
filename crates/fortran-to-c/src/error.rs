// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::data::Language;
use thiserror::Error;

/// Every failure is terminal for the unit being translated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    // Input shapes with no lowering rule
    #[error("Unhandled construct: {kind}")]
    UnhandledConstruct { kind: String },
    #[error("Unhandled type: {kind}")]
    UnhandledType { kind: String },
    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    // Recognized construct in a shape that cannot be lowered
    #[error("Unsupported form: {0}")]
    UnsupportedForm(String),

    // Ordering or invariant violations inside the engine
    #[error("No intent recorded for parameter '{parameter}' of '{procedure}'")]
    MissingIntent { procedure: String, parameter: String },
    #[error("No array metadata for '{0}'")]
    MissingArrayMetadata(String),
    #[error("Module '{0}' is not defined by any translated unit")]
    UnresolvedModule(String),
    #[error("Unit '{unit}' must be tagged {expected}")]
    WrongLanguage { unit: String, expected: Language },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslateError {
    pub fn unhandled_construct(kind: impl Into<String>) -> Self {
        TranslateError::UnhandledConstruct { kind: kind.into() }
    }

    pub fn unhandled_type(kind: impl Into<String>) -> Self {
        TranslateError::UnhandledType { kind: kind.into() }
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;
