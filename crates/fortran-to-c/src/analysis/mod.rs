// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Read-only analyses over source trees, plus the folding helpers used when
//! building index arithmetic.

pub mod constant_folding;
pub mod intent_resolver;
pub mod procedure_table;

pub use intent_resolver::resolve_intents;
pub use procedure_table::ProcedureTable;
