// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Cross-unit module resolution
//!
//! Every recorded `use` becomes an include of the header generated for the
//! unit that defines the module.

use crate::data::statements::Include;
use crate::data::unit::TargetUnit;
use crate::data::UnitId;
use crate::error::TranslateError;
use crate::options::{base_name, TranslatorOptions};
use crate::translation::context::TranslationContext;
use log::{debug, warn};

/// Add module includes to the translated units
///
/// `units` is indexed by `UnitId`; failed units are `None`. A unit using a
/// module that no surviving unit defines is dropped (set to `None`), which
/// may in turn strand the users of its own modules, so drops are repeated
/// until every remaining edge resolves. Includes are added only then. Returns
/// one error per dropped unit.
pub fn link(
    context: &TranslationContext<'_>,
    options: &TranslatorOptions,
    units: &mut [Option<TargetUnit>],
) -> Vec<(UnitId, TranslateError)> {
    let mut failures = Vec::new();

    loop {
        let unresolved = context.use_edges.iter().find(|edge| {
            matches!(units.get(edge.unit), Some(Some(_))) && defining_unit(context, units, &edge.module).is_none()
        });
        let Some(edge) = unresolved else {
            break;
        };
        warn!("dropping unit {}: module '{}' is unresolved", edge.unit, edge.module);
        units[edge.unit] = None;
        failures.push((edge.unit, TranslateError::UnresolvedModule(edge.module.clone())));
    }

    for edge in &context.use_edges {
        let Some(header) = defining_unit(context, units, &edge.module)
            .map(|defining| base_name(&options.header_file_name(&defining.file_name)))
        else {
            continue;
        };
        if let Some(Some(consumer)) = units.get_mut(edge.unit) {
            debug!("{} uses {} via {}", consumer.file_name, edge.module, header);
            consumer.add_include(Include::local(header));
        }
    }

    failures
}

/// Surviving unit that defines `module`
fn defining_unit<'u>(
    context: &TranslationContext<'_>,
    units: &'u [Option<TargetUnit>],
    module: &str,
) -> Option<&'u TargetUnit> {
    context
        .module_map
        .get(module)
        .and_then(|defining| units.get(*defining))
        .and_then(Option::as_ref)
}
