// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Lowering of source types to target types
//!
//! Array bounds are arbitrary expressions, so the caller supplies the
//! expression translation used for them. Arrays produce a `DimInfo` for the
//! declaration being lowered; in parameter position they decay to a pointer
//! to the element type.

use crate::analysis::constant_folding::{add, mul, sub};
use crate::data::expressions::TargetExpr;
use crate::data::source::{Dimension, SourceExpr, SourceType};
use crate::data::types::{DimInfo, LoweredType, TargetType, Width};
use crate::error::{TranslateError, TranslateResult};
use log::trace;

pub fn lower_type<F>(
    ty: &SourceType,
    is_parameter: bool,
    translate_bound: &mut F,
) -> TranslateResult<LoweredType>
where
    F: FnMut(&SourceExpr) -> TranslateResult<TargetExpr>,
{
    match ty {
        SourceType::Array { base, dims } => lower_array(base, dims, is_parameter, translate_bound),
        scalar => lower_scalar(scalar).map(LoweredType::scalar),
    }
}

pub fn lower_scalar(ty: &SourceType) -> TranslateResult<TargetType> {
    match ty {
        SourceType::Void => Ok(TargetType::Void),
        SourceType::Logical => Ok(TargetType::int()),
        SourceType::Character => Ok(TargetType::Char),
        SourceType::Integer { kind } => Ok(TargetType::Int(width(kind.as_deref())?)),
        SourceType::Real { kind } => match width(kind.as_deref())? {
            w @ (Width::Four | Width::Eight) => Ok(TargetType::Float(w)),
            w => Err(TranslateError::InvalidKind(format!("real kind {}", w.bytes()))),
        },
        SourceType::String => Ok(TargetType::String),
        other => Err(TranslateError::unhandled_type(other.kind_name())),
    }
}

/// Absent kind means the default width of 4 bytes
fn width(kind: Option<&SourceExpr>) -> TranslateResult<Width> {
    let Some(kind) = kind else {
        return Ok(Width::Four);
    };
    let value = kind
        .as_int()
        .ok_or_else(|| TranslateError::InvalidKind(format!("non-constant kind ({})", kind.kind_name())))?;
    Width::from_kind(value).ok_or_else(|| TranslateError::InvalidKind(value.to_string()))
}

fn lower_array<F>(
    base: &SourceType,
    dims: &[Dimension],
    is_parameter: bool,
    translate_bound: &mut F,
) -> TranslateResult<LoweredType>
where
    F: FnMut(&SourceExpr) -> TranslateResult<TargetExpr>,
{
    let element = lower_scalar(base)?;
    if dims.is_empty() {
        return Err(TranslateError::UnsupportedForm("array without dimensions".to_string()));
    }

    let mut lower_bounds = Vec::with_capacity(dims.len());
    let mut sizes = Vec::with_capacity(dims.len() - 1);
    let mut total = TargetExpr::Int(1);
    let mut sized = true;

    for (i, dim) in dims.iter().enumerate() {
        let (lower, extent) = match dim {
            Dimension::Range { lower, upper: Some(upper) } => {
                let lower = translate_bound(lower)?;
                let upper = translate_bound(upper)?;
                // hi - lo + 1, which folds to a literal for literal bounds
                // and to 1 + hi for a zero lower bound
                let extent = add(TargetExpr::Int(1), sub(upper, lower.clone()));
                (lower, Some(extent))
            }
            Dimension::Range { lower, upper: None } => (translate_bound(lower)?, None),
            Dimension::Extent(extent) => (TargetExpr::Int(1), Some(translate_bound(extent)?)),
            Dimension::Assumed => (TargetExpr::Int(1), None),
        };

        if extent.is_none() && i + 1 != dims.len() {
            return Err(TranslateError::UnsupportedForm(
                "assumed-size dimension must be the last one".to_string(),
            ));
        }

        if i > 0 {
            sizes.push(total.clone());
        }
        match extent {
            Some(extent) => total = mul(total, extent),
            None => sized = false,
        }
        lower_bounds.push(lower);
    }

    trace!("lowered {}-dimensional array of {}", dims.len(), element);

    let ty = if is_parameter {
        TargetType::pointer_to(element)
    } else {
        TargetType::Array {
            element: Box::new(element),
            size: sized.then(|| Box::new(total)),
        }
    };
    Ok(LoweredType {
        ty,
        dims: Some(DimInfo { lower_bounds, sizes }),
    })
}
