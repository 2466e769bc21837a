// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Multi-dimensional subscripts to flat offsets
//!
//! `offset = Σ (index[i] - lower[i]) * sizes[i - 1]`, with an implicit stride
//! of 1 for the first dimension.

use crate::analysis::constant_folding::{add, mul, sub};
use crate::data::expressions::TargetExpr;
use crate::data::types::DimInfo;
use crate::error::{TranslateError, TranslateResult};
use std::iter;

/// Flat element offset of `indices` (source dimension order) into `name`
pub fn linearize(name: &str, dims: &DimInfo, indices: Vec<TargetExpr>) -> TranslateResult<TargetExpr> {
    if indices.len() != dims.rank() {
        return Err(TranslateError::UnsupportedForm(format!(
            "'{}' has {} dimensions but is subscripted with {} indices",
            name,
            dims.rank(),
            indices.len()
        )));
    }

    let strides = iter::once(TargetExpr::Int(1)).chain(dims.sizes.iter().cloned());
    let offset = indices
        .into_iter()
        .zip(dims.lower_bounds.iter())
        .zip(strides)
        .fold(TargetExpr::Int(0), |offset, ((index, lower), stride)| {
            add(offset, mul(sub(index, lower.clone()), stride))
        });
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn static_dims(bounds: &[(i64, i64)]) -> DimInfo {
        let mut sizes = Vec::new();
        let mut running = 1;
        for (i, (lo, hi)) in bounds.iter().enumerate() {
            if i > 0 {
                sizes.push(TargetExpr::Int(running));
            }
            running *= hi - lo + 1;
        }
        DimInfo {
            lower_bounds: bounds.iter().map(|(lo, _)| TargetExpr::Int(*lo)).collect(),
            sizes,
        }
    }

    #[test]
    fn test_matches_canonical_formula_for_all_indices() {
        let bounds = [(1, 3), (0, 2), (-1, 1)];
        let dims = static_dims(&bounds);
        for index in bounds.iter().map(|(lo, hi)| *lo..=*hi).multi_cartesian_product() {
            let expected = (index[0] - 1) + (index[1] - 0) * 3 + (index[2] + 1) * 9;
            let offset = linearize("a", &dims, index.iter().map(|i| TargetExpr::Int(*i)).collect()).unwrap();
            assert_eq!(offset, TargetExpr::Int(expected), "index {:?}", index);
        }
    }

    #[test]
    fn test_lower_corner_is_zero() {
        let dims = static_dims(&[(5, 9), (-3, 3)]);
        let offset = linearize("a", &dims, vec![TargetExpr::Int(5), TargetExpr::Int(-3)]).unwrap();
        assert_eq!(offset, TargetExpr::Int(0));
    }

    #[test]
    fn test_symbolic_indices_elide_identities() {
        let dims = static_dims(&[(1, 10), (0, 4)]);
        let offset = linearize("a", &dims, vec![TargetExpr::var("i"), TargetExpr::var("j")]).unwrap();
        assert_eq!(offset.to_string(), "i - 1 + j * 10");

        let one_based = static_dims(&[(0, 7)]);
        let offset = linearize("v", &one_based, vec![TargetExpr::var("k")]).unwrap();
        assert_eq!(offset, TargetExpr::var("k"));
    }

    #[test]
    fn test_rank_mismatch_is_rejected() {
        let dims = static_dims(&[(1, 2), (1, 2)]);
        assert!(matches!(
            linearize("a", &dims, vec![TargetExpr::Int(1)]),
            Err(TranslateError::UnsupportedForm(_))
        ));
    }
}
