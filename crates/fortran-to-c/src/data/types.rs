// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Target type system
//!
//! Types are plain values; array layout metadata (`DimInfo`) lives on the
//! declaration that introduced it, never on the type.

use crate::data::expressions::TargetExpr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar width in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Width {
    One,
    Two,
    Four,
    Eight,
}

impl Width {
    /// Map a source kind value; anything outside {1,2,4,8} is unmapped
    pub fn from_kind(kind: i64) -> Option<Self> {
        match kind {
            1 => Some(Width::One),
            2 => Some(Width::Two),
            4 => Some(Width::Four),
            8 => Some(Width::Eight),
            _ => None,
        }
    }

    pub fn bytes(&self) -> u8 {
        match self {
            Width::One => 1,
            Width::Two => 2,
            Width::Four => 4,
            Width::Eight => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Void,
    Char,
    Int(Width),
    Float(Width),
    /// Character buffer of runtime-determined length
    String,
    /// Sized array; `size` is the total element count when known
    Array {
        element: Box<TargetType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Box<TargetExpr>>,
    },
    Pointer(Box<TargetType>),
}

impl TargetType {
    pub fn int() -> Self {
        TargetType::Int(Width::Four)
    }

    pub fn double() -> Self {
        TargetType::Float(Width::Eight)
    }

    pub fn pointer_to(base: TargetType) -> Self {
        TargetType::Pointer(Box::new(base))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TargetType::Pointer(_))
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, TargetType::Int(_))
    }

    /// C declarator for `name` of this type, e.g. `int a[9]` or `double* v`
    pub fn declarator(&self, name: &str) -> String {
        match self {
            TargetType::Array { element, size: Some(size) } => format!("{} {}[{}]", element, name, size),
            TargetType::Array { element, size: None } => format!("{} {}[]", element, name),
            other => format!("{} {}", other, name),
        }
    }
}

/// Type name as written in casts and log lines; arrays show as `T[n]`, use
/// `declarator` to spell a declaration
impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Void => write!(f, "void"),
            TargetType::Char | TargetType::Int(Width::One) => write!(f, "char"),
            TargetType::Int(Width::Two) => write!(f, "short"),
            TargetType::Int(Width::Four) => write!(f, "int"),
            TargetType::Int(Width::Eight) => write!(f, "long"),
            TargetType::Float(Width::Eight) => write!(f, "double"),
            TargetType::Float(_) => write!(f, "float"),
            TargetType::String => write!(f, "char*"),
            TargetType::Array { element, size: Some(size) } => write!(f, "{}[{}]", element, size),
            TargetType::Array { element, size: None } => write!(f, "{}[]", element),
            TargetType::Pointer(base) => write!(f, "{}*", base),
        }
    }
}

/// Per-declaration array layout
///
/// `lower_bounds` has one entry per dimension; `sizes[i - 1]` is the product of
/// the extents of dimensions `0..i`, so dimension 0 has implicit stride 1 and
/// `sizes.len() == lower_bounds.len() - 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimInfo {
    pub lower_bounds: Vec<TargetExpr>,
    pub sizes: Vec<TargetExpr>,
}

impl DimInfo {
    pub fn rank(&self) -> usize {
        self.lower_bounds.len()
    }
}

/// Parameter directionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    In,
    Out,
    InOut,
    #[default]
    Default,
}

impl Intent {
    /// Everything except `In` is passed by reference
    pub fn is_by_reference(&self) -> bool {
        !matches!(self, Intent::In)
    }
}

/// Result of lowering one source type
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredType {
    pub ty: TargetType,
    pub dims: Option<DimInfo>,
}

impl LoweredType {
    pub fn scalar(ty: TargetType) -> Self {
        Self { ty, dims: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarators_put_array_extents_after_the_name() {
        let sized = TargetType::Array {
            element: Box::new(TargetType::int()),
            size: Some(Box::new(TargetExpr::Int(9))),
        };
        assert_eq!(sized.declarator("a"), "int a[9]");
        let unsized_array = TargetType::Array {
            element: Box::new(TargetType::double()),
            size: None,
        };
        assert_eq!(unsized_array.declarator("v"), "double v[]");
        assert_eq!(TargetType::pointer_to(TargetType::Char).declarator("p"), "char* p");
        assert_eq!(TargetType::Int(Width::Eight).declarator("n"), "long n");
    }
}
