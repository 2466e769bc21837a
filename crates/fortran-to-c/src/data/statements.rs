// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::data::expressions::TargetExpr;
use crate::data::types::{DimInfo, TargetType};
use serde::{Deserialize, Serialize};

/// Braced statement list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<TargetStmt>,
}

impl Block {
    pub fn new(statements: Vec<TargetStmt>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStmt {
    Declaration(VariableDeclaration),
    Function(FunctionDeclaration),
    Expr(TargetExpr),
    Return(Option<TargetExpr>),
    If {
        condition: TargetExpr,
        then_block: Block,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_block: Option<Block>,
    },
    /// `for (; test; step) body`; initialization is emitted before the loop
    For {
        test: TargetExpr,
        step: TargetExpr,
        body: Block,
    },
}

impl TargetStmt {
    /// Nested statement lists owned by this statement
    pub fn blocks(&self) -> Vec<&Block> {
        match self {
            TargetStmt::Function(FunctionDeclaration { body: Some(body), .. }) => vec![body],
            TargetStmt::If { then_block, else_block, .. } => {
                std::iter::once(then_block).chain(else_block.iter()).collect()
            }
            TargetStmt::For { body, .. } => vec![body],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub ty: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<TargetExpr>,
    /// `extern` storage, only set on header re-declarations
    #[serde(default)]
    pub is_extern: bool,
    /// Array layout of this particular declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<DimInfo>,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, ty: TargetType, initializer: Option<TargetExpr>) -> Self {
        Self {
            name: name.into(),
            ty,
            initializer,
            is_extern: false,
            dims: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub return_type: TargetType,
    pub params: Vec<Parameter>,
    /// `None` for a prototype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Block>,
}

impl FunctionDeclaration {
    /// Signature-only copy for forward declaration
    pub fn prototype(&self) -> Self {
        Self {
            name: self.name.clone(),
            return_type: self.return_type.clone(),
            params: self.params.clone(),
            body: None,
        }
    }

    /// C-style signature, e.g. `int f(int x, int* y)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| p.ty.declarator(&p.name))
            .collect();
        format!("{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<DimInfo>,
}

/// Preprocessor include directive
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Include {
    pub name: String,
    /// `<name>` when set, `"name"` otherwise
    pub system: bool,
}

impl Include {
    pub fn system(name: impl Into<String>) -> Self {
        Self { name: name.into(), system: true }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self { name: name.into(), system: false }
    }
}

impl std::fmt::Display for Include {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.system {
            write!(f, "#include <{}>", self.name)
        } else {
            write!(f, "#include \"{}\"", self.name)
        }
    }
}
