// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Source tree handed over by the external Fortran parser
//!
//! The engine only ever reads these nodes. Every enum carries an `Unknown`
//! variant holding the parser's construct name so unsupported input surfaces
//! as a translation error instead of a deserialization failure.

use crate::data::types::Intent;
use crate::data::Language;
use serde::{Deserialize, Serialize};

/// One parsed compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Input file name, e.g. `solver.f90`
    pub file_name: String,

    /// Output-mode tag; must be `Fortran` for translation
    pub language: Language,

    /// Top-level (global scope) nodes in textual order
    pub body: Vec<SourceNode>,
}

impl SourceUnit {
    pub fn new(file_name: impl Into<String>, body: Vec<SourceNode>) -> Self {
        Self {
            file_name: file_name.into(),
            language: Language::Fortran,
            body,
        }
    }

    /// Iterate every procedure declared anywhere in this unit (pre-order)
    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> + '_ {
        fn collect<'a>(nodes: &'a [SourceNode], out: &mut Vec<&'a Procedure>) {
            for node in nodes {
                if let SourceNode::Procedure(procedure) = node {
                    out.push(procedure);
                }
                collect_children(node, out);
            }
        }
        fn collect_children<'a>(node: &'a SourceNode, out: &mut Vec<&'a Procedure>) {
            for child in node.children() {
                collect(std::slice::from_ref(child), out);
            }
        }
        let mut result = Vec::new();
        collect(&self.body, &mut result);
        result.into_iter()
    }
}

/// Statement-level construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceNode {
    /// `module name ... end module`
    Module { name: String, body: Vec<SourceNode> },

    /// `use name`
    Use { module: String },

    /// Subroutine or function definition
    Procedure(Procedure),

    /// Type declaration statement, possibly with an `intent(...)` qualifier
    VariableDeclaration(VariableDeclaration),

    /// Expression evaluated for its effect (assignments, `call` statements)
    ExprStatement(SourceExpr),

    /// Bounded counting loop `do i = init, bound [, step]`
    Do(DoLoop),

    /// `return`
    Return,

    /// `if (...) then ... [else ...] end if`
    If(IfStatement),

    /// `print fmt, items`
    Print { format: Format, items: Vec<SourceExpr> },

    /// `write (unit, fmt) items`; a missing unit means `*` (standard output)
    Write {
        unit: Option<SourceExpr>,
        format: Format,
        items: Vec<SourceExpr>,
    },

    /// `read (unit, fmt) items`; a missing unit means `*` (standard input)
    Read {
        unit: Option<SourceExpr>,
        format: Format,
        items: Vec<SourceExpr>,
    },

    /// `open (unit, file=path)`
    Open { unit: SourceExpr, file: SourceExpr },

    /// `close (unit)`
    Close { unit: SourceExpr },

    /// `contains` marker
    Contains,

    /// Derived type definition
    TypeDefinition { name: String, body: Vec<SourceNode> },

    /// `implicit none`
    Implicit,

    /// Generic block grouping
    Block(Vec<SourceNode>),

    /// Construct the engine has no lowering rule for
    Unknown { kind: String },
}

impl SourceNode {
    /// Direct structural children of this node
    pub fn children(&self) -> impl Iterator<Item = &SourceNode> + '_ {
        let children: Vec<&SourceNode> = match self {
            SourceNode::Module { body, .. }
            | SourceNode::TypeDefinition { body, .. }
            | SourceNode::Block(body) => body.iter().collect(),
            SourceNode::Procedure(procedure) => procedure.body.iter().collect(),
            SourceNode::Do(do_loop) => do_loop.body.iter().collect(),
            SourceNode::If(if_stmt) => if_stmt
                .then_body
                .iter()
                .chain(if_stmt.else_body.iter().flatten())
                .collect(),
            _ => Vec::new(),
        };
        children.into_iter()
    }

    /// Human readable construct name used in diagnostics
    pub fn kind_name(&self) -> &str {
        match self {
            SourceNode::Module { .. } => "module statement",
            SourceNode::Use { .. } => "use statement",
            SourceNode::Procedure(_) => "procedure header",
            SourceNode::VariableDeclaration(_) => "variable declaration",
            SourceNode::ExprStatement(_) => "expression statement",
            SourceNode::Do(_) => "do loop",
            SourceNode::Return => "return statement",
            SourceNode::If(_) => "if statement",
            SourceNode::Print { .. } => "print statement",
            SourceNode::Write { .. } => "write statement",
            SourceNode::Read { .. } => "read statement",
            SourceNode::Open { .. } => "open statement",
            SourceNode::Close { .. } => "close statement",
            SourceNode::Contains => "contains statement",
            SourceNode::TypeDefinition { .. } => "type definition",
            SourceNode::Implicit => "implicit statement",
            SourceNode::Block(_) => "block",
            SourceNode::Unknown { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub kind: ProcedureKind,
    /// Dummy arguments in declaration order
    pub params: Vec<Parameter>,
    pub body: Vec<SourceNode>,
}

impl Procedure {
    pub fn return_type(&self) -> Option<&SourceType> {
        match &self.kind {
            ProcedureKind::Function { return_type } => Some(return_type),
            ProcedureKind::Subroutine => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ProcedureKind::Function { .. })
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.params.iter().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureKind {
    Subroutine,
    Function { return_type: SourceType },
}

/// Dummy argument with the type the parser resolved for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: SourceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// Directionality qualifier; unqualified declarations are `Default`
    #[serde(default)]
    pub intent: Intent,
    pub variables: Vec<DeclaredVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredVariable {
    pub name: String,
    pub ty: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<SourceExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoLoop {
    /// Counter initialization, expected to be `counter = start`
    pub init: SourceExpr,
    pub bound: SourceExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<SourceExpr>,
    pub body: Vec<SourceNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: SourceExpr,
    pub then_body: Vec<SourceNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_body: Option<Vec<SourceNode>>,
}

/// Format specification of an I/O statement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// `*`
    #[default]
    ListDirected,
    /// Explicit format string or label
    Explicit(String),
}

/// Source type as resolved by the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Void,
    Logical,
    Character,
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<Box<SourceExpr>>,
    },
    Real {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<Box<SourceExpr>>,
    },
    /// `character(len=*)` and other strings without a static length
    String,
    Array {
        base: Box<SourceType>,
        dims: Vec<Dimension>,
    },
    Unknown { kind: String },
}

impl SourceType {
    pub fn integer() -> Self {
        SourceType::Integer { kind: None }
    }

    pub fn integer_kind(kind: i64) -> Self {
        SourceType::Integer {
            kind: Some(Box::new(SourceExpr::int(kind))),
        }
    }

    pub fn real() -> Self {
        SourceType::Real { kind: None }
    }

    pub fn real_kind(kind: i64) -> Self {
        SourceType::Real {
            kind: Some(Box::new(SourceExpr::int(kind))),
        }
    }

    pub fn array(base: SourceType, dims: Vec<Dimension>) -> Self {
        SourceType::Array {
            base: Box::new(base),
            dims,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, SourceType::Integer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SourceType::Array { .. })
    }

    /// Literal kind value, `None` when absent or not a literal
    pub fn literal_kind(&self) -> Option<i64> {
        match self {
            SourceType::Integer { kind: Some(kind) } | SourceType::Real { kind: Some(kind) } => {
                kind.as_int()
            }
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            SourceType::Void => "void",
            SourceType::Logical => "logical",
            SourceType::Character => "character",
            SourceType::Integer { .. } => "integer",
            SourceType::Real { .. } => "real",
            SourceType::String => "string",
            SourceType::Array { .. } => "array",
            SourceType::Unknown { kind } => kind,
        }
    }
}

/// One array dimension declarator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// `lo:hi`, or `lo:*` when `upper` is absent
    Range {
        lower: SourceExpr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<SourceExpr>,
    },
    /// Extent only, lower bound 1
    Extent(SourceExpr),
    /// Assumed size `*`
    Assumed,
}

impl Dimension {
    pub fn range(lower: i64, upper: i64) -> Self {
        Dimension::Range {
            lower: SourceExpr::int(lower),
            upper: Some(SourceExpr::int(upper)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceExpr {
    Var(String),
    Literal(Literal),
    Unary {
        op: UnaryOperator,
        operand: Box<SourceExpr>,
        #[serde(default)]
        postfix: bool,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<SourceExpr>,
        rhs: Box<SourceExpr>,
    },
    /// Array element reference `arr(i, j, ...)`
    Subscript {
        array: Box<SourceExpr>,
        indices: Vec<SourceExpr>,
    },
    /// Use of a function's own name as a value (its result variable)
    FunctionRef(String),
    Call {
        callee: String,
        args: Vec<SourceExpr>,
    },
    Unknown { kind: String },
}

impl SourceExpr {
    pub fn var(name: impl Into<String>) -> Self {
        SourceExpr::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        SourceExpr::Literal(Literal::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        SourceExpr::Literal(Literal::Str(value.into()))
    }

    pub fn unary(op: UnaryOperator, operand: SourceExpr) -> Self {
        SourceExpr::Unary {
            op,
            operand: Box::new(operand),
            postfix: false,
        }
    }

    pub fn binary(op: BinaryOperator, lhs: SourceExpr, rhs: SourceExpr) -> Self {
        SourceExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(lhs: SourceExpr, rhs: SourceExpr) -> Self {
        Self::binary(BinaryOperator::Assign, lhs, rhs)
    }

    pub fn subscript(array: impl Into<String>, indices: Vec<SourceExpr>) -> Self {
        SourceExpr::Subscript {
            array: Box::new(SourceExpr::var(array)),
            indices,
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<SourceExpr>) -> Self {
        SourceExpr::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SourceExpr::Literal(Literal::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            SourceExpr::Var(_) => "variable reference",
            SourceExpr::Literal(_) => "literal",
            SourceExpr::Unary { .. } => "unary operation",
            SourceExpr::Binary { .. } => "binary operation",
            SourceExpr::Subscript { .. } => "array reference",
            SourceExpr::FunctionRef(_) => "function reference",
            SourceExpr::Call { .. } => "function call",
            SourceExpr::Unknown { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int(i64),
    /// Default-kind real
    Real(f64),
    /// Double precision real
    Double(f64),
    Char(char),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitComplement,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    AndAssign,
    XorAssign,
}

impl BinaryOperator {
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessOrEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterOrEqual
                | BinaryOperator::And
                | BinaryOperator::Or
        )
    }

    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Assign
                | BinaryOperator::PlusAssign
                | BinaryOperator::MinusAssign
                | BinaryOperator::MultiplyAssign
                | BinaryOperator::DivideAssign
                | BinaryOperator::AndAssign
                | BinaryOperator::XorAssign
        )
    }
}
