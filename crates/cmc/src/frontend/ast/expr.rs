//! Expression AST nodes

use crate::common::Span;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),

    /// Variable reference: x, a[i]
    Var(Variable),

    /// Assignment: x = y, a[i] = y
    Assign {
        target: Variable,
        value: Box<Expr>,
    },

    /// Binary operation: a + b, x < y
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call: foo(a, b)
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// A variable occurrence, either as an operand or as an assignment target
#[derive(Debug, Clone)]
pub struct Variable {
    pub kind: VariableKind,
    pub span: Span,
}

impl Variable {
    pub fn new(kind: VariableKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum VariableKind {
    /// Plain name: x
    Simple(String),

    /// Subscripted name: a[i]
    Indexed {
        name: String,
        index: Box<Expr>,
    },
}
