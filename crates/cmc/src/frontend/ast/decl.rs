//! Declaration AST nodes

use super::{Block, Type};
use crate::common::Span;

/// Top-level declaration
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Global variable: `int x;` or `int a[10];`
    Var(VarDecl),

    /// Function definition
    Function(FuncDecl),
}

/// Variable declaration, used for globals, locals and parameters
#[derive(Debug, Clone)]
pub enum VarDecl {
    Scalar(ScalarDecl),
    Array(ArrayDecl),
}

impl VarDecl {
    pub fn name(&self) -> &str {
        match self {
            VarDecl::Scalar(s) => &s.name,
            VarDecl::Array(a) => &a.name,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            VarDecl::Scalar(s) => s.ty,
            VarDecl::Array(a) => a.ty,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            VarDecl::Scalar(s) => s.span,
            VarDecl::Array(a) => a.span,
        }
    }
}

/// Scalar declaration: `int x;`
#[derive(Debug, Clone)]
pub struct ScalarDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl ScalarDecl {
    pub fn new(name: String, ty: Type, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// Array declaration: `int a[10];`, or `int a[]` as a parameter
#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub ty: Type,
    /// `None` for parameters, whose length is not known at declaration
    pub size: Option<usize>,
    pub span: Span,
}

impl ArrayDecl {
    pub fn new(name: String, ty: Type, size: Option<usize>, span: Span) -> Self {
        Self { name, ty, size, span }
    }
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<VarDecl>,
    pub body: Block,
    pub span: Span,
}

impl FuncDecl {
    pub fn new(name: String, return_type: Type, params: Vec<VarDecl>, body: Block, span: Span) -> Self {
        Self {
            name,
            return_type,
            params,
            body,
            span,
        }
    }
}
