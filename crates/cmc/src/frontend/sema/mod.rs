//! Semantic analysis module
//!
//! This module resolves names against a scoped symbol table and performs
//! the static type and arity checks.

mod scope;
mod analyzer;
mod diagnostic;

pub use scope::{Scope, Symbol, SymbolKind, SymbolTable};
pub use analyzer::{analyze, Analysis, SemanticAnalyzer};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, StderrSink};
