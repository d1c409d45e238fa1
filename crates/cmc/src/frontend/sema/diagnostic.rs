//! Semantic diagnostics and the sinks that receive them

use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic as Rendered, Label};

use crate::common::Span;

/// Kind of semantic violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    VoidVariableDeclared,
    Redeclaration,
    UndefinedVariable,
    UndefinedFunction,
    NotAnArray,
    /// A subscripted name that resolves to nothing. Carries no message.
    UnresolvedIndexedVariable,
    ArrayUsedAsScalar,
    /// A void variable or a function name where an integer is required
    ExpectedInteger,
    TypeMismatchInReturn,
    MissingMain,
    ArityMismatch,
}

/// One semantic violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// `None` only for program-level diagnostics
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn program(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    /// Build a codespan diagnostic for source-annotated output
    pub fn to_rendered(&self, file_id: usize) -> Rendered<usize> {
        let message = match self.kind {
            DiagnosticKind::UnresolvedIndexedVariable => "unresolved subscripted name".to_string(),
            _ => self.message.clone(),
        };
        let rendered = Rendered::error().with_message(message);
        match self.span {
            Some(span) => rendered.with_labels(vec![Label::primary(file_id, span.start..span.end)]),
            None => rendered,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.span) {
            (DiagnosticKind::UnresolvedIndexedVariable, _) => Ok(()),
            (_, Some(span)) => write!(f, "Error: {} on line: {}", self.message, span.line),
            (_, None) => write!(f, "Error: {}", self.message),
        }
    }
}

/// Receiver for diagnostics emitted during analysis
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Prints each diagnostic line to stderr as soon as it is reported
#[derive(Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        eprintln!("{diagnostic}");
    }
}
