//! C- compiler front end
//!
//! This library lexes, parses and semantically checks programs written in
//! C-, a small C-like teaching language with integer scalars and arrays,
//! functions, `if`/`while` control flow and a mandatory `main`.
//!
//! ## Architecture
//!
//! - **Frontend** (`frontend/`): lexer, parser, AST and semantic analysis
//! - **Common** (`common/`): shared infrastructure (errors, spans)

pub mod common;
pub mod frontend;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use frontend::{Analysis, CompileContext, Frontend, FrontendConfig};
