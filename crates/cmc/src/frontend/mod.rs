//! C- front end
//!
//! The front end is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Performing semantic analysis
//!
//! Code generation consumes the validated AST and lives elsewhere.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use log::info;

use crate::common::{CompileResult, DiagnosticReporter};

pub use ast::Program;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{Analysis, Diagnostic, DiagnosticKind, DiagnosticSink, SemanticAnalyzer, StderrSink};

/// Configuration options passed to the front end
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub show_symbols: bool,
    /// Render semantic diagnostics with source snippets instead of plain lines
    pub pretty: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Sink that prints through the context's reporter, or as plain lines
struct ReportingSink<'c, 'a> {
    ctx: &'c CompileContext<'a>,
    pretty: bool,
}

impl DiagnosticSink for ReportingSink<'_, '_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if self.pretty {
            self.ctx.reporter.emit(&diagnostic.to_rendered(self.ctx.file_id));
        } else {
            StderrSink.emit(diagnostic);
        }
    }
}

/// C- front end
pub struct Frontend;

impl Frontend {
    pub fn new() -> Self {
        Self
    }

    /// Parse and analyze `source`, emitting diagnostics as they are found
    ///
    /// Lexer and parser errors are reported and returned as `Err`. Semantic
    /// violations never are: they are counted in the returned [`Analysis`].
    pub fn check(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Analysis> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            match Lexer::new(source).tokenize_all() {
                Ok(tokens) => {
                    eprintln!("=== Tokens ===");
                    for token in &tokens {
                        eprintln!("{token:?}");
                    }
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    ctx.reporter.report_error(ctx.file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        info!("parsing {}", ctx.filename);
        let program = match Parser::new(source).and_then(|mut parser| parser.parse()) {
            Ok(program) => program,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{program:#?}");
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        info!("analyzing {} declaration(s)", program.declarations.len());
        let mut sink = ReportingSink { ctx, pretty: config.pretty };
        let mut analyzer = SemanticAnalyzer::new(&mut sink);
        if config.show_symbols {
            analyzer = analyzer.with_symbol_trace();
        }
        let analysis = analyzer.analyze(&program);
        info!("analysis finished with {} error(s)", analysis.error_count);

        Ok(analysis)
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self::new()
    }
}
