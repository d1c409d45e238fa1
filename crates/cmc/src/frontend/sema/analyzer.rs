//! Semantic analyzer - scope resolution and static checks

use log::debug;

use crate::common::Span;
use crate::frontend::ast::*;
use super::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use super::scope::{Symbol, SymbolKind, SymbolTable};

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub error_count: usize,
    /// Rendered symbol table, present when tracing was requested
    pub symbol_dump: Option<String>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// State of the function whose body is being analyzed
#[derive(Debug, Clone, Copy)]
struct FunctionContext {
    return_type: Type,
}

/// Semantic analyzer for C- programs
///
/// Every violation is reported to the sink and analysis carries on, so one
/// run surfaces every independent error in the program.
pub struct SemanticAnalyzer<'s> {
    symbols: SymbolTable,
    sink: &'s mut dyn DiagnosticSink,
    error_count: usize,
    trace_symbols: bool,
}

impl<'s> SemanticAnalyzer<'s> {
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            symbols: SymbolTable::new(),
            sink,
            error_count: 0,
            trace_symbols: false,
        }
    }

    /// Record every scope as it closes, returned in [`Analysis::symbol_dump`]
    pub fn with_symbol_trace(mut self) -> Self {
        self.symbols = SymbolTable::with_trace();
        self.trace_symbols = true;
        self
    }

    /// Analyze a whole program
    pub fn analyze(mut self, program: &Program) -> Analysis {
        self.symbols.enter_scope();
        self.declare_builtins();

        let mut has_main = false;
        for decl in &program.declarations {
            has_main |= matches!(decl, Declaration::Function(func) if func.name == "main");
            self.analyze_declaration(decl);
        }

        if !has_main {
            self.report(Diagnostic::program(
                DiagnosticKind::MissingMain,
                "File does not have a main function",
            ));
        }

        self.symbols.exit_scope();

        Analysis {
            error_count: self.error_count,
            symbol_dump: self.trace_symbols.then(|| self.symbols.dump().to_string()),
        }
    }

    fn declare_builtins(&mut self) {
        self.symbols.declare(Symbol::function("input", Type::Int, Vec::new()));
        self.symbols.declare(Symbol::function(
            "output",
            Type::Void,
            vec![Symbol::scalar("", Type::Int)],
        ));
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        debug!("{:?}: {}", diagnostic.kind, diagnostic.message);
        self.error_count += 1;
        self.sink.emit(diagnostic);
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn analyze_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Var(var) => self.analyze_var_decl(var),
            Declaration::Function(func) => self.analyze_func_decl(func),
        }
    }

    fn analyze_var_decl(&mut self, var: &VarDecl) {
        let name = var.name();
        let span = var.span();

        if var.ty().is_void() {
            self.report(Diagnostic::new(
                DiagnosticKind::VoidVariableDeclared,
                format!("Variable: '{name}' was declared as void"),
                span,
            ));
        }

        if self.symbols.is_declared_in_current_scope(name) {
            self.report(Diagnostic::new(
                DiagnosticKind::Redeclaration,
                format!("Redeclaration of variable '{name}'"),
                span,
            ));
            return;
        }

        let symbol = match var {
            VarDecl::Scalar(s) => Symbol::scalar(&s.name, s.ty),
            VarDecl::Array(a) => match a.size {
                Some(len) => Symbol::array(&a.name, a.ty, len),
                None => Symbol::array_param(&a.name, a.ty),
            },
        };
        self.symbols.declare(symbol);
    }

    fn analyze_func_decl(&mut self, func: &FuncDecl) {
        debug!("analyzing function '{}'", func.name);

        let params = func.params.iter().map(param_symbol).collect();

        // Registered before the body is entered so the function can recurse
        if self.symbols.is_declared_in_current_scope(&func.name) {
            self.report(Diagnostic::new(
                DiagnosticKind::Redeclaration,
                format!("Redeclaration of function '{}'", func.name),
                func.span,
            ));
        } else {
            self.symbols.declare(Symbol::function(&func.name, func.return_type, params));
        }

        // Parameters and the top level of the body share one scope
        self.symbols.enter_scope();
        for param in &func.params {
            self.analyze_var_decl(param);
        }
        let cx = FunctionContext {
            return_type: func.return_type,
        };
        self.analyze_block_contents(&func.body, cx);
        self.symbols.exit_scope();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn analyze_block_contents(&mut self, block: &Block, cx: FunctionContext) {
        for decl in &block.decls {
            self.analyze_var_decl(decl);
        }
        for stmt in &block.stmts {
            self.analyze_stmt(stmt, cx);
        }
    }

    fn analyze_stmt(&mut self, stmt: &Stmt, cx: FunctionContext) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.analyze_expr(expr),
            StmtKind::Empty => {}
            StmtKind::Compound(block) => {
                self.symbols.enter_scope();
                self.analyze_block_contents(block, cx);
                self.symbols.exit_scope();
            }
            StmtKind::If { condition, then_branch, else_branch } => {
                self.analyze_expr(condition);
                self.analyze_stmt(then_branch, cx);
                if let Some(else_branch) = else_branch {
                    self.analyze_stmt(else_branch, cx);
                }
            }
            StmtKind::While { condition, body } => {
                self.analyze_expr(condition);
                self.analyze_stmt(body, cx);
            }
            StmtKind::Return(value) => self.analyze_return(value.as_ref(), stmt.span, cx),
        }
    }

    fn analyze_return(&mut self, value: Option<&Expr>, span: Span, cx: FunctionContext) {
        match (cx.return_type, value) {
            (Type::Void, Some(_)) => {
                self.report(Diagnostic::new(
                    DiagnosticKind::TypeMismatchInReturn,
                    "Function with void return type returns a value",
                    span,
                ));
            }
            (Type::Void, None) => {}
            (Type::Int, None) => {
                self.report(Diagnostic::new(
                    DiagnosticKind::TypeMismatchInReturn,
                    "Function with int return type returns nothing",
                    span,
                ));
            }
            (Type::Int, Some(value)) => self.analyze_expr(value),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn analyze_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLiteral(_) => {}
            ExprKind::Var(var) => self.analyze_variable(var),
            ExprKind::Assign { target, value } => {
                self.analyze_variable(target);
                self.analyze_expr(value);
            }
            ExprKind::Binary { left, right, .. } => {
                self.analyze_expr(left);
                self.analyze_expr(right);
            }
            ExprKind::Call { name, args } => self.analyze_call(name, args, expr.span),
        }
    }

    fn analyze_call(&mut self, name: &str, args: &[Expr], span: Span) {
        let declared = match self.symbols.parameter_count_of(name) {
            Some(count) => count,
            None => {
                self.report(Diagnostic::new(
                    DiagnosticKind::UndefinedFunction,
                    format!("Undefined function '{name}'"),
                    span,
                ));
                // Checked as a function taking no parameters
                0
            }
        };

        if declared != args.len() {
            self.report(Diagnostic::new(
                DiagnosticKind::ArityMismatch,
                format!(
                    "Wrong number of parameters for function '{name}' (expected {declared}, found {})",
                    args.len()
                ),
                span,
            ));
        }

        // Only arguments bound to scalar parameters are checked; array
        // parameters accept the bare array name.
        let scalar_params: Vec<bool> = self
            .symbols
            .resolve_function(name)
            .and_then(Symbol::params)
            .map(|params| params.iter().map(|p| !p.is_array()).collect())
            .unwrap_or_default();

        for (arg, scalar) in args.iter().zip(scalar_params) {
            if scalar {
                self.analyze_expr(arg);
            }
        }
    }

    fn analyze_variable(&mut self, var: &Variable) {
        match &var.kind {
            VariableKind::Simple(name) => self.analyze_simple_variable(name, var.span),
            VariableKind::Indexed { name, index } => {
                let found = self.symbols.resolve(name).map(Symbol::is_array);
                match found {
                    Some(true) => {}
                    Some(false) => self.report(Diagnostic::new(
                        DiagnosticKind::NotAnArray,
                        format!("'{name}' is not an array"),
                        var.span,
                    )),
                    None => self.report(Diagnostic::new(
                        DiagnosticKind::UnresolvedIndexedVariable,
                        "",
                        var.span,
                    )),
                }
                self.analyze_expr(index);
            }
        }
    }

    fn analyze_simple_variable(&mut self, name: &str, span: Span) {
        let Some(symbol) = self.symbols.resolve(name) else {
            self.report(Diagnostic::new(
                DiagnosticKind::UndefinedVariable,
                format!("Undefined variable '{name}'"),
                span,
            ));
            return;
        };

        let violation = match &symbol.kind {
            SymbolKind::Scalar if symbol.ty.is_integer() => None,
            SymbolKind::Scalar => Some((
                DiagnosticKind::ExpectedInteger,
                format!("Expected integer instead of void variable '{name}'"),
            )),
            SymbolKind::Array { .. } if symbol.ty.is_void() => Some((
                DiagnosticKind::ExpectedInteger,
                format!("Expected integer instead of void array variable '{name}'"),
            )),
            SymbolKind::Array { .. } => Some((
                DiagnosticKind::ArrayUsedAsScalar,
                format!("Can't convert array '{name}' to int"),
            )),
            SymbolKind::Function { .. } => Some((
                DiagnosticKind::ExpectedInteger,
                format!("Expected integer instead of function '{name}'"),
            )),
        };

        if let Some((kind, message)) = violation {
            self.report(Diagnostic::new(kind, message, span));
        }
    }
}

fn param_symbol(param: &VarDecl) -> Symbol {
    match param {
        VarDecl::Scalar(s) => Symbol::scalar(&s.name, s.ty),
        VarDecl::Array(a) => Symbol::array_param(&a.name, a.ty),
    }
}

/// Analyze `program`, sending diagnostics to `sink`
pub fn analyze(program: &Program, sink: &mut dyn DiagnosticSink) -> Analysis {
    SemanticAnalyzer::new(sink).analyze(program)
}
