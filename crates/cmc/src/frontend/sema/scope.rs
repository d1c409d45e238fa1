//! Symbol table and scope management

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::frontend::ast::Type;

/// A symbol in the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Element type for variables, return type for functions
    pub ty: Type,
    pub kind: SymbolKind,
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Scalar,
    /// `len` is `None` for array parameters, whose length is unknown
    Array {
        len: Option<usize>,
    },
    /// Parameter list kept for arity and shape checks at call sites
    Function {
        params: Vec<Symbol>,
    },
}

impl Symbol {
    pub fn scalar(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, SymbolKind::Scalar)
    }

    pub fn array(name: impl Into<String>, ty: Type, len: usize) -> Self {
        Self::new(name, ty, SymbolKind::Array { len: Some(len) })
    }

    pub fn array_param(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, ty, SymbolKind::Array { len: None })
    }

    pub fn function(name: impl Into<String>, return_type: Type, params: Vec<Symbol>) -> Self {
        Self::new(name, return_type, SymbolKind::Function { params })
    }

    fn new(name: impl Into<String>, ty: Type, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, SymbolKind::Array { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    pub fn params(&self) -> Option<&[Symbol]> {
        match &self.kind {
            SymbolKind::Function { params } => Some(params),
            _ => None,
        }
    }

    fn write_shape(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Scalar => write!(f, "{}", self.ty),
            SymbolKind::Array { len: Some(len) } => write!(f, "{}[{len}]", self.ty),
            SymbolKind::Array { len: None } => write!(f, "{}[]", self.ty),
            SymbolKind::Function { params } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    param.write_shape(f)?;
                }
                write!(f, ") -> {}", self.ty)
            }
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        self.write_shape(f)
    }
}

/// A scope containing symbols, in declaration order
#[derive(Debug, Default)]
pub struct Scope {
    symbols: IndexMap<String, Symbol>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }
}

/// Stack of lexical scopes, innermost last
///
/// The table performs no conflict detection of its own: callers check
/// [`SymbolTable::is_declared_in_current_scope`] before [`SymbolTable::declare`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    trace: Option<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table that records every scope it discards, for [`SymbolTable::dump`]
    pub fn with_trace() -> Self {
        Self {
            scopes: Vec::new(),
            trace: Some(String::new()),
        }
    }

    /// Number of live scopes; the global scope is depth 1
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        let depth = self.scopes.len();
        if let Some(trace) = &mut self.trace {
            let header = if depth == 0 { "Entering the global scope:" } else { "Entering a new block:" };
            let _ = writeln!(trace, "{}{header}", indent(depth));
        }
        self.scopes.push(Scope::new());
        debug!("enter scope (depth {})", depth + 1);
    }

    pub fn exit_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            warn!("exit_scope called with no open scope");
            return;
        };
        let depth = self.scopes.len();
        debug!("exit scope (depth {})", depth + 1);

        if let Some(trace) = &mut self.trace {
            for symbol in scope.symbols() {
                let _ = writeln!(trace, "{}{symbol}", indent(depth + 1));
            }
            let footer = if depth == 0 { "Leaving the global scope" } else { "Leaving the block" };
            let _ = writeln!(trace, "{}{footer}", indent(depth));
        }
    }

    /// Bind `symbol` in the innermost scope, replacing any same-named binding there
    pub fn declare(&mut self, symbol: Symbol) {
        let Some(scope) = self.scopes.last_mut() else {
            warn!("declare '{}' with no open scope", symbol.name);
            return;
        };
        trace!("declare {symbol}");
        scope.insert(symbol);
    }

    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.lookup(name).is_some())
    }

    /// Innermost binding of `name` across all open scopes
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    /// Innermost binding of `name`, if that binding is a function
    pub fn resolve_function(&self, name: &str) -> Option<&Symbol> {
        self.resolve(name).filter(|symbol| symbol.is_function())
    }

    /// Declared parameter count, or `None` when `name` is not a function
    pub fn parameter_count_of(&self, name: &str) -> Option<usize> {
        self.resolve_function(name)
            .and_then(Symbol::params)
            .map(<[Symbol]>::len)
    }

    /// Text of every scope discarded so far; empty unless built with tracing
    pub fn dump(&self) -> &str {
        self.trace.as_deref().unwrap_or_default()
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declare_and_resolve() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare(Symbol::scalar("x", Type::Int));

        assert!(table.is_declared_in_current_scope("x"));
        assert_eq!(table.resolve("x"), Some(&Symbol::scalar("x", Type::Int)));
        assert_eq!(table.resolve("y"), None);
    }

    #[test]
    fn test_current_scope_only() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare(Symbol::scalar("x", Type::Int));
        table.enter_scope();

        assert!(!table.is_declared_in_current_scope("x"));
        assert!(table.resolve("x").is_some());
    }

    #[test]
    fn test_shadowing_resolves_innermost() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare(Symbol::scalar("x", Type::Int));
        table.enter_scope();
        table.declare(Symbol::array("x", Type::Int, 4));

        assert!(table.resolve("x").is_some_and(Symbol::is_array));

        table.exit_scope();
        assert!(table.resolve("x").is_some_and(|s| !s.is_array()));
    }

    #[test]
    fn test_exit_discards_bindings() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.enter_scope();
        table.declare(Symbol::scalar("tmp", Type::Int));
        table.exit_scope();

        assert_eq!(table.depth(), 1);
        assert_eq!(table.resolve("tmp"), None);
    }

    #[test]
    fn test_exit_without_scope_is_harmless() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        table.declare(Symbol::scalar("x", Type::Int));
        assert_eq!(table.depth(), 0);
        assert_eq!(table.resolve("x"), None);
    }

    #[test]
    fn test_function_lookups() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare(Symbol::function(
            "f",
            Type::Void,
            vec![Symbol::scalar("a", Type::Int), Symbol::array_param("b", Type::Int)],
        ));
        table.declare(Symbol::scalar("v", Type::Int));

        assert!(table.resolve_function("f").is_some());
        assert_eq!(table.parameter_count_of("f"), Some(2));
        assert_eq!(table.resolve_function("v"), None);
        assert_eq!(table.parameter_count_of("v"), None);
        assert_eq!(table.parameter_count_of("missing"), None);
    }

    #[test]
    fn test_variable_shadows_function() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.declare(Symbol::function("f", Type::Int, Vec::new()));
        table.enter_scope();
        table.declare(Symbol::scalar("f", Type::Int));

        assert_eq!(table.resolve_function("f"), None);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::scalar("x", Type::Int).to_string(), "x: int");
        assert_eq!(Symbol::array("a", Type::Int, 10).to_string(), "a: int[10]");
        assert_eq!(Symbol::array_param("b", Type::Int).to_string(), "b: int[]");
        assert_eq!(
            Symbol::function(
                "f",
                Type::Void,
                vec![Symbol::scalar("n", Type::Int), Symbol::array_param("b", Type::Int)],
            )
            .to_string(),
            "f: (int, int[]) -> void"
        );
    }

    #[test]
    fn test_dump_nests_blocks() {
        let mut table = SymbolTable::with_trace();
        table.enter_scope();
        table.declare(Symbol::scalar("g", Type::Int));
        table.enter_scope();
        table.declare(Symbol::array("buf", Type::Int, 3));
        table.exit_scope();
        table.exit_scope();

        let expected = "\
Entering the global scope:
    Entering a new block:
        buf: int[3]
    Leaving the block
    g: int
Leaving the global scope
";
        assert_eq!(table.dump(), expected);
    }

    #[test]
    fn test_dump_without_trace_is_empty() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.exit_scope();
        assert_eq!(table.dump(), "");
    }
}
