//! End-to-end checks: source text through the parser and the analyzer

use cminus::frontend::sema::{self, Diagnostic, DiagnosticKind};
use cminus::frontend::Parser;
use cminus::{CompileContext, DiagnosticReporter, Frontend, FrontendConfig};
use pretty_assertions::assert_eq;

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let program = Parser::new(source)
        .and_then(|mut parser| parser.parse())
        .expect("test source should parse");
    let mut sink = Vec::new();
    let analysis = sema::analyze(&program, &mut sink);
    assert_eq!(analysis.error_count, sink.len());
    sink
}

fn lines(source: &str) -> Vec<String> {
    diagnostics(source).iter().map(ToString::to_string).collect()
}

const SORT: &str = "\
int x[10];

int minloc(int a[], int low, int high)
{   int i; int x; int k;
    k = low;
    x = a[low];
    i = low + 1;
    while (i < high)
    {   if (a[i] < x)
        {   x = a[i];
            k = i; }
        i = i + 1;
    }
    return k;
}

void sort(int a[], int low, int high)
{   int i; int k;
    i = low;
    while (i < high - 1)
    {   int t;
        k = minloc(a, i, high);
        t = a[k];
        a[k] = a[i];
        a[i] = t;
        i = i + 1;
    }
}

void main(void)
{   int i;
    i = 0;
    while (i < 10)
    {   x[i] = input();
        i = i + 1; }
    sort(x, 0, 10);
    i = 0;
    while (i < 10)
    {   output(x[i]);
        i = i + 1; }
}
";

#[test]
fn test_selection_sort_is_clean() {
    assert_eq!(lines(SORT), Vec::<String>::new());
}

#[test]
fn test_every_independent_error_reported() {
    let source = "\
void v;
int f(int a, int a) { return; }
void main(void) {
  int n[4];
  n = 1;
  q = n[0];
  n[0] = f(1);
  v = 2;
  return 3;
}
";
    assert_eq!(
        lines(source),
        vec![
            "Error: Variable: 'v' was declared as void on line: 1",
            "Error: Redeclaration of variable 'a' on line: 2",
            "Error: Function with int return type returns nothing on line: 2",
            "Error: Can't convert array 'n' to int on line: 5",
            "Error: Undefined variable 'q' on line: 6",
            "Error: Wrong number of parameters for function 'f' (expected 2, found 1) on line: 7",
            "Error: Expected integer instead of void variable 'v' on line: 8",
            "Error: Function with void return type returns a value on line: 9",
        ],
    );
}

#[test]
fn test_missing_main_is_last() {
    let found = diagnostics("int f(void) { return g; }");
    let kinds: Vec<_> = found.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::UndefinedVariable, DiagnosticKind::MissingMain],
    );
    assert_eq!(found[1].to_string(), "Error: File does not have a main function");
}

#[test]
fn test_main_as_variable_does_not_count() {
    let kinds: Vec<_> = diagnostics("int main;").iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::MissingMain]);
}

#[test]
fn test_shadowing_across_blocks() {
    let source = "\
int a[3];
void main(void) {
  int i;
  { int a; a = 1; }
  i = a;
}
";
    let kinds: Vec<_> = diagnostics(source).iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::ArrayUsedAsScalar]);
}

#[test]
fn test_block_locals_do_not_leak() {
    let source = "void main(void) { { int t; } t = 1; }";
    assert_eq!(lines(source), vec!["Error: Undefined variable 't' on line: 1"]);
}

#[test]
fn test_unresolved_index_prints_blank_line() {
    assert_eq!(
        lines("void main(void) { output(nope[0]); }"),
        vec![String::new()],
    );
}

#[test]
fn test_frontend_reports_counts_and_dump() {
    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file("shadow.cm", "void main(void) { int x; }");
    let ctx = CompileContext::new("shadow.cm".to_string(), file_id, &reporter);
    let config = FrontendConfig {
        show_symbols: true,
        ..FrontendConfig::default()
    };

    let analysis = Frontend::new()
        .check("void main(void) { int x; }", &ctx, &config)
        .expect("front end should accept the program");

    assert!(!analysis.has_errors());
    assert_eq!(
        analysis.symbol_dump.as_deref(),
        Some(
            "\
Entering the global scope:
    Entering a new block:
        x: int
    Leaving the block
    input: () -> int
    output: (int) -> void
    main: () -> void
Leaving the global scope
"
        ),
    );
}

#[test]
fn test_frontend_rejects_syntax_errors() {
    let mut reporter = DiagnosticReporter::new();
    let source = "void main(void) { int x }";
    let file_id = reporter.add_file("broken.cm", source);
    let ctx = CompileContext::new("broken.cm".to_string(), file_id, &reporter);

    let result = Frontend::new().check(source, &ctx, &FrontendConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_redeclaration_keeps_first_binding() {
    let source = "int x; int x[5]; void main(void) { x = 1; }";
    let kinds: Vec<_> = diagnostics(source).iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Redeclaration]);
}

#[test]
fn test_arity_mismatch_reported_once() {
    for call in ["add(1)", "add(1, 2, 3)"] {
        let source = format!("int add(int a, int b) {{ return a + b; }} void main(void) {{ output({call}); }}");
        let kinds: Vec<_> = diagnostics(&source).iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::ArityMismatch], "{call}");
    }
}

#[test]
fn test_undefined_function_call() {
    assert_eq!(
        lines("void main(void) {\n  f();\n}"),
        vec!["Error: Undefined function 'f' on line: 2"],
    );
}

#[test]
fn test_void_variable_in_nested_block() {
    let kinds: Vec<_> = diagnostics("void main(void) { while (1) { void v; } }")
        .iter()
        .map(|d| d.kind)
        .collect();
    assert_eq!(kinds, vec![DiagnosticKind::VoidVariableDeclared]);
}

#[test]
fn test_undefined_function_with_arguments() {
    assert_eq!(
        lines("void main(void) {\n  f(1, 2);\n}"),
        vec![
            "Error: Undefined function 'f' on line: 2",
            "Error: Wrong number of parameters for function 'f' (expected 0, found 2) on line: 2",
        ],
    );
}
