//! cmc - C- front end
//!
//! Usage: cmc [OPTIONS] <input>

use anyhow::Context as _;
use clap::Parser as ClapParser;
use cminus::common::{CompileError, DiagnosticReporter};
use cminus::frontend::{CompileContext, Frontend, FrontendConfig};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "cmc")]
#[command(version)]
#[command(about = "Parse and semantically check C- programs", long_about = None)]
struct Args {
    /// Input source file (.cm)
    #[arg(required = true)]
    input: PathBuf,

    /// Dump the AST (for debugging)
    #[arg(short = 'a', long)]
    dump_ast: bool,

    /// Print the symbol table scopes to stdout
    #[arg(short = 's', long)]
    show_symbols: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Show semantic errors with source snippets
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        show_symbols: args.show_symbols,
        pretty: args.pretty,
    };

    let ctx = CompileContext::new(filename, file_id, &reporter);
    let analysis = Frontend::new().check(&source, &ctx, &config)?;

    if let Some(dump) = &analysis.symbol_dump {
        print!("{dump}");
    }

    if analysis.has_errors() {
        return Err(CompileError::semantic(analysis.error_count).into());
    }

    log::info!("{} passed semantic analysis", args.input.display());
    Ok(())
}
