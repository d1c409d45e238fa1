//! Parser module for building a C- AST from tokens

mod parser;

pub use parser::Parser;
