//! Type representations in the AST

use std::fmt;

/// The two types of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Void,
}

impl Type {
    pub fn is_void(self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Type::Int)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Void => write!(f, "void"),
        }
    }
}
