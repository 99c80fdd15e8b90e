//! Type annotations as they appear in source.
//!
//! These are unresolved: a `SymbolType` is just a name, which the type
//! checker looks up in the type namespace of the environment.

use std::fmt::Display;

use crate::Span;

/// A named type such as `i32` or `Point`.
#[derive(Debug, Clone)]
pub struct SymbolType {
    pub name: String,
    pub span: Span,
}

/// `[]T` or `[T]`
#[derive(Debug, Clone)]
pub struct ListType {
    pub element: Box<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExpr {
    Symbol(SymbolType),
    List(ListType),
}

impl TypeExpr {
    pub fn get_span(&self) -> &Span {
        match self {
            TypeExpr::Symbol(symbol) => &symbol.span,
            TypeExpr::List(list) => &list.span,
        }
    }
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Symbol(symbol) => write!(f, "{}", symbol.name),
            TypeExpr::List(list) => write!(f, "[]{}", list.element),
        }
    }
}
