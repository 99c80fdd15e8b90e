use crate::{lexer::tokens::Token, Span};

use super::{statements::BlockExpr, types::TypeExpr};

/// A whole source file: records and functions, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub functions: Vec<Function>,
    pub records: Vec<Rec>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Token,
    pub type_: TypeExpr,
}

/// `fn name(params) -> T { body }`
///
/// `return_type` is `None` when the arrow is omitted, which means `unit`.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    pub body: BlockExpr,
    pub span: Span,
}

impl Function {
    pub fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct RecField {
    pub name: Token,
    pub type_: TypeExpr,
}

/// `rec Name { let field: T; ... }`
#[derive(Debug, Clone)]
pub struct Rec {
    pub name: Token,
    pub fields: Vec<RecField>,
    pub span: Span,
}

impl Rec {
    pub fn get_span(&self) -> &Span {
        &self.span
    }
}
