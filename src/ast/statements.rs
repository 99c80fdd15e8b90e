use crate::{lexer::tokens::Token, Span};

use super::{expressions::Expr, types::TypeExpr};

/// `let name: T = value;`
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: Token,
    pub explicit_type: TypeExpr,
    pub assigned_value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(decl) => &decl.span,
            Stmt::Expression(expression) => &expression.span,
        }
    }
}

/// `{ statements; tail }`
///
/// The tail is the last statement when it was not terminated by `;`. It gives
/// the block its value.
#[derive(Debug, Clone)]
pub struct BlockExpr {
    pub body: Vec<Stmt>,
    pub tail: Option<Box<Stmt>>,
    pub span: Span,
}

impl BlockExpr {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.tail.is_none()
    }
}
