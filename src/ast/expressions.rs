use crate::{
    lexer::tokens::{LiteralValue, Token},
    Span,
};

use super::{statements::BlockExpr, types::TypeExpr};

// LITERALS

/// Integer, float, string, char or boolean literal.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    /// Source text, kept for diagnostics.
    pub lexeme: String,
    pub span: Span,
}

/// Symbol Expression
/// Represents an identifier in the AST. This includes functions.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

/// `[a, b, c]`
#[derive(Debug, Clone)]
pub struct ListExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// `start..end`
#[derive(Debug, Clone)]
pub struct RangeExpr {
    pub start: Box<Expr>,
    pub end: Box<Expr>,
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `=` and the compound assignments `+= -= *= /= %= ^=`.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub operator: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

/// `!e`, `-e` and `#e`.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

// POSTFIX

/// A call argument, optionally labeled (`f(x: 1)`).
#[derive(Debug, Clone)]
pub struct Argument {
    pub label: Option<Token>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// `list[index]`
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `record.field`
#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub target: Box<Expr>,
    pub member: Token,
    pub span: Span,
}

// CONTROL FLOW

/// `for v: T in range { body }`
#[derive(Debug, Clone)]
pub struct ForExpr {
    pub variable: Token,
    pub variable_type: TypeExpr,
    pub range: Box<Expr>,
    pub body: BlockExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: BlockExpr,
    pub else_branch: Option<BlockExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileExpr {
    pub condition: Box<Expr>,
    pub body: BlockExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnExpr {
    pub value: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DebugExpr {
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Symbol(SymbolExpr),
    List(ListExpr),
    Range(RangeExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    Prefix(PrefixExpr),
    Call(CallExpr),
    Index(IndexExpr),
    Member(MemberExpr),
    For(ForExpr),
    If(IfExpr),
    While(WhileExpr),
    Return(ReturnExpr),
    Debug(DebugExpr),
    Block(BlockExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::List(expr) => &expr.span,
            Expr::Range(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Index(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::For(expr) => &expr.span,
            Expr::If(expr) => &expr.span,
            Expr::While(expr) => &expr.span,
            Expr::Return(expr) => &expr.span,
            Expr::Debug(expr) => &expr.span,
            Expr::Block(expr) => &expr.span,
        }
    }

    /// Block-like expressions end in `}` and may stand as a statement without `;`.
    pub fn is_block_like(&self) -> bool {
        matches!(
            self,
            Expr::For(_) | Expr::If(_) | Expr::While(_) | Expr::Block(_)
        )
    }
}
