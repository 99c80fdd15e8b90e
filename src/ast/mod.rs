//! Input AST produced by the parser and consumed by the type checker.
//!
//! Every node is a plain struct carrying its source `Span`; the closed enums
//! `Expr`, `Stmt` and `TypeExpr` tie the node kinds together so the type
//! checker can match over them exhaustively.
//!
//! Submodules:
//! - ast: top-level items (`Program`, `Function`, `Rec`)
//! - expressions: the `Expr` enum and its node structs
//! - statements: the `Stmt` enum and `BlockExpr`
//! - types: type annotations as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
