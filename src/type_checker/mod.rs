//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It transforms the untyped AST into a typed AST while:
//!
//! - Verifying type correctness of expressions and statements
//! - Resolving variable, function and record references
//! - Checking call arity and argument types
//! - Managing scopes through an RAII scope guard
//! - Verifying that every function returns its declared type
//!
//! Errors never stop the analysis: the offending expression is typed as
//! `INVALID`, one diagnostic is recorded, and checking carries on.

pub mod cfa;
pub mod environment;
pub mod symbol_table;
pub mod type_checker;
pub mod typed_ast;
pub mod types;

#[cfg(test)]
mod tests;
