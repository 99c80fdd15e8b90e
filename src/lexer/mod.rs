//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Decoding of integer, float, string and character literals
//! - Line and column tracking for error reporting
//!
//! Unrecognised characters do not stop the lexer: they are reported and
//! skipped, and every lexical error is returned together.

pub mod lexer;
pub mod tokens;
