//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for the lexical, syntactic and semantic phases
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions
//!
//! Every phase accumulates errors instead of stopping at the first one, so a
//! phase reports `Vec<Error>` on failure.

pub mod errors;

#[cfg(test)]
mod tests;
