//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (`i32`, `str`, `Point`)
//! - List types, written either `[]T` or `[T]`
//!
//! Like expression parsing, handlers are looked up by the current token.

use std::collections::HashMap;

use crate::{
    ast::types::{ListType, SymbolType, TypeExpr},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_list_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeExpr::Symbol(SymbolType {
        name: token.value,
        span: token.span,
    }))
}

pub fn parse_list_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span;

    let element = if parser.current_token_kind() == TokenKind::CloseBracket {
        // []T
        parser.advance();
        parse_type(parser)?
    } else {
        // [T]
        let element = parse_type(parser)?;
        parser.expect(TokenKind::CloseBracket)?;
        element
    };

    Ok(TypeExpr::List(ListType {
        span: start.to(&parser.previous_span()),
        element: Box::new(element),
    }))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token_kind = parser.current_token_kind();
    let handler = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected("expected a type")),
    };

    handler(parser)
}
