//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions go through a Pratt parser with NUD/LED handlers; items and
//! statements are parsed by the functions in `stmt`.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::collections::HashMap;

use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup},
    stmt::{parse_function, parse_rec},
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Tokens a failed statement is allowed to resume at.
const STATEMENT_STARTS: [TokenKind; 6] = [
    TokenKind::Let,
    TokenKind::For,
    TokenKind::While,
    TokenKind::If,
    TokenKind::Return,
    TokenKind::Debug,
];

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing expressions and types. Syntax errors found inside blocks are
/// recorded in `errors` so parsing can carry on after them.
pub struct Parser {
    /// The list of tokens to parse, always ending in `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Errors recovered from so far
    errors: Vec<Error>,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// An `EOF` token is appended if the stream does not already end in one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let span = tokens
                .last()
                .map(|token| Span::new(token.span.end.clone(), token.span.end.clone()))
                .unwrap_or_else(|| Span::new(Position::null(), Position::null()));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span,
                literal: None,
            });
        }

        Parser {
            tokens,
            pos: 0,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            errors: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead, or `EOF`.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// Never moves past the final `EOF`.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span.clone()
    }

    /// Builds an "unexpected token" error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from(message),
            },
            token.span.start.clone(),
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: self.current_token().value.clone(),
                    },
                    self.get_position(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind, naming it in the error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        let error = self.unexpected(&format!("expected {}", expected_kind));
        self.expect_error(expected_kind, Some(error))
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix-only tokens get no binding power, so `{` after an `if`
    /// condition ends the condition instead of continuing it.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Records an error the parser has recovered from.
    pub fn report(&mut self, error: Error) {
        debug!("syntax error: {}", error);
        self.errors.push(error);
    }

    /// Skips to the next statement boundary after a failed statement.
    ///
    /// Consumes a `;`, stops before `}` or a statement keyword. At least one
    /// token is consumed if the statement made no progress.
    pub fn synchronize_statement(&mut self, started_at: usize) {
        if self.pos == started_at && self.has_tokens() && self.current_token_kind() != TokenKind::CloseCurly {
            self.advance();
        }

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::CloseCurly => return,
                kind if STATEMENT_STARTS.contains(&kind) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skips to the next `fn` or `rec` after a failed top-level item.
    pub fn synchronize_item(&mut self) {
        self.advance();
        while self.has_tokens() && !matches!(self.current_token_kind(), TokenKind::Fn | TokenKind::Rec) {
            self.advance();
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Parses a stream of tokens into a `Program`.
///
/// This is the main entry point for parsing. Syntax errors do not stop the
/// parser: a broken statement or item is skipped and every error is returned
/// together.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Vec<Error>> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut program = Program::default();

    while parser.has_tokens() {
        let result = match parser.current_token_kind() {
            TokenKind::Fn => parse_function(&mut parser).map(|function| program.functions.push(function)),
            TokenKind::Rec => parse_rec(&mut parser).map(|record| program.records.push(record)),
            _ => Err(parser.unexpected("expected `fn` or `rec`")),
        };

        if let Err(error) = result {
            parser.report(error);
            parser.synchronize_item();
        }
    }

    debug!(
        "parsed {} functions and {} records",
        program.functions.len(),
        program.records.len()
    );

    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}
