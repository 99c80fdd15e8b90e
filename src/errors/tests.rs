//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position(line: u32, column: u32) -> Position {
    Position::new(
        line,
        column,
        Rc::new("test.pop".to_string()),
        Rc::new(String::new()),
    )
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_kind(), ErrorKind::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(3, 42),
    );

    assert_eq!(error.get_position().line, 3);
    assert_eq!(error.get_position().column, 42);
}

#[test]
fn test_syntactic_kind() {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "}".to_string(),
            message: "expected expression".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_kind(), ErrorKind::Syntactic);
    assert_eq!(error.message(), "unexpected token `}`: expected expression");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: "i32".to_string(),
            received: "str".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.get_kind(), ErrorKind::Semantic);
    assert_eq!(
        error.message(),
        "types do not match: expected `i32`, received `str`"
    );
}

#[test]
fn test_variable_not_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert_eq!(error.message(), "`foo` is not declared");
}

#[test]
fn test_literal_out_of_range_error() {
    let error = Error::new(
        ErrorImpl::LiteralOutOfRange {
            literal: "300".to_string(),
            type_: "u8".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_kind(), ErrorKind::Semantic);
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("u8")),
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::DivisionByZero, position(1, 1));

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_unrecognised_ampersand_tip() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "&".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_tip().to_string(), "did you mean `&&`?");
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::UnexpectedArguments {
            expected: 2,
            received: 3,
        },
        position(4, 7),
    );

    assert_eq!(
        error.to_string(),
        "semantic error at 4:7: too many arguments: expected 2, received 3"
    );
}

#[test]
fn test_missing_arguments_error() {
    let error = Error::new(
        ErrorImpl::MissingArguments {
            expected: 3,
            received: 1,
        },
        position(1, 1),
    );

    assert_eq!(error.get_error_name(), "MissingArguments");
}
