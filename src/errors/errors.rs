use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The phase a diagnostic was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntactic,
    Semantic,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Syntactic => write!(f, "syntactic"),
            ErrorKind::Semantic => write!(f, "semantic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

/// Diagnostics reported to the user are plain compiler errors.
pub type Diagnostic = Error;

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedChar
            | ErrorImpl::InvalidEscape { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Lexical,
            ErrorImpl::UnexpectedToken { .. } | ErrorImpl::UnexpectedTokenDetailed { .. } => {
                ErrorKind::Syntactic
            }
            _ => ErrorKind::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedChar => "UnterminatedChar",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::BranchTypeMatchError { .. } => "BranchTypeMatchError",
            ErrorImpl::ListElementTypeError { .. } => "ListElementTypeError",
            ErrorImpl::OperandTypeMatchError { .. } => "OperandTypeMatchError",
            ErrorImpl::ExpectedNumeric { .. } => "ExpectedNumeric",
            ErrorImpl::ExpectedBoolean { .. } => "ExpectedBoolean",
            ErrorImpl::ExpectedRange { .. } => "ExpectedRange",
            ErrorImpl::ExpectedList { .. } => "ExpectedList",
            ErrorImpl::ExpectedRecord { .. } => "ExpectedRecord",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotMeasurable { .. } => "NotMeasurable",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::LiteralOutOfRange { .. } => "LiteralOutOfRange",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::RecordAlreadyDeclared { .. } => "RecordAlreadyDeclared",
            ErrorImpl::FieldAlreadyDeclared { .. } => "FieldAlreadyDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::EmptyBlock => "EmptyBlock",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { token } if token == "&" || token == "|" => {
                ErrorTip::Suggestion(format!("did you mean `{}{}`?", token, token))
            }
            ErrorImpl::UnexpectedToken { .. } => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::NumberParseError { .. } => {
                ErrorTip::Suggestion(String::from("is it above the integer limit?"))
            }
            ErrorImpl::VariableNotDeclared { .. } => ErrorTip::Suggestion(String::from(
                "functions must be declared before the functions that call them",
            )),
            ErrorImpl::LiteralOutOfRange { type_, .. } => {
                ErrorTip::Suggestion(format!("the literal does not fit in `{}`", type_))
            }
            ErrorImpl::MissingReturn { expected, .. } => ErrorTip::Suggestion(format!(
                "every path must end in a `return` or a tail expression of type `{}`",
                expected
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "only variables, record fields and list elements can be assigned",
            )),
            ErrorImpl::EmptyBlock => {
                ErrorTip::Suggestion(String::from("a block needs at least one statement"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.get_kind(),
            self.position.line,
            self.position.column,
            self.internal_error
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: `{token}`")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("invalid escape sequence `\\{escape}`")]
    InvalidEscape { escape: String },
    #[error("error parsing number: `{token}`")]
    NumberParseError { token: String },

    // Syntactic
    #[error("unexpected token: `{token}`")]
    UnexpectedToken { token: String },
    #[error("unexpected token `{token}`: {message}")]
    UnexpectedTokenDetailed { token: String, message: String },

    // Semantic
    #[error("variable `{variable}` already declared in this scope")]
    VariableAlreadyDeclared { variable: String },
    #[error("`{variable}` is not declared")]
    VariableNotDeclared { variable: String },
    #[error("too many arguments: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected `{expected}`, received `{received}`")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected `{expected}`, received `{received}`")]
    TypeMatchError { expected: String, received: String },
    #[error("return type does not match: expected `{expected}`, received `{received}`")]
    ReturnTypeMatchError { expected: String, received: String },
    #[error("`if` branches have incompatible types `{then_type}` and `{else_type}`")]
    BranchTypeMatchError { then_type: String, else_type: String },
    #[error("list elements have incompatible types `{expected}` and `{received}`")]
    ListElementTypeError { expected: String, received: String },
    #[error("operator `{operator}` cannot combine `{left}` and `{right}`")]
    OperandTypeMatchError {
        operator: String,
        left: String,
        right: String,
    },
    #[error("expected a numeric type, received `{received}`")]
    ExpectedNumeric { received: String },
    #[error("expected `bool`, received `{received}`")]
    ExpectedBoolean { received: String },
    #[error("expected a range, received `{received}`")]
    ExpectedRange { received: String },
    #[error("expected a list, received `{received}`")]
    ExpectedList { received: String },
    #[error("expected a record, received `{received}`")]
    ExpectedRecord { received: String },
    #[error("`{type_}` is not a function")]
    NotCallable { type_: String },
    #[error("cannot take the length of `{type_}`")]
    NotMeasurable { type_: String },
    #[error("record `{record}` has no field `{field}`")]
    UnknownField { record: String, field: String },
    #[error("literal `{literal}` out of range for `{type_}`")]
    LiteralOutOfRange { literal: String, type_: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("function `{function}` already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("record `{record}` already declared")]
    RecordAlreadyDeclared { record: String },
    #[error("field `{field}` already declared")]
    FieldAlreadyDeclared { field: String },
    #[error("unknown type `{type_}`")]
    UnknownType { type_: String },
    #[error("function `{function}` does not return a value of type `{expected}` on every path")]
    MissingReturn { function: String, expected: String },
    #[error("empty block")]
    EmptyBlock,
}
