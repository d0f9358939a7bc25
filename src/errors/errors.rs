use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Creates an error for a broken interpreter invariant. These carry no
    /// meaningful source position.
    pub fn internal(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            ErrorImpl::UnknownSymbol { .. }
            | ErrorImpl::DuplicateSymbol { .. }
            | ErrorImpl::InvalidSymbol { .. } => ErrorKind::Name,
            ErrorImpl::InvalidExpression { .. }
            | ErrorImpl::InvalidFunctionCall { .. }
            | ErrorImpl::InvalidAssignment { .. } => ErrorKind::Context,
            ErrorImpl::TypeError { .. } => ErrorKind::Type,
            ErrorImpl::InvalidOperation { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::IndexOutOfRange { .. }
            | ErrorImpl::UnknownFunction { .. }
            | ErrorImpl::UndefinedVariable { .. }
            | ErrorImpl::ConstantRedefinition { .. }
            | ErrorImpl::FunctionRedefinition { .. }
            | ErrorImpl::MissingInput
            | ErrorImpl::InputError { .. } => ErrorKind::Runtime,
            ErrorImpl::AttributeNotSet { .. }
            | ErrorImpl::AttributeAlreadySet { .. }
            | ErrorImpl::StackImbalance { .. }
            | ErrorImpl::GlobalScopePopped => ErrorKind::Internal,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownSymbol { .. } => "UnknownSymbol",
            ErrorImpl::DuplicateSymbol { .. } => "DuplicateSymbol",
            ErrorImpl::InvalidSymbol { .. } => "InvalidSymbol",
            ErrorImpl::InvalidExpression { .. } => "InvalidExpression",
            ErrorImpl::InvalidFunctionCall { .. } => "InvalidFunctionCall",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
            ErrorImpl::TypeError { .. } => "TypeError",
            ErrorImpl::InvalidOperation { .. } => "InvalidOperation",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::ConstantRedefinition { .. } => "ConstantRedefinition",
            ErrorImpl::FunctionRedefinition { .. } => "FunctionRedefinition",
            ErrorImpl::MissingInput => "MissingInput",
            ErrorImpl::InputError { .. } => "InputError",
            ErrorImpl::AttributeNotSet { .. } => "AttributeNotSet",
            ErrorImpl::AttributeAlreadySet { .. } => "AttributeAlreadySet",
            ErrorImpl::StackImbalance { .. } => "StackImbalance",
            ErrorImpl::GlobalScopePopped => "GlobalScopePopped",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownSymbol { symbol } => {
                ErrorTip::Suggestion(format!("Symbol `{}` is not defined", symbol))
            }
            ErrorImpl::DuplicateSymbol { symbol } => ErrorTip::Suggestion(format!(
                "Symbol `{}` is already defined in this scope",
                symbol
            )),
            ErrorImpl::InvalidSymbol {
                symbol,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, expected a {}",
                symbol, found, expected
            )),
            ErrorImpl::InvalidExpression { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::InvalidFunctionCall {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::InvalidAssignment { symbol } => {
                ErrorTip::Suggestion(format!("Cannot assign to constant `{}`", symbol))
            }
            ErrorImpl::TypeError { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::InvalidOperation { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::IndexOutOfRange { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is outside a string of length {}",
                index, length
            )),
            ErrorImpl::UnknownFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` does not exist", function))
            }
            ErrorImpl::UndefinedVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not in scope", variable))
            }
            ErrorImpl::ConstantRedefinition { constant } => {
                ErrorTip::Suggestion(format!("Constant `{}` is already defined", constant))
            }
            ErrorImpl::FunctionRedefinition { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is already defined", function))
            }
            ErrorImpl::MissingInput => {
                ErrorTip::Suggestion(String::from("No more input is available"))
            }
            ErrorImpl::InputError { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::AttributeNotSet { attribute } => ErrorTip::Suggestion(format!(
                "Attribute `{}` was read before being resolved",
                attribute
            )),
            ErrorImpl::AttributeAlreadySet { attribute } => ErrorTip::Suggestion(format!(
                "Attribute `{}` was resolved twice",
                attribute
            )),
            ErrorImpl::StackImbalance { expected, found } => ErrorTip::Suggestion(format!(
                "Expected {} values on the evaluation stack, found {}",
                expected, found
            )),
            ErrorImpl::GlobalScopePopped => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

/// Coarse classification of an [`Error`], matching the stage that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Context,
    Type,
    Runtime,
    /// An interpreter bug, never caused by user code.
    Internal,
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
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("unknown symbol {symbol:?}")]
    UnknownSymbol { symbol: String },
    #[error("symbol {symbol:?} already defined")]
    DuplicateSymbol { symbol: String },
    #[error("symbol {symbol:?} is a {found}, expected a {expected}")]
    InvalidSymbol {
        symbol: String,
        expected: String,
        found: String,
    },

    #[error("invalid expression: {message}")]
    InvalidExpression { message: String },
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    InvalidFunctionCall {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("cannot assign to constant {symbol:?}")]
    InvalidAssignment { symbol: String },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },
    #[error("integer division by zero")]
    DivisionByZero,
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
    #[error("unknown function {function:?}")]
    UnknownFunction { function: String },
    #[error("undefined variable {variable:?}")]
    UndefinedVariable { variable: String },
    #[error("constant {constant:?} redefined")]
    ConstantRedefinition { constant: String },
    #[error("function {function:?} redefined")]
    FunctionRedefinition { function: String },
    #[error("input exhausted")]
    MissingInput,
    #[error("failed to read input: {message}")]
    InputError { message: String },

    #[error("attribute {attribute} read before being set")]
    AttributeNotSet { attribute: &'static str },
    #[error("attribute {attribute} set twice")]
    AttributeAlreadySet { attribute: &'static str },
    #[error("evaluation stack holds {found} values, expected {expected}")]
    StackImbalance { expected: usize, found: usize },
    #[error("attempted to pop the global scope")]
    GlobalScopePopped,
}
