use std::fmt::Display;

use thiserror::Error;

use crate::{ast::ast::PrimitiveType, Position};

/// Which pipeline stage raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tokenizing or parsing: the input was never a well-formed parse tree.
    Recognition,
    /// Scope resolution and type checking over a parse tree.
    Lowering,
    /// Building the output document from a checked AST.
    Emission,
}

/// The two separate identifier namespaces of a scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Variable,
    Function,
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Variable => write!(f, "variable"),
            Namespace::Function => write!(f, "function"),
        }
    }
}

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

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn stage(&self) -> Stage {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => Stage::Recognition,
            ErrorImpl::BackendFailure { .. } => Stage::Emission,
            _ => Stage::Lowering,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UndefinedIdentifier { .. } => "UndefinedIdentifier",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::DeclarationInLoop { .. } => "DeclarationInLoop",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::UnsupportedUnaryOperand { .. } => "UnsupportedUnaryOperand",
            ErrorImpl::UnsupportedBinaryOperand { .. } => "UnsupportedBinaryOperand",
            ErrorImpl::UnsupportedType { .. } => "UnsupportedType",
            ErrorImpl::UnknownConstruct { .. } => "UnknownConstruct",
            ErrorImpl::BackendFailure { .. } => "BackendFailure",
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
            ErrorImpl::UndefinedIdentifier { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is not declared in any enclosing scope",
                identifier
            )),
            ErrorImpl::AlreadyDeclared {
                identifier,
                namespace,
            } => ErrorTip::Suggestion(format!(
                "{} `{}` already declared in this scope",
                namespace, identifier
            )),
            ErrorImpl::DeclarationInLoop { identifier } => ErrorTip::Suggestion(format!(
                "wrap the declaration of `{}` in a block inside the loop body",
                identifier
            )),
            ErrorImpl::TypeMismatch {
                expected,
                received,
                argument: Some(index),
            } => ErrorTip::Suggestion(format!(
                "Expected argument {} of type `{}`, received `{}`",
                index, expected, received
            )),
            ErrorImpl::TypeMismatch {
                expected,
                received,
                argument: None,
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArityMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::UnsupportedUnaryOperand { operator, operand } => {
                ErrorTip::Suggestion(format!(
                    "Unary `{}` cannot be applied to `{}`",
                    operator, operand
                ))
            }
            ErrorImpl::UnsupportedBinaryOperand { operator, operand } => {
                ErrorTip::Suggestion(format!(
                    "`{}` cannot be applied to operands of type `{}`",
                    operator, operand
                ))
            }
            ErrorImpl::UnsupportedType { type_ } => ErrorTip::Suggestion(format!(
                "Unsupported type `{}`, expected one of int, float, bool, str, void",
                type_
            )),
            ErrorImpl::UnknownConstruct { .. } => ErrorTip::None,
            ErrorImpl::BackendFailure { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

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
    #[error("undefined identifier {identifier:?}")]
    UndefinedIdentifier { identifier: String },
    #[error("{namespace} {identifier:?} already declared")]
    AlreadyDeclared {
        identifier: String,
        namespace: Namespace,
    },
    #[error("declaration of {identifier:?} directly inside a loop")]
    DeclarationInLoop { identifier: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch {
        expected: PrimitiveType,
        received: PrimitiveType,
        argument: Option<usize>,
    },
    #[error("{function:?} expects {expected} arguments, received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("unary {operator} not supported for {operand}")]
    UnsupportedUnaryOperand {
        operator: String,
        operand: PrimitiveType,
    },
    #[error("{operator} not supported for {operand}")]
    UnsupportedBinaryOperand {
        operator: String,
        operand: PrimitiveType,
    },
    #[error("unsupported type {type_}")]
    UnsupportedType { type_: String },
    #[error("unknown construct: {construct}")]
    UnknownConstruct { construct: String },
    #[error("backend failure: {message}")]
    BackendFailure { message: String },
}
