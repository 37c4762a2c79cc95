//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, stages and error tips.

use crate::ast::ast::PrimitiveType;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip, Namespace, Stage};
use crate::Position;
use std::rc::Rc;

fn at_zero(error_impl: ErrorImpl) -> Error {
    Error::new(error_impl, Position(0, Rc::new("test.c".to_string())))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.c".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_recognition_errors_are_earlier_stage() {
    let lexing = at_zero(ErrorImpl::UnrecognisedToken {
        token: "#".to_string(),
    });
    let parsing = at_zero(ErrorImpl::UnexpectedToken {
        token: "}".to_string(),
    });
    let number = at_zero(ErrorImpl::NumberParseError {
        token: "99999999999".to_string(),
    });

    assert_eq!(lexing.stage(), Stage::Recognition);
    assert_eq!(parsing.stage(), Stage::Recognition);
    assert_eq!(number.stage(), Stage::Recognition);
}

#[test]
fn test_lowering_errors_stage() {
    let undefined = at_zero(ErrorImpl::UndefinedIdentifier {
        identifier: "x".to_string(),
    });
    let construct = at_zero(ErrorImpl::UnknownConstruct {
        construct: "statement".to_string(),
    });

    assert_eq!(undefined.stage(), Stage::Lowering);
    assert_eq!(construct.stage(), Stage::Lowering);
}

#[test]
fn test_backend_failure_stage() {
    let error = at_zero(ErrorImpl::BackendFailure {
        message: "bad module".to_string(),
    });

    assert_eq!(error.stage(), Stage::Emission);
    assert_eq!(error.get_error_name(), "BackendFailure");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_type_mismatch_error() {
    let error = at_zero(ErrorImpl::TypeMismatch {
        expected: PrimitiveType::Int,
        received: PrimitiveType::Bool,
        argument: None,
    });

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `int`, received `bool`"
    );
}

#[test]
fn test_argument_type_mismatch_tip_names_position() {
    let error = at_zero(ErrorImpl::TypeMismatch {
        expected: PrimitiveType::Int,
        received: PrimitiveType::String,
        argument: Some(0),
    });

    assert_eq!(
        error.get_tip().to_string(),
        "Expected argument 0 of type `int`, received `string`"
    );
}

#[test]
fn test_already_declared_mentions_namespace() {
    let error = at_zero(ErrorImpl::AlreadyDeclared {
        identifier: "f".to_string(),
        namespace: Namespace::Function,
    });

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
    assert_eq!(
        error.get_tip().to_string(),
        "function `f` already declared in this scope"
    );
}

#[test]
fn test_arity_mismatch_display() {
    let error = at_zero(ErrorImpl::ArityMismatch {
        function: "f".to_string(),
        expected: 2,
        received: 1,
    });

    assert_eq!(error.get_error_name(), "ArityMismatch");
    assert_eq!(error.kind().to_string(), "\"f\" expects 2 arguments, received 1");
}

#[test]
fn test_error_tip_none() {
    let error = at_zero(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_file_and_offset() {
    let error = Error::new(
        ErrorImpl::DeclarationInLoop {
            identifier: "i".to_string(),
        },
        Position(42, Rc::new("loop.c".to_string())),
    );

    assert_eq!(
        error.to_string(),
        "declaration of \"i\" directly inside a loop at loop.c:42"
    );
}
