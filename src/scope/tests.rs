//! Unit tests for the scope chain.

use std::rc::Rc;

use crate::{
    ast::ast::{LocalSlot, PrimitiveType, Storage},
    Position,
};

use super::{
    scope::{FrameKind, ScopeChain},
    symbols::{FunctionSignature, Symbol},
};

fn pos() -> Position {
    Position(0, Rc::new("test.c".to_string()))
}

fn int_var(name: &str) -> Symbol {
    Symbol::new(name, PrimitiveType::Int, Storage::Global)
}

#[test]
fn test_resolves_nearest_declaration() {
    let mut chain = ScopeChain::new();
    chain.declare_variable(int_var("a"), pos()).unwrap();

    let mut inner = chain.enter(FrameKind::Ordinary);
    inner
        .declare_variable(
            Symbol::new("a", PrimitiveType::Bool, Storage::Local(LocalSlot(0))),
            pos(),
        )
        .unwrap();

    let resolved = inner.resolve_variable("a", pos()).unwrap();
    assert_eq!(resolved.ty, PrimitiveType::Bool);
    assert_eq!(resolved.storage, Storage::Local(LocalSlot(0)));
}

#[test]
fn test_lookup_walks_outwards() {
    let mut chain = ScopeChain::new();
    chain.declare_variable(int_var("g"), pos()).unwrap();

    let mut outer = chain.enter(FrameKind::Ordinary);
    let inner = outer.enter_inherited();

    assert_eq!(inner.resolve_variable("g", pos()).unwrap().name, "g");
}

#[test]
fn test_undefined_identifier() {
    let chain = ScopeChain::new();
    let error = chain.resolve_variable("missing", pos()).unwrap_err();

    assert_eq!(error.get_error_name(), "UndefinedIdentifier");
}

#[test]
fn test_redeclaration_in_same_frame() {
    let mut chain = ScopeChain::new();
    chain.declare_variable(int_var("x"), pos()).unwrap();
    let error = chain.declare_variable(int_var("x"), pos()).unwrap_err();

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}

#[test]
fn test_function_redeclaration_in_same_frame() {
    let mut chain = ScopeChain::new();
    let signature = FunctionSignature::new("x", PrimitiveType::Void, vec![], false);
    chain.declare_function(signature.clone(), pos()).unwrap();
    let error = chain.declare_function(signature, pos()).unwrap_err();

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}

#[test]
fn test_namespaces_are_separate() {
    let mut chain = ScopeChain::new();
    chain.declare_variable(int_var("x"), pos()).unwrap();
    chain
        .declare_function(
            FunctionSignature::new("x", PrimitiveType::Int, vec![], false),
            pos(),
        )
        .unwrap();

    assert!(chain.resolve_variable("x", pos()).is_ok());
    assert!(chain.resolve_function("x", &[], pos()).is_ok());
}

#[test]
fn test_shadowing_in_child_frame_is_allowed() {
    let mut chain = ScopeChain::new();
    chain.declare_variable(int_var("x"), pos()).unwrap();

    let mut inner = chain.enter(FrameKind::Ordinary);
    assert!(inner.declare_variable(int_var("x"), pos()).is_ok());
}

#[test]
fn test_declaration_directly_in_loop_frame() {
    let mut chain = ScopeChain::new();
    let mut body = chain.enter(FrameKind::Loop);

    let error = body.declare_variable(int_var("i"), pos()).unwrap_err();
    assert_eq!(error.get_error_name(), "DeclarationInLoop");

    let error = body
        .declare_function(
            FunctionSignature::new("f", PrimitiveType::Void, vec![], false),
            pos(),
        )
        .unwrap_err();
    assert_eq!(error.get_error_name(), "DeclarationInLoop");
}

#[test]
fn test_declaration_in_block_nested_in_loop() {
    let mut chain = ScopeChain::new();
    let mut body = chain.enter(FrameKind::Loop);
    let mut block = body.enter(FrameKind::Ordinary);

    assert!(block.declare_variable(int_var("i"), pos()).is_ok());
}

#[test]
fn test_child_inherits_kind_by_default() {
    let mut chain = ScopeChain::new();
    let mut body = chain.enter(FrameKind::Loop);
    let inherited = body.enter_inherited();

    assert_eq!(inherited.current().kind(), FrameKind::Loop);
    assert_eq!(inherited.current().parent(), Some(1));
}

#[test]
fn test_guard_restores_depth() {
    let mut chain = ScopeChain::new();
    {
        let mut outer = chain.enter(FrameKind::Ordinary);
        outer.declare_variable(int_var("temp"), pos()).unwrap();
        let inner = outer.enter(FrameKind::Loop);
        assert_eq!(inner.depth(), 3);
    }

    assert_eq!(chain.depth(), 1);
    assert!(chain.resolve_variable("temp", pos()).is_err());
}

#[test]
fn test_guard_restores_depth_on_error_path() {
    fn fails_inside(chain: &mut ScopeChain) -> Result<(), crate::errors::errors::Error> {
        let scope = chain.enter(FrameKind::Ordinary);
        scope.resolve_variable("nope", pos())?;
        Ok(())
    }

    let mut chain = ScopeChain::new();
    assert!(fails_inside(&mut chain).is_err());
    assert_eq!(chain.depth(), 1);
}

#[test]
fn test_enter_function_seeds_parameters() {
    let mut chain = ScopeChain::new();
    let signature = FunctionSignature::new("f", PrimitiveType::Int, vec![PrimitiveType::Int], false);
    chain.declare_function(signature, pos()).unwrap();

    let body = chain
        .enter_function(vec![(
            Symbol::new("n", PrimitiveType::Int, Storage::Local(LocalSlot(0))),
            pos(),
        )])
        .unwrap();

    assert_eq!(body.resolve_variable("n", pos()).unwrap().ty, PrimitiveType::Int);
    // Recursive calls resolve through the enclosing frame.
    assert!(body.resolve_function("f", &[PrimitiveType::Int], pos()).is_ok());
}

#[test]
fn test_duplicate_parameters() {
    let mut chain = ScopeChain::new();
    let result = chain.enter_function(vec![
        (Symbol::new("n", PrimitiveType::Int, Storage::Local(LocalSlot(0))), pos()),
        (Symbol::new("n", PrimitiveType::Int, Storage::Local(LocalSlot(1))), pos()),
    ]);

    assert_eq!(result.err().unwrap().get_error_name(), "AlreadyDeclared");
    assert_eq!(chain.depth(), 1);
}

#[test]
fn test_call_argument_type_mismatch_position() {
    let mut chain = ScopeChain::new();
    chain
        .declare_function(
            FunctionSignature::new(
                "f",
                PrimitiveType::Int,
                vec![PrimitiveType::Int, PrimitiveType::Float],
                false,
            ),
            pos(),
        )
        .unwrap();

    let error = chain
        .resolve_function("f", &[PrimitiveType::Int, PrimitiveType::String], pos())
        .unwrap_err();

    assert_eq!(
        *error.kind(),
        crate::errors::errors::ErrorImpl::TypeMismatch {
            expected: PrimitiveType::Float,
            received: PrimitiveType::String,
            argument: Some(1),
        }
    );
}

#[test]
fn test_call_arity_checked_before_types() {
    let mut chain = ScopeChain::new();
    chain
        .declare_function(
            FunctionSignature::new("f", PrimitiveType::Int, vec![PrimitiveType::Int], false),
            pos(),
        )
        .unwrap();

    let too_many = chain
        .resolve_function("f", &[PrimitiveType::String, PrimitiveType::Int], pos())
        .unwrap_err();
    let too_few = chain.resolve_function("f", &[], pos()).unwrap_err();

    assert_eq!(too_many.get_error_name(), "ArityMismatch");
    assert_eq!(too_few.get_error_name(), "ArityMismatch");
}

#[test]
fn test_undefined_function() {
    let chain = ScopeChain::new();
    let error = chain.resolve_function("nope", &[], pos()).unwrap_err();

    assert_eq!(error.get_error_name(), "UndefinedIdentifier");
}
