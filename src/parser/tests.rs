//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the MiniC constructs including:
//! - Variable and function declarations
//! - Function definitions
//! - Expressions and precedence
//! - Control flow statements
//! - Error recovery

use std::rc::Rc;

use crate::{errors::errors::Error, lexer::lexer::tokenize, lexer::tokens::TokenKind};

use super::{
    parser::{parse, parse_recovering},
    tree::{DeclarationKind, Expression, Line, Start, Statement, Term},
};

fn parse_source(source: &str) -> Result<Start, Error> {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse(tokens, Rc::new("test.c".to_string()))
}

fn recover_source(source: &str) -> (Start, Vec<Error>) {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse_recovering(tokens, Rc::new("test.c".to_string()))
}

fn function_body(start: &Start) -> &Vec<Statement> {
    match &start.lines[0] {
        Line::FunctionDef(function) => &function.block.statements,
        other => panic!("expected a function definition, got {:?}", other),
    }
}

/// The value of the single global assignment in `start`.
fn assigned_value(start: &Start) -> &Expression {
    match &start.lines[0] {
        Line::Assignment(assignment) => &assignment.value,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let start = parse_source("int a;").unwrap();

    match &start.lines[0] {
        Line::Declaration(declaration) => {
            assert!(!declaration.is_extern);
            match &declaration.kind {
                DeclarationKind::Variable(arg) => {
                    assert_eq!(arg.ty.name, "int");
                    assert_eq!(arg.name.name, "a");
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_extern_function_declaration() {
    let start = parse_source("extern void print(str message, int);").unwrap();

    match &start.lines[0] {
        Line::Declaration(declaration) => {
            assert!(declaration.is_extern);
            match &declaration.kind {
                DeclarationKind::Function(function) => {
                    assert_eq!(function.name.name, "print");
                    let params = function
                        .params
                        .iter()
                        .map(|ty| ty.name.as_str())
                        .collect::<Vec<&str>>();
                    assert_eq!(params, vec!["str", "int"]);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_sole_void_parameter_means_none() {
    let start = parse_source("int rand(void);").unwrap();

    match &start.lines[0] {
        Line::Declaration(declaration) => match &declaration.kind {
            DeclarationKind::Function(function) => assert!(function.params.is_empty()),
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_function_definition() {
    let start = parse_source("int add(int a, int b) { return a + b; }").unwrap();

    match &start.lines[0] {
        Line::FunctionDef(function) => {
            assert_eq!(function.name.name, "add");
            assert_eq!(function.params.len(), 2);
            assert_eq!(function.params[1].name.name, "b");
            assert!(matches!(
                function.block.statements[0],
                Statement::Return { value: Some(_), .. }
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_definition_parameters_need_names() {
    let error = parse_source("int f(int) { return 1; }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_extern_definition_is_rejected() {
    let error = parse_source("extern int f() { return 1; }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_global_assignment() {
    let start = parse_source("a = 5;").unwrap();

    assert!(matches!(
        assigned_value(&start),
        Expression::Term(Term::IntegerLiteral { value: 5, .. })
    ));
}

#[test]
fn test_multiplication_binds_tighter() {
    let start = parse_source("a = 1 + 2 * 3;").unwrap();

    match assigned_value(&start) {
        Expression::BinaryOp {
            operator, right, ..
        } => {
            assert_eq!(operator.kind, TokenKind::Plus);
            assert!(matches!(
                right.as_ref(),
                Expression::BinaryOp { operator, .. } if operator.kind == TokenKind::Star
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_subtraction_is_left_associative() {
    let start = parse_source("a = 1 - 2 - 3;").unwrap();

    match assigned_value(&start) {
        Expression::BinaryOp { left, right, .. } => {
            assert!(matches!(left.as_ref(), Expression::BinaryOp { .. }));
            assert!(matches!(
                right.as_ref(),
                Expression::Term(Term::IntegerLiteral { value: 3, .. })
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_relational_binds_loosest() {
    let start = parse_source("a = 1 + 2 < 4;").unwrap();

    match assigned_value(&start) {
        Expression::RelOp { operator, left, .. } => {
            assert_eq!(operator.kind, TokenKind::Less);
            assert!(matches!(left.as_ref(), Expression::BinaryOp { .. }));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let start = parse_source("a = -1 * 2;").unwrap();

    match assigned_value(&start) {
        Expression::BinaryOp { left, .. } => {
            assert!(matches!(left.as_ref(), Expression::UnaryOp { .. }));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_parenthesised_and_call() {
    let start = parse_source("a = (f(1, 2.5, \"s\") + g());").unwrap();

    match assigned_value(&start) {
        Expression::Paren { inner, .. } => match inner.as_ref() {
            Expression::BinaryOp { left, right, .. } => {
                assert!(matches!(
                    left.as_ref(),
                    Expression::Call { name, arguments, .. }
                        if name.name == "f" && arguments.len() == 3
                ));
                assert!(matches!(
                    right.as_ref(),
                    Expression::Call { arguments, .. } if arguments.is_empty()
                ));
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_literals() {
    let start = parse_source("a = true; b = 1.5; c = \"x\";").unwrap();

    assert_eq!(start.lines.len(), 3);
    assert!(matches!(
        assigned_value(&start),
        Expression::Term(Term::BoolLiteral { value: true, .. })
    ));
}

#[test]
fn test_integer_literal_out_of_range() {
    let error = parse_source("a = 4294967296;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_parse_statements() {
    let source = "void f() { int i; i = 0; while (i < 10) { i = i + 1; } if (i) ; else return; g(i); }";
    let start = parse_source(source).unwrap();
    let body = function_body(&start);

    assert!(matches!(body[0], Statement::Declare(_)));
    assert!(matches!(body[1], Statement::Assign(_)));
    assert!(matches!(body[2], Statement::While { .. }));
    match &body[3] {
        Statement::IfElse {
            then_stmt,
            else_stmt,
            ..
        } => {
            assert!(matches!(then_stmt.as_ref(), Statement::Empty(_)));
            assert!(matches!(
                else_stmt.as_ref(),
                Statement::Return { value: None, .. }
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(body[4], Statement::ExprStmt(Expression::Call { .. })));
}

#[test]
fn test_if_without_else() {
    let start = parse_source("void f() { if (1) { } }").unwrap();

    assert!(matches!(function_body(&start)[0], Statement::If { .. }));
}

#[test]
fn test_missing_semicolon_is_unexpected_token() {
    let error = parse_source("int a").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");

    let error = parse_source("a = 1").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_unterminated_block() {
    let error = parse_source("void f() { return;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_recovering_replaces_broken_statement() {
    let (start, errors) = recover_source("int a; void f() { a = ; a = 1; } int b;");

    assert_eq!(errors.len(), 1);
    assert_eq!(start.lines.len(), 3);

    let body = match &start.lines[1] {
        Line::FunctionDef(function) => &function.block.statements,
        other => panic!("unexpected {:?}", other),
    };
    assert!(matches!(body[0], Statement::Error(_)));
    assert!(matches!(body[1], Statement::Assign(_)));
}

#[test]
fn test_recovering_replaces_broken_line() {
    let (start, errors) = recover_source("int a; = 3; 5; int b;");

    assert_eq!(errors.len(), 2);
    assert_eq!(start.lines.len(), 4);
    assert!(matches!(start.lines[0], Line::Declaration(_)));
    assert!(matches!(start.lines[1], Line::Error(_)));
    assert!(matches!(start.lines.last(), Some(Line::Declaration(_))));
}

#[test]
fn test_recovering_keeps_clean_input_intact() {
    let (start, errors) = recover_source("int a; a = 1;");

    assert!(errors.is_empty());
    assert_eq!(start.lines.len(), 2);
}
