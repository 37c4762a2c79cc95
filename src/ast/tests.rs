//! Unit tests for the AST and its printer.

use crate::scope::symbols::FunctionSignature;

use super::{
    ast::{BinaryOperator, LocalSlot, PrimitiveType, RelationalOperator, Root, Storage, UnaryOperator},
    declarations::{Declaration, FunctionDecl, FunctionDefinition, Parameter, VariableDecl},
    expressions::{Expr, ExprKind, VariableRef},
    printer::PrettyPrint,
    statements::{Assignment, Block, Stmt},
};

fn int(value: i32) -> Expr {
    Expr::new(ExprKind::IntLiteral(value), PrimitiveType::Int)
}

fn var(name: &str, storage: Storage) -> VariableRef {
    VariableRef {
        name: name.to_string(),
        ty: PrimitiveType::Int,
        storage,
    }
}

#[test]
fn test_type_names_parse() {
    assert_eq!("int".parse::<PrimitiveType>(), Ok(PrimitiveType::Int));
    assert_eq!("str".parse::<PrimitiveType>(), Ok(PrimitiveType::String));
    assert_eq!("void".parse::<PrimitiveType>(), Ok(PrimitiveType::Void));
    assert!("string".parse::<PrimitiveType>().is_err());
    assert!("char".parse::<PrimitiveType>().is_err());
}

#[test]
fn test_type_display() {
    assert_eq!(PrimitiveType::String.to_string(), "string");
    assert_eq!(PrimitiveType::Bool.to_string(), "bool");
}

#[test]
fn test_operable_sets() {
    assert!(PrimitiveType::Int.is_unary_operable());
    assert!(PrimitiveType::Void.is_unary_operable());
    assert!(!PrimitiveType::Float.is_unary_operable());
    assert!(!PrimitiveType::String.is_unary_operable());

    assert!(PrimitiveType::Float.is_binary_operable());
    assert!(!PrimitiveType::String.is_binary_operable());
    assert!(!PrimitiveType::Void.is_binary_operable());

    assert!(PrimitiveType::Int.is_condition());
    assert!(!PrimitiveType::String.is_condition());
}

#[test]
fn test_operator_labels() {
    assert_eq!(UnaryOperator::Neg.to_string(), "NEG");
    assert_eq!(BinaryOperator::Div.to_string(), "DIV");
    assert_eq!(RelationalOperator::Leq.to_string(), "LEQ");
    assert_eq!(RelationalOperator::Neq.to_string(), "NEQ");
}

#[test]
fn test_print_binary_expression() {
    let expression = Expr::new(
        ExprKind::Binary {
            operator: BinaryOperator::Add,
            left: Box::new(int(1)),
            right: Box::new(Expr::new(
                ExprKind::Binary {
                    operator: BinaryOperator::Mul,
                    left: Box::new(int(2)),
                    right: Box::new(int(3)),
                },
                PrimitiveType::Int,
            )),
        },
        PrimitiveType::Int,
    );

    let expected = "\
BExpr. ADD
(BExpr) LHS =
|   IntLiteral. 1
(BExpr) RHS =
|   BExpr. MUL
|   (BExpr) LHS =
|   |   IntLiteral. 2
|   (BExpr) RHS =
|   |   IntLiteral. 3
";
    assert_eq!(expression.pretty(), expected);
}

#[test]
fn test_print_call_without_arguments() {
    let call = Expr::new(
        ExprKind::Call {
            name: "f".to_string(),
            arguments: vec![],
        },
        PrimitiveType::Void,
    );

    assert_eq!(call.pretty(), "Call. f\n");
}

#[test]
fn test_print_if_without_else() {
    let statement = Stmt::If {
        condition: Expr::new(ExprKind::BoolLiteral(true), PrimitiveType::Bool),
        then_stmt: Box::new(Stmt::Return(None)),
        else_stmt: None,
    };

    let expected = "\
If.
(If) condition =
|   BoolLiteral. true
(If) then =
|   Ret.
";
    assert_eq!(statement.pretty(), expected);
}

#[test]
fn test_print_root() {
    let root = Root {
        unit_name: "unit".to_string(),
        declarations: vec![
            Declaration::Variable(VariableDecl {
                is_extern: false,
                ty: PrimitiveType::Int,
                name: "a".to_string(),
            }),
            Declaration::Function(FunctionDecl {
                is_extern: true,
                return_type: PrimitiveType::Void,
                name: "print".to_string(),
                param_types: vec![PrimitiveType::String, PrimitiveType::Int],
            }),
        ],
        global_assignments: vec![Assignment {
            target: var("a", Storage::Global),
            value: int(5),
        }],
        function_definitions: vec![FunctionDefinition {
            signature: FunctionSignature::new(
                "id",
                PrimitiveType::Int,
                vec![PrimitiveType::Int],
                false,
            ),
            params: vec![Parameter {
                ty: PrimitiveType::Int,
                name: "n".to_string(),
                slot: LocalSlot(0),
            }],
            body: Block {
                statements: vec![
                    Stmt::Empty,
                    Stmt::Return(Some(Expr::new(
                        ExprKind::VarRef(var("n", Storage::Local(LocalSlot(0)))),
                        PrimitiveType::Int,
                    ))),
                ],
            },
        }],
    };

    let expected = "\
Root. unit
Declarations:
|   VarDecl. int a
|   FuncDecl. extern void print(string, int)
Assignments:
|   Asgn. a =
|   |   IntLiteral. 5
Functions:
|   FuncDef. int id(int n)
|   |   Block.
|   |   |   EmptyStmt.
|   |   |   Ret. expression =
|   |   |   |   Var. n
";
    assert_eq!(root.pretty(), expected);
}

#[test]
fn test_print_nested_indentation() {
    let statement = Stmt::While {
        condition: Expr::new(
            ExprKind::Relational {
                operator: RelationalOperator::Lt,
                left: Box::new(int(1)),
                right: Box::new(int(2)),
            },
            PrimitiveType::Int,
        ),
        body: Box::new(Stmt::Block(Block {
            statements: vec![Stmt::Expr(Expr::new(
                ExprKind::Unary {
                    operator: UnaryOperator::Neg,
                    operand: Box::new(int(4)),
                },
                PrimitiveType::Int,
            ))],
        })),
    };

    let mut out = String::new();
    statement.print(1, &mut out);

    let expected = "\
|   While.
|   (While) condition =
|   |   RExpr. LT
|   |   (RExpr) LHS =
|   |   |   IntLiteral. 1
|   |   (RExpr) RHS =
|   |   |   IntLiteral. 2
|   (While) body =
|   |   Block.
|   |   |   UExpr. NEG, expression =
|   |   |   |   IntLiteral. 4
";
    assert_eq!(out, expected);
}
