use super::ast::{BinaryOperator, PrimitiveType, RelationalOperator, Storage, UnaryOperator};

/// A resolved variable: its name, declared type and storage.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    pub name: String,
    pub ty: PrimitiveType,
    pub storage: Storage,
}

/// A type-checked expression. `ty` is the static type computed during
/// lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: PrimitiveType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLiteral(i32),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(String),
    VarRef(VariableRef),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Relational {
        operator: RelationalOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, ty: PrimitiveType) -> Self {
        Expr { kind, ty }
    }
}
