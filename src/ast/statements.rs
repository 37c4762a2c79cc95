use super::{
    ast::{LocalSlot, PrimitiveType},
    expressions::{Expr, VariableRef},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

/// Assignment (eg. `a = 1;`), at top level or inside a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: VariableRef,
    pub value: Expr,
}

/// Local variable declaration inside a block.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub ty: PrimitiveType,
    pub name: String,
    pub slot: LocalSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    If {
        condition: Expr,
        then_stmt: Box<Stmt>,
        else_stmt: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Assign(Assignment),
    VarDecl(VarDeclStmt),
    /// An expression evaluated for its effects, eg. `print(1);`.
    Expr(Expr),
    Empty,
}
