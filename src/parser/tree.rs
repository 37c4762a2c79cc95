//! The concrete parse tree handed to lowering.
//!
//! One closed enum per grammar category. Type names stay as written so that
//! lowering decides which are supported.

use crate::{lexer::tokens::Token, Position, Span};

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A type as spelled in the source, eg. `int` or `str`.
#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: String,
    pub span: Span,
}

/// Tokens the recogniser could not fit into any rule.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub tokens: Vec<Token>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Start {
    pub lines: Vec<Line>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Line {
    Declaration(Declaration),
    Assignment(Assignment),
    FunctionDef(FunctionDef),
    Error(ErrorNode),
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub is_extern: bool,
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Variable(Arg),
    Function(FunctionDecl),
}

/// A forward declaration; parameters are types only.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub return_type: TypeName,
    pub name: Ident,
    pub params: Vec<TypeName>,
}

/// A typed name, as in `int a`.
#[derive(Debug, Clone)]
pub struct Arg {
    pub ty: TypeName,
    pub name: Ident,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub return_type: TypeName,
    pub name: Ident,
    pub params: Vec<Arg>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub target: Ident,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Return {
        value: Option<Expression>,
        span: Span,
    },
    ExprStmt(Expression),
    If {
        condition: Expression,
        then_stmt: Box<Statement>,
        span: Span,
    },
    IfElse {
        condition: Expression,
        then_stmt: Box<Statement>,
        else_stmt: Box<Statement>,
        span: Span,
    },
    Block(Block),
    Assign(Assignment),
    While {
        condition: Expression,
        body: Box<Statement>,
        span: Span,
    },
    Declare(Arg),
    Empty(Span),
    Error(ErrorNode),
}

#[derive(Debug, Clone)]
pub enum Expression {
    Term(Term),
    UnaryOp {
        operator: Token,
        operand: Box<Expression>,
        span: Span,
    },
    BinaryOp {
        operator: Token,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Paren {
        inner: Box<Expression>,
        span: Span,
    },
    RelOp {
        operator: Token,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Call {
        name: Ident,
        arguments: Vec<Expression>,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub enum Term {
    Identifier(Ident),
    IntegerLiteral { value: i32, span: Span },
    FloatLiteral { value: f64, span: Span },
    StringLiteral { value: String, span: Span },
    BoolLiteral { value: bool, span: Span },
}

impl Term {
    pub fn span(&self) -> &Span {
        match self {
            Term::Identifier(ident) => &ident.span,
            Term::IntegerLiteral { span, .. }
            | Term::FloatLiteral { span, .. }
            | Term::StringLiteral { span, .. }
            | Term::BoolLiteral { span, .. } => span,
        }
    }
}

impl Expression {
    pub fn span(&self) -> &Span {
        match self {
            Expression::Term(term) => term.span(),
            Expression::UnaryOp { span, .. }
            | Expression::BinaryOp { span, .. }
            | Expression::Paren { span, .. }
            | Expression::RelOp { span, .. }
            | Expression::Call { span, .. } => span,
        }
    }

    pub fn position(&self) -> Position {
        self.span().start.clone()
    }
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::ExprStmt(expression) => expression.span(),
            Statement::Block(block) => &block.span,
            Statement::Assign(assignment) => &assignment.span,
            Statement::Declare(arg) => &arg.name.span,
            Statement::Error(node) => &node.span,
            Statement::Return { span, .. }
            | Statement::If { span, .. }
            | Statement::IfElse { span, .. }
            | Statement::While { span, .. }
            | Statement::Empty(span) => span,
        }
    }
}
