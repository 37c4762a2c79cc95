use log::trace;

use crate::{
    ast::{
        ast::{PrimitiveType, Storage},
        expressions::{Expr, VariableRef},
        statements::{Assignment, Block, Stmt, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    parser::tree::{self, Expression, Statement},
    scope::{
        scope::{FrameKind, ScopeChain},
        symbols::Symbol,
    },
};

use super::{
    expr::lower_expr,
    lowering::{resolve_value_type, unknown_construct, Lowerer},
};

fn type_mismatch(expected: PrimitiveType, received: PrimitiveType, at: &Expression) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected,
            received,
            argument: None,
        },
        at.position(),
    )
}

/// The right-hand side must have the target's declared type.
pub fn lower_assignment(
    scopes: &ScopeChain,
    assignment: &tree::Assignment,
) -> Result<Assignment, Error> {
    let symbol = scopes.resolve_variable(
        &assignment.target.name,
        assignment.target.span.start.clone(),
    )?;
    let target = VariableRef {
        name: symbol.name.clone(),
        ty: symbol.ty,
        storage: symbol.storage,
    };

    let value = lower_expr(scopes, &assignment.value)?;
    if value.ty != target.ty {
        return Err(type_mismatch(target.ty, value.ty, &assignment.value));
    }

    Ok(Assignment { target, value })
}

fn lower_condition(scopes: &ScopeChain, condition: &Expression) -> Result<Expr, Error> {
    let lowered = lower_expr(scopes, condition)?;
    if !lowered.ty.is_condition() {
        return Err(type_mismatch(PrimitiveType::Bool, lowered.ty, condition));
    }

    Ok(lowered)
}

/// Lowers a block in a fresh ordinary frame.
pub fn lower_block(
    lowerer: &mut Lowerer,
    scopes: &mut ScopeChain,
    block: &tree::Block,
) -> Result<Block, Error> {
    let mut scope = scopes.enter(FrameKind::Ordinary);
    let mut statements = Vec::with_capacity(block.statements.len());
    for statement in &block.statements {
        statements.push(lower_stmt(lowerer, &mut scope, statement)?);
    }

    Ok(Block { statements })
}

pub fn lower_stmt(
    lowerer: &mut Lowerer,
    scopes: &mut ScopeChain,
    statement: &Statement,
) -> Result<Stmt, Error> {
    trace!("lowering statement at {:?}", statement.span().start.0);

    match statement {
        Statement::Return { value, span } => {
            let expected = lowerer.return_type();
            match value {
                Some(value) => {
                    let lowered = lower_expr(scopes, value)?;
                    if lowered.ty != expected {
                        return Err(type_mismatch(expected, lowered.ty, value));
                    }
                    Ok(Stmt::Return(Some(lowered)))
                }
                None if expected == PrimitiveType::Void => Ok(Stmt::Return(None)),
                None => Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected,
                        received: PrimitiveType::Void,
                        argument: None,
                    },
                    span.start.clone(),
                )),
            }
        }
        Statement::ExprStmt(expression) => Ok(Stmt::Expr(lower_expr(scopes, expression)?)),
        Statement::If {
            condition,
            then_stmt,
            ..
        } => Ok(Stmt::If {
            condition: lower_condition(scopes, condition)?,
            then_stmt: Box::new(lower_stmt(lowerer, scopes, then_stmt)?),
            else_stmt: None,
        }),
        Statement::IfElse {
            condition,
            then_stmt,
            else_stmt,
            ..
        } => Ok(Stmt::If {
            condition: lower_condition(scopes, condition)?,
            then_stmt: Box::new(lower_stmt(lowerer, scopes, then_stmt)?),
            else_stmt: Some(Box::new(lower_stmt(lowerer, scopes, else_stmt)?)),
        }),
        Statement::Block(block) => Ok(Stmt::Block(lower_block(lowerer, scopes, block)?)),
        Statement::Assign(assignment) => Ok(Stmt::Assign(lower_assignment(scopes, assignment)?)),
        Statement::While {
            condition, body, ..
        } => {
            let condition = lower_condition(scopes, condition)?;
            let mut loop_scope = scopes.enter(FrameKind::Loop);
            let body = lower_stmt(lowerer, &mut loop_scope, body)?;

            Ok(Stmt::While {
                condition,
                body: Box::new(body),
            })
        }
        Statement::Declare(arg) => {
            let ty = resolve_value_type(&arg.ty)?;
            let slot = lowerer.allocate_slot();
            scopes.declare_variable(
                Symbol::new(arg.name.name.as_str(), ty, Storage::Local(slot)),
                arg.name.span.start.clone(),
            )?;

            Ok(Stmt::VarDecl(VarDeclStmt {
                ty,
                name: arg.name.name.clone(),
                slot,
            }))
        }
        Statement::Empty(_) => Ok(Stmt::Empty),
        Statement::Error(node) => Err(unknown_construct(node)),
    }
}
