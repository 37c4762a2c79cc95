use log::trace;

use crate::{
    ast::{
        ast::{BinaryOperator, PrimitiveType, RelationalOperator, UnaryOperator},
        expressions::{Expr, ExprKind, VariableRef},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::tree::{Expression, Term},
    scope::scope::ScopeChain,
};

fn unknown_operator(token: &Token) -> Error {
    Error::new(
        ErrorImpl::UnknownConstruct {
            construct: format!("operator `{}`", token.value),
        },
        token.span.start.clone(),
    )
}

fn unary_operator(token: &Token) -> Result<UnaryOperator, Error> {
    match token.kind {
        TokenKind::Plus => Ok(UnaryOperator::Pos),
        TokenKind::Dash => Ok(UnaryOperator::Neg),
        _ => Err(unknown_operator(token)),
    }
}

fn binary_operator(token: &Token) -> Result<BinaryOperator, Error> {
    match token.kind {
        TokenKind::Plus => Ok(BinaryOperator::Add),
        TokenKind::Dash => Ok(BinaryOperator::Sub),
        TokenKind::Star => Ok(BinaryOperator::Mul),
        TokenKind::Slash => Ok(BinaryOperator::Div),
        _ => Err(unknown_operator(token)),
    }
}

fn relational_operator(token: &Token) -> Result<RelationalOperator, Error> {
    match token.kind {
        TokenKind::Less => Ok(RelationalOperator::Lt),
        TokenKind::Greater => Ok(RelationalOperator::Gt),
        TokenKind::LessEquals => Ok(RelationalOperator::Leq),
        TokenKind::GreaterEquals => Ok(RelationalOperator::Geq),
        TokenKind::Equals => Ok(RelationalOperator::Eq),
        TokenKind::NotEquals => Ok(RelationalOperator::Neq),
        _ => Err(unknown_operator(token)),
    }
}

/// Both operands must agree, then the shared type must support arithmetic.
/// Returns the left operand's type.
fn check_operands(
    operator: &str,
    left: &Expr,
    right: &Expr,
    right_expression: &Expression,
    operator_token: &Token,
) -> Result<PrimitiveType, Error> {
    if left.ty != right.ty {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: left.ty,
                received: right.ty,
                argument: None,
            },
            right_expression.position(),
        ));
    }
    if !left.ty.is_binary_operable() {
        return Err(Error::new(
            ErrorImpl::UnsupportedBinaryOperand {
                operator: operator.to_string(),
                operand: left.ty,
            },
            operator_token.span.start.clone(),
        ));
    }

    Ok(left.ty)
}

fn lower_term(scopes: &ScopeChain, term: &Term) -> Result<Expr, Error> {
    match term {
        Term::Identifier(ident) => {
            let symbol = scopes.resolve_variable(&ident.name, ident.span.start.clone())?;
            Ok(Expr::new(
                ExprKind::VarRef(VariableRef {
                    name: symbol.name.clone(),
                    ty: symbol.ty,
                    storage: symbol.storage,
                }),
                symbol.ty,
            ))
        }
        Term::IntegerLiteral { value, .. } => {
            Ok(Expr::new(ExprKind::IntLiteral(*value), PrimitiveType::Int))
        }
        Term::FloatLiteral { value, .. } => {
            Ok(Expr::new(ExprKind::FloatLiteral(*value), PrimitiveType::Float))
        }
        Term::BoolLiteral { value, .. } => {
            Ok(Expr::new(ExprKind::BoolLiteral(*value), PrimitiveType::Bool))
        }
        Term::StringLiteral { value, .. } => Ok(Expr::new(
            ExprKind::StringLiteral(value.clone()),
            PrimitiveType::String,
        )),
    }
}

/// Lowers an expression and computes its static type. Reads the scope chain
/// but never changes it.
pub fn lower_expr(scopes: &ScopeChain, expression: &Expression) -> Result<Expr, Error> {
    let lowered = match expression {
        Expression::Term(term) => lower_term(scopes, term)?,
        Expression::Paren { inner, .. } => lower_expr(scopes, inner)?,
        Expression::UnaryOp {
            operator, operand, ..
        } => {
            let unary = unary_operator(operator)?;
            let operand = lower_expr(scopes, operand)?;
            if !operand.ty.is_unary_operable() {
                return Err(Error::new(
                    ErrorImpl::UnsupportedUnaryOperand {
                        operator: unary.to_string(),
                        operand: operand.ty,
                    },
                    operator.span.start.clone(),
                ));
            }

            let ty = operand.ty;
            Expr::new(
                ExprKind::Unary {
                    operator: unary,
                    operand: Box::new(operand),
                },
                ty,
            )
        }
        Expression::BinaryOp {
            operator,
            left,
            right,
            ..
        } => {
            let binary = binary_operator(operator)?;
            let lowered_left = lower_expr(scopes, left)?;
            let lowered_right = lower_expr(scopes, right)?;
            let ty = check_operands(
                &binary.to_string(),
                &lowered_left,
                &lowered_right,
                right,
                operator,
            )?;

            Expr::new(
                ExprKind::Binary {
                    operator: binary,
                    left: Box::new(lowered_left),
                    right: Box::new(lowered_right),
                },
                ty,
            )
        }
        Expression::RelOp {
            operator,
            left,
            right,
            ..
        } => {
            let relational = relational_operator(operator)?;
            let lowered_left = lower_expr(scopes, left)?;
            let lowered_right = lower_expr(scopes, right)?;
            let ty = check_operands(
                &relational.to_string(),
                &lowered_left,
                &lowered_right,
                right,
                operator,
            )?;

            Expr::new(
                ExprKind::Relational {
                    operator: relational,
                    left: Box::new(lowered_left),
                    right: Box::new(lowered_right),
                },
                ty,
            )
        }
        Expression::Call {
            name, arguments, ..
        } => {
            let arguments = arguments
                .iter()
                .map(|argument| lower_expr(scopes, argument))
                .collect::<Result<Vec<Expr>, Error>>()?;
            let argument_types = arguments
                .iter()
                .map(|argument| argument.ty)
                .collect::<Vec<PrimitiveType>>();
            let signature =
                scopes.resolve_function(&name.name, &argument_types, name.span.start.clone())?;

            Expr::new(
                ExprKind::Call {
                    name: name.name.clone(),
                    arguments,
                },
                signature.return_type,
            )
        }
    };

    trace!("{} has type {}", expression.position().0, lowered.ty);
    Ok(lowered)
}
