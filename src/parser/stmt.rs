use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{
    parser::Parser,
    tree::{
        Arg, Assignment, Block, Declaration, DeclarationKind, Expression, FunctionDecl,
        FunctionDef, Ident, Line, Statement, TypeName,
    },
};

/// One top-level line. In recovering mode a broken line becomes
/// `Line::Error`.
pub fn parse_line(parser: &mut Parser) -> Result<Line, Error> {
    let start = parser.mark();
    match parse_line_inner(parser) {
        Ok(line) => Ok(line),
        Err(error) if parser.is_recovering() => Ok(Line::Error(parser.recover(error, start, true))),
        Err(error) => Err(error),
    }
}

fn parse_line_inner(parser: &mut Parser) -> Result<Line, Error> {
    match (parser.peek_kind(0), parser.peek_kind(1)) {
        (TokenKind::Identifier, TokenKind::Assignment) => {
            Ok(Line::Assignment(parse_assignment(parser)?))
        }
        (TokenKind::Extern, _) | (TokenKind::Identifier, TokenKind::Identifier) => {
            parse_declaration_or_definition(parser)
        }
        _ => Err(parser.unexpected_detailed("expected a declaration, assignment or function")),
    }
}

fn parse_ident(parser: &mut Parser, message: &str) -> Result<Ident, Error> {
    let error = parser.unexpected_detailed(message);
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Ident {
        name: token.value,
        span: token.span,
    })
}

fn parse_type_name(parser: &mut Parser) -> Result<TypeName, Error> {
    let error = parser.unexpected_detailed("expected a type name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(TypeName {
        name: token.value,
        span: token.span,
    })
}

/// `TYPE NAME? (, TYPE NAME?)*`, closing paren not consumed. A lone unnamed
/// `void` stands for an empty list.
fn parse_params(parser: &mut Parser) -> Result<Vec<(TypeName, Option<Ident>)>, Error> {
    let mut params = vec![];
    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(params);
    }

    loop {
        let ty = parse_type_name(parser)?;
        let name = if parser.current_token_kind() == TokenKind::Identifier {
            Some(parse_ident(parser, "expected a parameter name")?)
        } else {
            None
        };
        params.push((ty, name));

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let sole_void = matches!(params.as_slice(), [(ty, None)] if ty.name == "void");
    if sole_void {
        params.clear();
    }

    Ok(params)
}

fn parse_declaration_or_definition(parser: &mut Parser) -> Result<Line, Error> {
    let start = parser.get_position();
    let is_extern = parser.current_token_kind() == TokenKind::Extern;
    if is_extern {
        parser.advance();
    }

    let ty = parse_type_name(parser)?;
    let name = parse_ident(parser, "expected an identifier after the type")?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok(Line::Declaration(Declaration {
            is_extern,
            kind: DeclarationKind::Variable(Arg { ty, name }),
            span: parser.span_from(start),
        }));
    }

    parser.expect(TokenKind::OpenParen)?;
    let params = parse_params(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok(Line::Declaration(Declaration {
            is_extern,
            kind: DeclarationKind::Function(FunctionDecl {
                return_type: ty,
                name,
                params: params.into_iter().map(|(ty, _)| ty).collect(),
            }),
            span: parser.span_from(start),
        }));
    }

    if is_extern {
        return Err(parser.unexpected_detailed("extern functions cannot have a body"));
    }
    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected_detailed("expected `;` or a function body"));
    }

    let mut args = vec![];
    for (param_ty, param_name) in params {
        match param_name {
            Some(param_name) => args.push(Arg {
                ty: param_ty,
                name: param_name,
            }),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: param_ty.name,
                        message: String::from("parameters of a function definition need names"),
                    },
                    param_ty.span.start,
                ))
            }
        }
    }

    let block = parse_block(parser)?;
    Ok(Line::FunctionDef(FunctionDef {
        return_type: ty,
        name,
        params: args,
        block,
        span: parser.span_from(start),
    }))
}

fn parse_assignment(parser: &mut Parser) -> Result<Assignment, Error> {
    let start = parser.get_position();
    let target = parse_ident(parser, "expected an assignment target")?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Assignment {
        target,
        value,
        span: parser.span_from(start),
    })
}

pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;
    let mut statements = vec![];

    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        let mark = parser.mark();
        match parse_stmt(parser) {
            Ok(statement) => statements.push(statement),
            Err(error) if parser.is_recovering() => {
                statements.push(Statement::Error(parser.recover(error, mark, false)))
            }
            Err(error) => return Err(error),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Block {
        statements,
        span: parser.span_from(start),
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    match (parser.peek_kind(0), parser.peek_kind(1)) {
        (TokenKind::Return, _) => parse_return_stmt(parser),
        (TokenKind::If, _) => parse_if_stmt(parser),
        (TokenKind::While, _) => parse_while_stmt(parser),
        (TokenKind::OpenCurly, _) => Ok(Statement::Block(parse_block(parser)?)),
        (TokenKind::Semicolon, _) => {
            let span = parser.advance().span.clone();
            Ok(Statement::Empty(span))
        }
        (TokenKind::Identifier, TokenKind::Identifier) => parse_declare_stmt(parser),
        (TokenKind::Identifier, TokenKind::Assignment) => {
            Ok(Statement::Assign(parse_assignment(parser)?))
        }
        _ => {
            let expression = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Statement::ExprStmt(expression))
        }
    }
}

fn parse_return_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let start = parser.advance().span.start.clone();
    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    Ok(Statement::Return {
        value,
        span: parser.span_from(start),
    })
}

fn parse_condition(parser: &mut Parser) -> Result<Expression, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

fn parse_if_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let start = parser.advance().span.start.clone();
    let condition = parse_condition(parser)?;
    let then_stmt = Box::new(parse_stmt(parser)?);

    if parser.current_token_kind() != TokenKind::Else {
        return Ok(Statement::If {
            condition,
            then_stmt,
            span: parser.span_from(start),
        });
    }

    parser.advance();
    let else_stmt = Box::new(parse_stmt(parser)?);
    Ok(Statement::IfElse {
        condition,
        then_stmt,
        else_stmt,
        span: parser.span_from(start),
    })
}

fn parse_while_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let start = parser.advance().span.start.clone();
    let condition = parse_condition(parser)?;
    let body = Box::new(parse_stmt(parser)?);

    Ok(Statement::While {
        condition,
        body,
        span: parser.span_from(start),
    })
}

fn parse_declare_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let ty = parse_type_name(parser)?;
    let name = parse_ident(parser, "expected an identifier after the type")?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Statement::Declare(Arg { ty, name }))
}
