use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    tree::{Expression, Ident, Term},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep extending lhs
    while let Some(power) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if power <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&parser.current_token_kind()) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };
        left = led(parser, left, power)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();
    let term = match token.kind {
        TokenKind::Integer => {
            let value = token.value.parse::<i32>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            })?;
            Term::IntegerLiteral {
                value,
                span: token.span,
            }
        }
        TokenKind::Float => {
            let value = token.value.parse::<f64>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            })?;
            Term::FloatLiteral {
                value,
                span: token.span,
            }
        }
        TokenKind::String => Term::StringLiteral {
            value: token.value,
            span: token.span,
        },
        TokenKind::True | TokenKind::False => Term::BoolLiteral {
            value: token.kind == TokenKind::True,
            span: token.span,
        },
        TokenKind::Identifier => Term::Identifier(Ident {
            name: token.value,
            span: token.span,
        }),
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(Expression::Term(term))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
) -> Result<Expression, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expression::BinaryOp {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_relational_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
) -> Result<Expression, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expression::RelOp {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let operator = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expression::UnaryOp {
        span: Span {
            start: operator.span.start.clone(),
            end: operand.span().end.clone(),
        },
        operator,
        operand: Box::new(operand),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let start = parser.advance().span.start.clone();
    let inner = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expression::Paren {
        inner: Box::new(inner),
        span: parser.span_from(start),
    })
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expression,
    _bp: BindingPower,
) -> Result<Expression, Error> {
    let name = match left {
        Expression::Term(Term::Identifier(ident)) => ident,
        _ => return Err(parser.unexpected_detailed("only named functions can be called")),
    };
    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expression::Call {
        span: parser.span_from(name.span.start.clone()),
        name,
        arguments,
    })
}
