use crate::{
    ast::{
        ast::Attribute,
        expressions::{BinaryOperator, Expression, ExpressionKind, Literal, UnaryOperator},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep extending the lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    let literal = match token.kind {
        TokenKind::Int => Literal::Int(token.value.parse().map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                token.span.start.clone(),
            )
        })?),
        TokenKind::Double => Literal::Double(token.value.parse().map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                token.span.start.clone(),
            )
        })?),
        TokenKind::String => Literal::String(token.value.clone()),
        TokenKind::Ready => Literal::Int(1),
        TokenKind::Noready => Literal::Int(0),
        TokenKind::Identifier => {
            return Ok(Expression::new(
                ExpressionKind::VariableRef {
                    name: token.value,
                    binding: Attribute::default(),
                },
                token.span,
            ))
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expression::new(ExpressionKind::Literal(literal), token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Plus => BinaryOperator::Plus,
        TokenKind::Dash => BinaryOperator::Minus,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulo,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEquals,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEquals,
        TokenKind::Equals => BinaryOperator::Equals,
        TokenKind::NotEquals => BinaryOperator::NotEquals,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        _ => return None,
    };
    Some(operator)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let operator = binary_operator(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };

    Ok(Expression::new(
        ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::Not {
        UnaryOperator::Not
    } else {
        UnaryOperator::Minus
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start: operator_token.span.start,
        end: operand.span.end.clone(),
    };

    Ok(Expression::new(
        ExpressionKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expression,
    _bp: BindingPower,
) -> Result<Expression, Error> {
    let ExpressionKind::VariableRef { name, .. } = &left.kind else {
        return Err(parser.detailed_error("only a variable can be assigned to"));
    };
    let target = name.clone();

    parser.advance();
    // Right associative: `a = b = 1` assigns `b` first
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = Span {
        start: left.span.start.clone(),
        end: value.span.end.clone(),
    };

    Ok(Expression::new(
        ExpressionKind::Assignment {
            target,
            value: Box::new(value),
            binding: Attribute::default(),
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expression,
    _bp: BindingPower,
) -> Result<Expression, Error> {
    let ExpressionKind::VariableRef { name, .. } = &left.kind else {
        return Err(parser.detailed_error("only a named function can be called"));
    };
    let name = name.clone();

    parser.advance();

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let span = parser.span_from(left.span.start.clone());

    Ok(Expression::new(
        ExpressionKind::FunctionCall {
            name,
            arguments,
            binding: Attribute::default(),
        },
        span,
    ))
}
