use std::rc::Rc;

use crate::{
    ast::{
        ast::{Attribute, Node},
        declarations::{Declaration, DeclarationKind, FunctionDecl},
        expressions::{Expression, ExpressionKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Expression(expr))
}

/// Parses `{ statement* }`.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.detailed_error("expected `}` before end of file"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(statements)
}

/// Parses `type name [= value]` without the trailing semicolon.
fn parse_variable_declaration(
    parser: &mut Parser,
    require_value: bool,
) -> Result<Declaration, Error> {
    let start = parser.get_position();
    let type_name = parse_type(parser)?;

    let error = parser.detailed_error("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else if require_value {
        return Err(parser.detailed_error("expected an initial value"));
    } else {
        None
    };

    Ok(Declaration::new(
        &name,
        DeclarationKind::Variable {
            type_name,
            initializer,
        },
        parser.span_from(start),
    ))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let declaration = parse_variable_declaration(parser, false)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Declaration(declaration))
}

pub fn parse_const_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    let type_name = parse_type(parser)?;

    let error = parser.detailed_error("expected identifier during constant declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let error = parser.detailed_error("expected rhs in constant definition");
    parser.expect_error(TokenKind::Assignment, Some(error))?;
    let value = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Declaration(Declaration::new(
        &name,
        DeclarationKind::Constant {
            type_name,
            value: Box::new(value),
        },
        parser.span_from(start),
    )))
}

fn parse_condition(parser: &mut Parser) -> Result<Expression, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let condition = Box::new(parse_condition(parser)?);
    let body = parse_block(parser)?;

    let kind = if parser.current_token_kind() == TokenKind::Elysian {
        parser.advance();

        // `elysian iffy` chains into a nested conditional
        let else_body = if parser.current_token_kind() == TokenKind::Iffy {
            vec![parse_if_stmt(parser)?]
        } else {
            parse_block(parser)?
        };

        ExpressionKind::IfElse {
            condition,
            then_body: body,
            else_body,
        }
    } else {
        ExpressionKind::If { condition, body }
    };

    Ok(Node::Expression(Expression::new(
        kind,
        parser.span_from(start),
    )))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let condition = Box::new(parse_condition(parser)?);
    let body = parse_block(parser)?;

    Ok(Node::Expression(Expression::new(
        ExpressionKind::While { condition, body },
        parser.span_from(start),
    )))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Node, Error> {
    // forza (dayzint i = 1; i <= 5; i = i + 1) { ... }
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let iterator = Box::new(parse_variable_declaration(parser, true)?);
    parser.expect(TokenKind::Semicolon)?;

    let condition = Box::new(parse_expr(parser, BindingPower::Default)?);
    parser.expect(TokenKind::Semicolon)?;

    let step = if parser.current_token_kind() != TokenKind::CloseParen {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Node::Expression(Expression::new(
        ExpressionKind::For {
            iterator,
            condition,
            step,
            body,
        },
        parser.span_from(start),
    )))
}

pub fn parse_loop_control_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.advance().clone();
    let kind = if token.kind == TokenKind::Breakout {
        ExpressionKind::Break
    } else {
        ExpressionKind::Continue
    };
    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Expression(Expression::new(kind, token.span)))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Expression(Expression::new(
        ExpressionKind::Return { value },
        parser.span_from(start),
    )))
}

pub fn parse_raid_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let error = parser.detailed_error("raid reads into a variable");
    let target = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Expression(Expression::new(
        ExpressionKind::Raid {
            target,
            binding: Attribute::default(),
        },
        parser.span_from(start),
    )))
}

pub fn parse_exodus_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let value = Box::new(parse_expr(parser, BindingPower::Default)?);
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Node::Expression(Expression::new(
        ExpressionKind::Exodus { value },
        parser.span_from(start),
    )))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    // funkotron name(dayzint a, fallout b): dayzint { ... }
    let start = parser.advance().span.start.clone();

    let identifier = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let parameter_start = parser.get_position();
        let type_name = parse_type(parser)?;
        let name = parser.expect(TokenKind::Identifier)?.value;

        parameters.push(Declaration::new(
            &name,
            DeclarationKind::Parameter { type_name },
            parser.span_from(parameter_start),
        ));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.detailed_error("expected `,` or `)` after parameter"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Node::Declaration(Declaration::new(
        &identifier,
        DeclarationKind::Function(Rc::new(FunctionDecl {
            parameters,
            return_type,
            body,
            signature: Attribute::default(),
        })),
        parser.span_from(start),
    )))
}

/// Parses `maincraft() { ... }` and returns its body, which runs as if it
/// were written at the top level.
pub fn parse_main_stmt(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.advance();
    parser.expect(TokenKind::OpenParen)?;
    parser.expect(TokenKind::CloseParen)?;

    parse_block(parser)
}

pub fn parse_nested_item_stmt(parser: &mut Parser) -> Result<Node, Error> {
    Err(parser.detailed_error("functions and maincraft are only allowed at the top level"))
}
