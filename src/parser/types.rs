//! Type annotation parsing.
//!
//! Only the three type keywords name types, so the table holds one NUD
//! handler per keyword and there are no type operators.

use std::collections::HashMap;

use crate::{
    ast::types::TypeName,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeName, Error>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Dayzint, parse_symbol_type);
    parser.type_nud(TokenKind::Fallout, parse_symbol_type);
    parser.type_nud(TokenKind::Strike, parse_symbol_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeName, Error> {
    let token = parser.advance().clone();
    Ok(TypeName::new(&token.value, token.span))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeName, Error> {
    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a type"),
            },
            parser.get_position(),
        ));
    };

    handler(parser)
}
