//! Unit tests for the lexer module.

use super::{
    lexer::tokenize,
    stats::{LexicalStats, TokenCategory},
    tokens::TokenKind,
};
use crate::errors::errors::ErrorImpl;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.mys".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "maincraft monument dayzint fallout strike raid exodus iffy elysian valorant forza breakout contra funkotron returnal";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Maincraft,
            TokenKind::Monument,
            TokenKind::Dayzint,
            TokenKind::Fallout,
            TokenKind::Strike,
            TokenKind::Raid,
            TokenKind::Exodus,
            TokenKind::Iffy,
            TokenKind::Elysian,
            TokenKind::Valorant,
            TokenKind::Forza,
            TokenKind::Breakout,
            TokenKind::Contra,
            TokenKind::Funkotron,
            TokenKind::Returnal,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_keywords_ignore_case() {
    let tokens = tokenize("DAYZINT Exodus iFFy".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Dayzint);
    assert_eq!(tokens[0].value, "DAYZINT");
    assert_eq!(tokens[1].kind, TokenKind::Exodus);
    assert_eq!(tokens[2].kind, TokenKind::Iffy);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _under Radius".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_under");
    assert_eq!(tokens[3].value, "Radius");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 0 100.5".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Double);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[3].kind, TokenKind::Double);
}

#[test]
fn test_tokenize_boolean_literals() {
    assert_eq!(
        kinds("ready noready"),
        vec![TokenKind::Ready, TokenKind::Noready, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" 'world' "two words""#.to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].value, "two words");
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = tokenize(
        r#""line\nbreak" "tab\there" "back\\slash" "say \"hi\"" 'it\'s'"#.to_string(),
        None,
    )
    .unwrap();

    assert_eq!(tokens[0].value, "line\nbreak");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "back\\slash");
    assert_eq!(tokens[3].value, "say \"hi\"");
    assert_eq!(tokens[4].value, "it's");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != < > <= >= = && || !"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } , ; :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "dayzint x = 5; -- trailing comment\n/* block\ncomment */ exodus(x);";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Dayzint,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::Exodus,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("dayzint  total;".to_string(), Some("pos.mys".to_string())).unwrap();

    assert_eq!(tokens[1].span.start.0, 9);
    assert_eq!(tokens[1].span.end.0, 14);
    assert_eq!(tokens[1].span.start.1.as_str(), "pos.mys");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
    assert_eq!(tokens[3].span.start.0, 15);
}

#[test]
fn test_tokenize_unrecognized_token() {
    let result = tokenize("dayzint x = @;".to_string(), None);

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 12);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnrecognisedToken {
            token: "@".to_string()
        }
    );
}

#[test]
fn test_unterminated_string_is_rejected() {
    assert!(tokenize("exodus(\"open);".to_string(), None).is_err());
}

#[test]
fn test_unterminated_block_comment_is_rejected() {
    let error = tokenize("exodus(1); /* never closed\nexodus(2);".to_string(), None).unwrap_err();

    assert_eq!(error.get_position().0, 11);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnrecognisedToken {
            token: "/*".to_string()
        }
    );
}

#[test]
fn test_division_next_to_comment() {
    assert_eq!(
        kinds("4/2 /**/ /1"),
        vec![
            TokenKind::Int,
            TokenKind::Slash,
            TokenKind::Int,
            TokenKind::Slash,
            TokenKind::Int,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_lexical_stats() {
    let tokens = tokenize(
        "dayzint n = 3; iffy (n >= 2) { exodus(\"big\"); }".to_string(),
        None,
    )
    .unwrap();
    let stats = LexicalStats::collect(&tokens);

    assert_eq!(stats.count(TokenCategory::Keyword), 3);
    assert_eq!(stats.count(TokenCategory::Identifier), 2);
    assert_eq!(stats.count(TokenCategory::NumberLiteral), 2);
    assert_eq!(stats.count(TokenCategory::StringLiteral), 1);
    assert_eq!(stats.count(TokenCategory::Operator), 2);
    assert_eq!(stats.count(TokenCategory::Other), 8);
    assert_eq!(stats.total(), tokens.len() - 1);
    assert_eq!(
        stats.to_string(),
        "keywords: 3\nidentifier: 2\nnumber literals: 2\nstring literals: 1\noperators: 2\nother lexemes: 8"
    );
}

#[test]
fn test_lexical_stats_of_empty_source() {
    let stats = LexicalStats::collect(&tokenize("-- nothing".to_string(), None).unwrap());

    assert_eq!(stats.total(), 0);
    assert_eq!(stats, LexicalStats::default());
}
