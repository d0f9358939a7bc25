use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Keywords, keyed by their lowercase spelling. Lookups lowercase the
    /// candidate first, so `MAINCRAFT` and `Maincraft` are both keywords.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("maincraft", TokenKind::Maincraft);
        map.insert("monument", TokenKind::Monument);
        map.insert("dayzint", TokenKind::Dayzint);
        map.insert("fallout", TokenKind::Fallout);
        map.insert("strike", TokenKind::Strike);
        map.insert("raid", TokenKind::Raid);
        map.insert("exodus", TokenKind::Exodus);
        map.insert("iffy", TokenKind::Iffy);
        map.insert("elysian", TokenKind::Elysian);
        map.insert("valorant", TokenKind::Valorant);
        map.insert("forza", TokenKind::Forza);
        map.insert("breakout", TokenKind::Breakout);
        map.insert("contra", TokenKind::Contra);
        map.insert("funkotron", TokenKind::Funkotron);
        map.insert("returnal", TokenKind::Returnal);
        map.insert("ready", TokenKind::Ready);
        map.insert("noready", TokenKind::Noready);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Double,
    String,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Maincraft,
    Monument,
    Dayzint,
    Fallout,
    Strike,
    Raid,
    Exodus,
    Iffy,
    Elysian,
    Valorant,
    Forza,
    Breakout,
    Contra,
    Funkotron,
    Returnal,
    Ready,
    Noready,
}

impl TokenKind {
    /// Whether this token names one of the value types.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Dayzint | TokenKind::Fallout | TokenKind::Strike
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Int | TokenKind::Double => {
                write!(f, "{} ({})", self.kind, self.value)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
