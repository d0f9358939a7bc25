use std::fmt::Display;

use super::tokens::{Token, TokenKind};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    NumberLiteral,
    StringLiteral,
    Operator,
    Other,
}

impl TokenCategory {
    /// Categories in report order.
    pub const ALL: [TokenCategory; 6] = [
        TokenCategory::Keyword,
        TokenCategory::Identifier,
        TokenCategory::NumberLiteral,
        TokenCategory::StringLiteral,
        TokenCategory::Operator,
        TokenCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TokenCategory::Keyword => "keywords",
            TokenCategory::Identifier => "identifier",
            TokenCategory::NumberLiteral => "number literals",
            TokenCategory::StringLiteral => "string literals",
            TokenCategory::Operator => "operators",
            TokenCategory::Other => "other lexemes",
        }
    }
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Maincraft
            | TokenKind::Monument
            | TokenKind::Dayzint
            | TokenKind::Fallout
            | TokenKind::Strike
            | TokenKind::Raid
            | TokenKind::Exodus
            | TokenKind::Iffy
            | TokenKind::Elysian
            | TokenKind::Valorant
            | TokenKind::Forza
            | TokenKind::Breakout
            | TokenKind::Contra
            | TokenKind::Funkotron
            | TokenKind::Returnal
            | TokenKind::Ready
            | TokenKind::Noready => TokenCategory::Keyword,

            TokenKind::Identifier => TokenCategory::Identifier,
            TokenKind::Int | TokenKind::Double => TokenCategory::NumberLiteral,
            TokenKind::String => TokenCategory::StringLiteral,

            TokenKind::Assignment
            | TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Not
            | TokenKind::Less
            | TokenKind::LessEquals
            | TokenKind::Greater
            | TokenKind::GreaterEquals
            | TokenKind::Or
            | TokenKind::And
            | TokenKind::Plus
            | TokenKind::Dash
            | TokenKind::Slash
            | TokenKind::Star
            | TokenKind::Percent => TokenCategory::Operator,

            TokenKind::EOF
            | TokenKind::OpenCurly
            | TokenKind::CloseCurly
            | TokenKind::OpenParen
            | TokenKind::CloseParen
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Comma => TokenCategory::Other,
        }
    }
}

/// Token counts per [`TokenCategory`]. The trailing `EOF` is not counted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalStats {
    counts: [usize; 6],
}

impl LexicalStats {
    pub fn collect(tokens: &[Token]) -> Self {
        let mut stats = LexicalStats::default();

        for token in tokens.iter().filter(|token| token.kind != TokenKind::EOF) {
            stats.counts[token.kind.category() as usize] += 1;
        }

        stats
    }

    pub fn count(&self, category: TokenCategory) -> usize {
        self.counts[category as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Display for LexicalStats {
    /// One `label: count` line per category, no trailing newline.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, category) in TokenCategory::ALL.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", category.label(), self.count(*category))?;
        }

        Ok(())
    }
}
