//! Lexical analysis.
//!
//! Converts source text into a stream of tokens using an ordered table of
//! anchored regex patterns. Keywords are case-insensitive; whitespace,
//! `--` line comments and `/* */` block comments are skipped. [`stats`]
//! counts tokens per category.

pub mod lexer;
pub mod stats;
pub mod tokens;

#[cfg(test)]
mod tests;
