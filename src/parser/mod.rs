//! Parser module for building the AST.
//!
//! Transforms a token stream into the program's list of top-level nodes.
//! Expressions are parsed with a Pratt parser: NUD (null denotation) and LED
//! (left denotation) handlers registered per token kind, with binding powers
//! for precedence. Statements dispatch on their leading keyword.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
