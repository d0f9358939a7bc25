//! Builtin types and functions.
//!
//! The same registry seeds the global scope of the semantic checker and
//! serves as the evaluator's dispatch table.

pub mod builtins;
