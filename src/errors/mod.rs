//! Error types shared by every stage of the interpreter.
//!
//! Each error carries the position it was raised at and a classification
//! ([`errors::ErrorKind`]) so callers can tell a syntax error from a type
//! error or a runtime fault without matching every variant.

pub mod errors;
