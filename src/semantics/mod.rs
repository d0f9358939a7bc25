//! Static analysis run between parsing and evaluation.
//!
//! Three passes fill in the attributes the parser left empty: bindings and
//! resolved type names, then loop and arity rules, then result types.

pub mod checker;
pub mod context_rules;
pub mod resolve_names;
pub mod resolve_types;
pub mod symbols;
