//! Runtime state shared by the evaluator: values, the scope stack and the
//! I/O environment. Nothing here depends on the compile-time symbol table.

pub mod context;
pub mod environment;
pub mod value;

#[cfg(test)]
mod tests;
