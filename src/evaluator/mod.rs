/// Evaluator module
///
/// Submodules:
/// - evaluator: `Evaluator` state, the value stack and the `Flow` signal
/// - expr: values, operators and function calls
/// - stmt: declarations, blocks, loops and I/O statements
pub mod evaluator;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
