/// AST (Abstract Syntax Tree) module
///
/// Submodules:
/// - ast: `Node`, the single-assignment `Attribute` cell and declaration ids
/// - declarations: function, variable, constant and parameter declarations
/// - expressions: every expression and statement form
/// - symbols: what names resolve to
/// - types: value types and source type names
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod symbols;
pub mod types;
