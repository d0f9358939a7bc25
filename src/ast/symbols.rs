//! What a name resolves to.
//!
//! Name resolution stores one of these in the binding attribute of every
//! name-using node. Functions are described by their signature rather than
//! by a pointer back into the tree, so a recursive function never holds a
//! reference to itself.

use std::{fmt::Display, rc::Rc};

use super::{ast::DeclId, types::ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Variable,
    Constant,
    Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub kind: VariableKind,
    pub value_type: ValueType,
    pub declaration: DeclId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<ValueType>,
    /// `None` when the function declares no return type.
    pub return_type: Option<ValueType>,
    pub builtin: bool,
}

impl FunctionSymbol {
    pub fn result_type(&self) -> ValueType {
        self.return_type.unwrap_or(ValueType::Void)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Type(ValueType),
    Variable(Rc<VariableSymbol>),
    Function(Rc<FunctionSymbol>),
}

impl Symbol {
    pub fn name_of_kind(&self) -> &'static str {
        match self {
            Symbol::Type(_) => "type",
            Symbol::Variable(variable) => match variable.kind {
                VariableKind::Constant => "constant",
                VariableKind::Parameter => "parameter",
                VariableKind::Variable => "variable",
            },
            Symbol::Function(_) => "function",
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Type(ty) => write!(f, "type {}", ty),
            Symbol::Variable(variable) => write!(
                f,
                "{} {}: {}",
                self.name_of_kind(),
                variable.name,
                variable.value_type
            ),
            Symbol::Function(function) => write!(f, "function {}", function.name),
        }
    }
}
