use std::{
    cell::OnceCell,
    fmt::Debug,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{declarations::Declaration, expressions::Expression, types::ValueType};

/// A top-level or block-level item of a program.
#[derive(Debug, Clone)]
pub enum Node {
    Declaration(Declaration),
    Expression(Expression),
}

impl Node {
    pub fn span(&self) -> &Span {
        match self {
            Node::Declaration(declaration) => &declaration.span,
            Node::Expression(expression) => &expression.span,
        }
    }

    pub fn result_type(&self) -> &Attribute<ValueType> {
        match self {
            Node::Declaration(declaration) => &declaration.result_type,
            Node::Expression(expression) => &expression.result_type,
        }
    }
}

impl From<Declaration> for Node {
    fn from(declaration: Declaration) -> Self {
        Node::Declaration(declaration)
    }
}

impl From<Expression> for Node {
    fn from(expression: Expression) -> Self {
        Node::Expression(expression)
    }
}

/// A value filled in exactly once by a semantic pass.
///
/// Reading before the value is set, or setting it twice, means a pass ran
/// out of order. Both are reported as internal errors instead of silently
/// overwriting.
#[derive(Clone)]
pub struct Attribute<T> {
    cell: OnceCell<T>,
}

impl<T> Default for Attribute<T> {
    fn default() -> Self {
        Attribute {
            cell: OnceCell::new(),
        }
    }
}

impl<T> Attribute<T> {
    pub fn set(&self, value: T) -> Result<(), Error> {
        self.cell.set(value).map_err(|_| {
            Error::internal(ErrorImpl::AttributeAlreadySet {
                attribute: std::any::type_name::<T>(),
            })
        })
    }

    pub fn get(&self) -> Result<&T, Error> {
        self.cell.get().ok_or_else(|| {
            Error::internal(ErrorImpl::AttributeNotSet {
                attribute: std::any::type_name::<T>(),
            })
        })
    }
}

impl<T: Debug> Debug for Attribute<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cell.get() {
            Some(value) => write!(f, "{:?}", value),
            None => write!(f, "<unset>"),
        }
    }
}

static NEXT_DECL_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a declaration node, stable for the lifetime of the process.
///
/// The evaluator uses it to tell a declaration being evaluated again (a
/// constant inside a function body, say) from a second declaration that
/// reuses the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(u32);

impl DeclId {
    pub fn fresh() -> Self {
        DeclId(NEXT_DECL_ID.fetch_add(1, Ordering::Relaxed))
    }
}
