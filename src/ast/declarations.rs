use std::rc::Rc;

use crate::Span;

use super::{
    ast::{Attribute, DeclId, Node},
    expressions::Expression,
    symbols::FunctionSymbol,
    types::{TypeName, ValueType},
};

/// Declaration node. The result type is the declared type of the variable,
/// constant or parameter, or the return type of a function (`Void` when
/// none is declared).
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclarationKind,
    pub result_type: Attribute<ValueType>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Function(Rc<FunctionDecl>),
    Variable {
        type_name: TypeName,
        initializer: Option<Box<Expression>>,
    },
    Constant {
        type_name: TypeName,
        value: Box<Expression>,
    },
    Parameter {
        type_name: TypeName,
    },
}

/// Function body and signature. Shared through an `Rc` so the runtime
/// function table can hold on to it after the declaration is evaluated.
#[derive(Debug)]
pub struct FunctionDecl {
    pub parameters: Vec<Declaration>,
    pub return_type: Option<TypeName>,
    pub body: Vec<Node>,
    pub signature: Attribute<Rc<FunctionSymbol>>,
}

impl Declaration {
    pub fn new(name: &str, kind: DeclarationKind, span: Span) -> Self {
        Declaration {
            id: DeclId::fresh(),
            name: name.to_string(),
            kind,
            result_type: Attribute::default(),
            span,
        }
    }

    pub fn variable(name: &str, type_name: &str, initializer: Option<Expression>) -> Self {
        Declaration::new(
            name,
            DeclarationKind::Variable {
                type_name: TypeName::new(type_name, Span::null()),
                initializer: initializer.map(Box::new),
            },
            Span::null(),
        )
    }

    pub fn constant(name: &str, type_name: &str, value: Expression) -> Self {
        Declaration::new(
            name,
            DeclarationKind::Constant {
                type_name: TypeName::new(type_name, Span::null()),
                value: Box::new(value),
            },
            Span::null(),
        )
    }

    pub fn parameter(name: &str, type_name: &str) -> Self {
        Declaration::new(
            name,
            DeclarationKind::Parameter {
                type_name: TypeName::new(type_name, Span::null()),
            },
            Span::null(),
        )
    }

    /// `parameters` are `(name, type name)` pairs.
    pub fn function(
        name: &str,
        parameters: &[(&str, &str)],
        return_type: Option<&str>,
        body: Vec<Node>,
    ) -> Self {
        Declaration::new(
            name,
            DeclarationKind::Function(Rc::new(FunctionDecl {
                parameters: parameters
                    .iter()
                    .map(|(name, ty)| Declaration::parameter(name, ty))
                    .collect(),
                return_type: return_type.map(|ty| TypeName::new(ty, Span::null())),
                body,
                signature: Attribute::default(),
            })),
            Span::null(),
        )
    }

    /// The type name this declaration is annotated with, if any.
    pub fn type_name(&self) -> Option<&TypeName> {
        match &self.kind {
            DeclarationKind::Function(function) => function.return_type.as_ref(),
            DeclarationKind::Variable { type_name, .. }
            | DeclarationKind::Constant { type_name, .. }
            | DeclarationKind::Parameter { type_name } => Some(type_name),
        }
    }
}
