use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{
        ast::{Attribute, Node},
        declarations::{Declaration, DeclarationKind, FunctionDecl},
        expressions::{Expression, ExpressionKind},
        symbols::{FunctionSymbol, Symbol, VariableKind, VariableSymbol},
        types::{TypeName, ValueType},
    },
    builtins::builtins::is_builtin,
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::symbols::SymbolsTable;

/// First pass: binds every name-using node to the symbol it refers to.
#[derive(Debug, Default)]
pub struct NameResolver {
    pub symbols: SymbolsTable,
}

impl NameResolver {
    pub fn new() -> Self {
        NameResolver {
            symbols: SymbolsTable::new(),
        }
    }

    /// Builtin functions are found regardless of how their name is cased.
    fn lookup_function(&self, name: &str) -> Option<&Symbol> {
        match self.symbols.lookup(name) {
            Some(symbol) => Some(symbol),
            None if is_builtin(name) => self.symbols.lookup(&name.to_lowercase()),
            None => None,
        }
    }

    fn lookup_type(&self, type_name: &TypeName) -> Result<ValueType, Error> {
        match self.symbols.lookup(&type_name.name) {
            Some(Symbol::Type(value_type)) => Ok(*value_type),
            Some(other) => Err(Error::new(
                ErrorImpl::InvalidSymbol {
                    symbol: type_name.name.clone(),
                    expected: "type".to_string(),
                    found: other.name_of_kind().to_string(),
                },
                type_name.span.start.clone(),
            )),
            None => Err(unknown_symbol(&type_name.name, &type_name.span.start)),
        }
    }

    fn resolve_type_name(&self, type_name: &TypeName) -> Result<ValueType, Error> {
        let value_type = self.lookup_type(type_name)?;
        type_name.resolved.set(value_type)?;
        Ok(value_type)
    }

    /// Binds `name` to a variable that may be written to.
    fn bind_assignable(
        &self,
        name: &str,
        binding: &Attribute<Symbol>,
        position: &Position,
    ) -> Result<(), Error> {
        let symbol = self.expect_variable(name, position)?;

        if let Symbol::Variable(variable) = &symbol {
            if variable.kind == VariableKind::Constant {
                return Err(Error::new(
                    ErrorImpl::InvalidAssignment {
                        symbol: name.to_string(),
                    },
                    position.clone(),
                ));
            }
        }

        binding.set(symbol)
    }

    fn expect_variable(&self, name: &str, position: &Position) -> Result<Symbol, Error> {
        match self.symbols.lookup(name) {
            Some(symbol @ Symbol::Variable(_)) => Ok(symbol.clone()),
            Some(other) => Err(invalid_symbol(name, "variable", other, position)),
            None => Err(unknown_symbol(name, position)),
        }
    }
}

fn unknown_symbol(name: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::UnknownSymbol {
            symbol: name.to_string(),
        },
        position.clone(),
    )
}

fn invalid_symbol(name: &str, expected: &str, found: &Symbol, position: &Position) -> Error {
    Error::new(
        ErrorImpl::InvalidSymbol {
            symbol: name.to_string(),
            expected: expected.to_string(),
            found: found.name_of_kind().to_string(),
        },
        position.clone(),
    )
}

pub fn resolve_names_node(resolver: &mut NameResolver, node: &Node) -> Result<(), Error> {
    match node {
        Node::Declaration(declaration) => resolve_names_declaration(resolver, declaration),
        Node::Expression(expression) => resolve_names_expr(resolver, expression),
    }
}

pub fn resolve_names_block(resolver: &mut NameResolver, nodes: &[Node]) -> Result<(), Error> {
    for node in nodes {
        resolve_names_node(resolver, node)?;
    }
    Ok(())
}

fn define_variable(
    resolver: &mut NameResolver,
    declaration: &Declaration,
    kind: VariableKind,
    value_type: ValueType,
) -> Result<(), Error> {
    let symbol = Symbol::Variable(Rc::new(VariableSymbol {
        name: declaration.name.clone(),
        kind,
        value_type,
        declaration: declaration.id,
    }));

    resolver
        .symbols
        .define(&declaration.name, symbol, &declaration.span.start)
}

pub fn resolve_names_declaration(
    resolver: &mut NameResolver,
    declaration: &Declaration,
) -> Result<(), Error> {
    trace!(name = declaration.name.as_str(), "resolving declaration");

    match &declaration.kind {
        DeclarationKind::Variable {
            type_name,
            initializer,
        } => {
            let value_type = resolver.resolve_type_name(type_name)?;
            // The initializer cannot see the variable it initializes
            if let Some(initializer) = initializer {
                resolve_names_expr(resolver, initializer)?;
            }
            define_variable(resolver, declaration, VariableKind::Variable, value_type)
        }
        DeclarationKind::Constant { type_name, value } => {
            let value_type = resolver.resolve_type_name(type_name)?;
            resolve_names_expr(resolver, value)?;
            define_variable(resolver, declaration, VariableKind::Constant, value_type)
        }
        DeclarationKind::Parameter { type_name } => {
            let value_type = resolver.resolve_type_name(type_name)?;
            define_variable(resolver, declaration, VariableKind::Parameter, value_type)
        }
        DeclarationKind::Function(function) => {
            resolve_names_function(resolver, declaration, function)
        }
    }
}

fn resolve_names_function(
    resolver: &mut NameResolver,
    declaration: &Declaration,
    function: &FunctionDecl,
) -> Result<(), Error> {
    if is_builtin(&declaration.name) {
        return Err(Error::new(
            ErrorImpl::DuplicateSymbol {
                symbol: declaration.name.clone(),
            },
            declaration.span.start.clone(),
        ));
    }

    let return_type = match &function.return_type {
        Some(type_name) => Some(resolver.resolve_type_name(type_name)?),
        None => None,
    };

    // Parameter type names are bound when the parameters themselves are
    // resolved inside the body scope
    let mut parameters = Vec::with_capacity(function.parameters.len());
    for parameter in &function.parameters {
        let Some(type_name) = parameter.type_name() else {
            return Err(Error::new(
                ErrorImpl::InvalidExpression {
                    message: format!("parameter `{}` has no type", parameter.name),
                },
                parameter.span.start.clone(),
            ));
        };
        parameters.push(resolver.lookup_type(type_name)?);
    }

    let signature = Rc::new(FunctionSymbol {
        name: declaration.name.clone(),
        parameters,
        return_type,
        builtin: false,
    });

    // Defined before the body so the function can call itself
    resolver.symbols.define(
        &declaration.name,
        Symbol::Function(Rc::clone(&signature)),
        &declaration.span.start,
    )?;
    function.signature.set(signature)?;

    resolver.symbols.push_scope();
    let result = function
        .parameters
        .iter()
        .try_for_each(|parameter| resolve_names_declaration(resolver, parameter))
        .and_then(|_| resolve_names_block(resolver, &function.body));
    resolver.symbols.pop_scope()?;

    result
}

pub fn resolve_names_expr(resolver: &mut NameResolver, expression: &Expression) -> Result<(), Error> {
    let position = &expression.span.start;

    match &expression.kind {
        ExpressionKind::Literal(_) | ExpressionKind::Break | ExpressionKind::Continue => Ok(()),
        ExpressionKind::VariableRef { name, binding } => {
            let symbol = resolver.expect_variable(name, position)?;
            binding.set(symbol)
        }
        ExpressionKind::Assignment {
            target,
            value,
            binding,
        } => {
            resolve_names_expr(resolver, value)?;
            resolver.bind_assignable(target, binding, position)
        }
        ExpressionKind::Raid { target, binding } => {
            resolver.bind_assignable(target, binding, position)
        }
        ExpressionKind::Binary { left, right, .. } => {
            resolve_names_expr(resolver, left)?;
            resolve_names_expr(resolver, right)
        }
        ExpressionKind::Unary { operand, .. } => resolve_names_expr(resolver, operand),
        ExpressionKind::FunctionCall {
            name,
            arguments,
            binding,
        } => {
            for argument in arguments {
                resolve_names_expr(resolver, argument)?;
            }

            match resolver.lookup_function(name) {
                Some(symbol @ Symbol::Function(_)) => binding.set(symbol.clone()),
                Some(other) => Err(invalid_symbol(name, "function", other, position)),
                None => Err(unknown_symbol(name, position)),
            }
        }
        ExpressionKind::If { condition, body } | ExpressionKind::While { condition, body } => {
            resolve_names_expr(resolver, condition)?;
            resolve_names_block(resolver, body)
        }
        ExpressionKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            resolve_names_expr(resolver, condition)?;
            resolve_names_block(resolver, then_body)?;
            resolve_names_block(resolver, else_body)
        }
        ExpressionKind::For {
            iterator,
            condition,
            step,
            body,
        } => {
            resolver.symbols.push_scope();
            let result = resolve_names_declaration(resolver, iterator)
                .and_then(|_| resolve_names_expr(resolver, condition))
                .and_then(|_| match step {
                    Some(step) => resolve_names_expr(resolver, step),
                    None => Ok(()),
                })
                .and_then(|_| resolve_names_block(resolver, body));
            resolver.symbols.pop_scope()?;

            result
        }
        ExpressionKind::Return { value } => match value {
            Some(value) => resolve_names_expr(resolver, value),
            None => Ok(()),
        },
        ExpressionKind::Exodus { value } => resolve_names_expr(resolver, value),
        ExpressionKind::VariableScope { variables, body } => {
            resolver.symbols.push_scope();
            let result = variables
                .iter()
                .try_for_each(|variable| resolve_names_declaration(resolver, variable))
                .and_then(|_| resolve_names_expr(resolver, body));
            resolver.symbols.pop_scope()?;

            result
        }
    }
}
