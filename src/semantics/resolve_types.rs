use crate::{
    ast::{
        ast::Node,
        declarations::{Declaration, DeclarationKind, FunctionDecl},
        expressions::{BinaryOperator, Expression, ExpressionKind, Literal, UnaryOperator},
        symbols::Symbol,
        types::ValueType,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Third pass: result types, type compatibility and the return guarantee.
#[derive(Debug, Default)]
pub struct TypeResolver {
    /// One slot per enclosing function, holding its declared return type
    /// (`Void` when none is declared).
    expected_returns: Vec<ValueType>,
}

impl TypeResolver {
    pub fn new() -> Self {
        TypeResolver::default()
    }
}

fn type_error(message: String, position: &Position) -> Error {
    Error::new(ErrorImpl::TypeError { message }, position.clone())
}

fn expect_compatible(
    expected: ValueType,
    found: ValueType,
    what: &str,
    position: &Position,
) -> Result<(), Error> {
    if expected.is_compatible_with(found) {
        Ok(())
    } else {
        Err(type_error(
            format!("{} expects {}, found {}", what, expected, found),
            position,
        ))
    }
}

fn expect_condition(condition: ValueType, position: &Position) -> Result<(), Error> {
    if condition == ValueType::Int {
        Ok(())
    } else {
        Err(type_error(
            format!("condition must be dayzint, found {}", condition),
            position,
        ))
    }
}

fn variable_type(symbol: &Symbol, position: &Position) -> Result<ValueType, Error> {
    match symbol {
        Symbol::Variable(variable) => Ok(variable.value_type),
        other => Err(type_error(format!("{} has no value", other), position)),
    }
}

/// Result type of `left <operator> right`.
pub fn binary_result_type(
    operator: BinaryOperator,
    left: ValueType,
    right: ValueType,
) -> Option<ValueType> {
    use BinaryOperator::*;

    let numeric = left.is_numeric() && right.is_numeric();
    let strings = left == ValueType::String && right == ValueType::String;

    match operator {
        And | Or => Some(ValueType::Int),
        Plus if numeric => Some(ValueType::widen(left, right)),
        Plus if strings => Some(ValueType::String),
        Minus | Multiply | Divide | Modulo if numeric => Some(ValueType::widen(left, right)),
        _ if operator.is_comparison() && (numeric || strings) => Some(ValueType::Int),
        _ => None,
    }
}

pub fn unary_result_type(operator: UnaryOperator, operand: ValueType) -> Option<ValueType> {
    match operator {
        UnaryOperator::Minus if operand.is_numeric() => Some(operand),
        UnaryOperator::Minus => None,
        UnaryOperator::Not => Some(ValueType::Int),
    }
}

/// Whether every path through `nodes` ends in a `returnal`.
pub fn guarantees_return(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Expression(expression) => match &expression.kind {
            ExpressionKind::Return { .. } => true,
            ExpressionKind::IfElse {
                then_body,
                else_body,
                ..
            } => guarantees_return(then_body) && guarantees_return(else_body),
            _ => false,
        },
        Node::Declaration(_) => false,
    })
}

pub fn resolve_types_node(resolver: &mut TypeResolver, node: &Node) -> Result<ValueType, Error> {
    match node {
        Node::Declaration(declaration) => resolve_types_declaration(resolver, declaration),
        Node::Expression(expression) => resolve_types_expr(resolver, expression),
    }
}

fn resolve_types_block(resolver: &mut TypeResolver, nodes: &[Node]) -> Result<(), Error> {
    for node in nodes {
        resolve_types_node(resolver, node)?;
    }
    Ok(())
}

fn declared_type(declaration: &Declaration) -> Result<ValueType, Error> {
    match declaration.type_name() {
        Some(type_name) => type_name.resolved.get().copied(),
        None => Ok(ValueType::Void),
    }
}

pub fn resolve_types_declaration(
    resolver: &mut TypeResolver,
    declaration: &Declaration,
) -> Result<ValueType, Error> {
    let position = &declaration.span.start;
    let value_type = declared_type(declaration)?;

    match &declaration.kind {
        DeclarationKind::Variable { initializer, .. } => {
            if let Some(initializer) = initializer {
                let found = resolve_types_expr(resolver, initializer)?;
                expect_compatible(
                    value_type,
                    found,
                    &format!("initializer of `{}`", declaration.name),
                    position,
                )?;
            }
        }
        DeclarationKind::Constant { value, .. } => {
            let found = resolve_types_expr(resolver, value)?;
            expect_compatible(
                value_type,
                found,
                &format!("constant `{}`", declaration.name),
                position,
            )?;
        }
        DeclarationKind::Parameter { .. } => {}
        DeclarationKind::Function(function) => {
            resolve_types_function(resolver, declaration, function, value_type)?;
        }
    }

    declaration.result_type.set(value_type)?;
    Ok(value_type)
}

fn resolve_types_function(
    resolver: &mut TypeResolver,
    declaration: &Declaration,
    function: &FunctionDecl,
    return_type: ValueType,
) -> Result<(), Error> {
    resolver.expected_returns.push(return_type);
    let result = function
        .parameters
        .iter()
        .try_for_each(|parameter| resolve_types_declaration(resolver, parameter).map(|_| ()))
        .and_then(|_| resolve_types_block(resolver, &function.body));
    resolver.expected_returns.pop();
    result?;

    if return_type != ValueType::Void && !guarantees_return(&function.body) {
        return Err(type_error(
            format!(
                "function `{}` must return {} on every path",
                declaration.name, return_type
            ),
            &declaration.span.start,
        ));
    }

    Ok(())
}

pub fn resolve_types_expr(
    resolver: &mut TypeResolver,
    expression: &Expression,
) -> Result<ValueType, Error> {
    let position = &expression.span.start;

    let result_type = match &expression.kind {
        ExpressionKind::Literal(Literal::Int(_)) => ValueType::Int,
        ExpressionKind::Literal(Literal::Double(_)) => ValueType::Double,
        ExpressionKind::Literal(Literal::String(_)) => ValueType::String,
        ExpressionKind::VariableRef { binding, .. } => variable_type(binding.get()?, position)?,
        ExpressionKind::Assignment {
            target,
            value,
            binding,
        } => {
            let target_type = variable_type(binding.get()?, position)?;
            let found = resolve_types_expr(resolver, value)?;
            expect_compatible(
                target_type,
                found,
                &format!("assignment to `{}`", target),
                position,
            )?;
            target_type
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            let left_type = resolve_types_expr(resolver, left)?;
            let right_type = resolve_types_expr(resolver, right)?;

            binary_result_type(*operator, left_type, right_type).ok_or_else(|| {
                type_error(
                    format!(
                        "operator `{}` cannot be applied to {} and {}",
                        operator, left_type, right_type
                    ),
                    position,
                )
            })?
        }
        ExpressionKind::Unary { operator, operand } => {
            let operand_type = resolve_types_expr(resolver, operand)?;

            unary_result_type(*operator, operand_type).ok_or_else(|| {
                type_error(
                    format!("operator `{}` cannot be applied to {}", operator, operand_type),
                    position,
                )
            })?
        }
        ExpressionKind::FunctionCall {
            name,
            arguments,
            binding,
        } => {
            let Symbol::Function(function) = binding.get()? else {
                return Err(type_error(format!("`{}` is not a function", name), position));
            };

            for (index, (argument, parameter)) in
                arguments.iter().zip(&function.parameters).enumerate()
            {
                let found = resolve_types_expr(resolver, argument)?;
                expect_compatible(
                    *parameter,
                    found,
                    &format!("argument {} of `{}`", index + 1, name),
                    &argument.span.start,
                )?;
            }

            function.result_type()
        }
        ExpressionKind::If { condition, body } => {
            let condition_type = resolve_types_expr(resolver, condition)?;
            expect_condition(condition_type, &condition.span.start)?;
            resolve_types_block(resolver, body)?;
            ValueType::Void
        }
        ExpressionKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            let condition_type = resolve_types_expr(resolver, condition)?;
            expect_condition(condition_type, &condition.span.start)?;
            resolve_types_block(resolver, then_body)?;
            resolve_types_block(resolver, else_body)?;
            ValueType::Void
        }
        ExpressionKind::While { condition, body } => {
            let condition_type = resolve_types_expr(resolver, condition)?;
            expect_condition(condition_type, &condition.span.start)?;
            resolve_types_block(resolver, body)?;
            ValueType::Void
        }
        ExpressionKind::For {
            iterator,
            condition,
            step,
            body,
        } => {
            resolve_types_declaration(resolver, iterator)?;
            let condition_type = resolve_types_expr(resolver, condition)?;
            expect_condition(condition_type, &condition.span.start)?;
            if let Some(step) = step {
                resolve_types_expr(resolver, step)?;
            }
            resolve_types_block(resolver, body)?;
            ValueType::Void
        }
        ExpressionKind::Return { value } => {
            let Some(expected) = resolver.expected_returns.last().copied() else {
                return Err(type_error(
                    String::from("`returnal` is only allowed inside a function"),
                    position,
                ));
            };

            let found = match value {
                Some(value) => resolve_types_expr(resolver, value)?,
                None => ValueType::Void,
            };
            expect_compatible(expected, found, "returnal", position)?;
            ValueType::Void
        }
        ExpressionKind::Break | ExpressionKind::Continue => ValueType::Void,
        ExpressionKind::Raid { binding, .. } => {
            variable_type(binding.get()?, position)?;
            ValueType::Void
        }
        ExpressionKind::Exodus { value } => {
            resolve_types_expr(resolver, value)?;
            ValueType::Void
        }
        ExpressionKind::VariableScope { variables, body } => {
            for variable in variables {
                resolve_types_declaration(resolver, variable)?;
            }
            resolve_types_expr(resolver, body)?
        }
    };

    expression.result_type.set(result_type)?;
    Ok(result_type)
}
