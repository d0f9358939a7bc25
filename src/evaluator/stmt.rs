use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{
        ast::Node,
        declarations::{Declaration, DeclarationKind},
        expressions::{Expression, ExpressionKind},
        symbols::Symbol,
        types::ValueType,
    },
    errors::errors::{Error, ErrorImpl},
    runtime::{context::Scope, value::Value},
    Position,
};

use super::{
    evaluator::{Evaluator, Flow},
    expr::{eval_expr, eval_operand},
};

pub(crate) fn located(position: &Position) -> impl Fn(ErrorImpl) -> Error + '_ {
    move |error| Error::new(error, position.clone())
}

pub fn eval_node(evaluator: &mut Evaluator, node: &Node) -> Result<Flow, Error> {
    match node {
        Node::Declaration(declaration) => {
            let height = evaluator.stack_len();
            eval_declaration(evaluator, declaration)?;
            evaluator.push_value(Value::Void);
            evaluator.check_stack(height, &Flow::Normal)?;
            Ok(Flow::Normal)
        }
        Node::Expression(expression) => eval_expr(evaluator, expression),
    }
}

/// Runs a statement list, discarding the value of every statement. Stops at
/// the first unwinding signal and hands it to the caller.
pub fn eval_block(evaluator: &mut Evaluator, nodes: &[Node]) -> Result<Flow, Error> {
    for node in nodes {
        match eval_node(evaluator, node)? {
            Flow::Normal => {
                evaluator.pop_value()?;
            }
            signal => return Ok(signal),
        }
    }

    Ok(Flow::Normal)
}

fn declared_type(declaration: &Declaration) -> Result<ValueType, Error> {
    declaration.result_type.get().copied()
}

pub fn eval_declaration(evaluator: &mut Evaluator, declaration: &Declaration) -> Result<(), Error> {
    let position = &declaration.span.start;

    match &declaration.kind {
        DeclarationKind::Variable { initializer, .. } => {
            let value_type = declared_type(declaration)?;
            let value = match initializer {
                Some(initializer) => eval_operand(evaluator, initializer)?
                    .coerce_to(value_type)
                    .map_err(located(position))?,
                None => Value::zero(value_type),
            };

            evaluator.context.declare_variable(&declaration.name, value);
        }
        DeclarationKind::Parameter { .. } => {
            let value = Value::zero(declared_type(declaration)?);
            evaluator.context.declare_variable(&declaration.name, value);
        }
        DeclarationKind::Constant { value, .. } => {
            // Re-running a declaration keeps the value it was frozen with
            if evaluator
                .context
                .is_constant_defined(declaration.id, &declaration.name)
            {
                return Ok(());
            }

            let value = eval_operand(evaluator, value)?
                .coerce_to(declared_type(declaration)?)
                .map_err(located(position))?;
            evaluator
                .context
                .define_constant(declaration.id, &declaration.name, value)
                .map_err(located(position))?;
        }
        DeclarationKind::Function(function) => {
            trace!(name = declaration.name.as_str(), "registering function");
            evaluator
                .context
                .define_function(declaration.id, &declaration.name, Rc::clone(function))
                .map_err(located(position))?;
        }
    }

    Ok(())
}

/// Conditions are dayzint values; anything else got past the checker.
fn eval_condition(evaluator: &mut Evaluator, condition: &Expression) -> Result<bool, Error> {
    match eval_operand(evaluator, condition)? {
        value @ Value::Int(_) => Ok(value.is_truthy()),
        other => Err(Error::new(
            ErrorImpl::InvalidOperation {
                message: format!("condition must be dayzint, found {}", other.value_type()),
            },
            condition.span.start.clone(),
        )),
    }
}

/// Pushes `Void` for a statement that completed normally.
fn complete(evaluator: &mut Evaluator, flow: Flow) -> Flow {
    if flow == Flow::Normal {
        evaluator.push_value(Value::Void);
    }
    flow
}

pub fn eval_if(
    evaluator: &mut Evaluator,
    condition: &Expression,
    then_body: &[Node],
    else_body: Option<&[Node]>,
) -> Result<Flow, Error> {
    // Branches share the enclosing scope
    let flow = if eval_condition(evaluator, condition)? {
        eval_block(evaluator, then_body)?
    } else if let Some(else_body) = else_body {
        eval_block(evaluator, else_body)?
    } else {
        Flow::Normal
    };

    Ok(complete(evaluator, flow))
}

pub fn eval_while(
    evaluator: &mut Evaluator,
    condition: &Expression,
    body: &[Node],
) -> Result<Flow, Error> {
    while eval_condition(evaluator, condition)? {
        let flow = evaluator.with_scope(Scope::new(), |evaluator| eval_block(evaluator, body))?;

        match flow {
            Flow::Normal | Flow::Continue => {}
            Flow::Break => break,
            Flow::Return(value) => return Ok(Flow::Return(value)),
        }
    }

    Ok(complete(evaluator, Flow::Normal))
}

pub fn eval_for(
    evaluator: &mut Evaluator,
    iterator: &Declaration,
    condition: &Expression,
    step: Option<&Expression>,
    body: &[Node],
) -> Result<Flow, Error> {
    let flow = evaluator.with_scope(Scope::new(), |evaluator| {
        eval_declaration(evaluator, iterator)?;

        while eval_condition(evaluator, condition)? {
            let flow =
                evaluator.with_scope(Scope::new(), |evaluator| eval_block(evaluator, body))?;

            match flow {
                Flow::Normal | Flow::Continue => {}
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }

            if let Some(step) = step {
                eval_operand(evaluator, step)?;
            }
        }

        Ok(Flow::Normal)
    })?;

    Ok(complete(evaluator, flow))
}

pub fn eval_return(evaluator: &mut Evaluator, value: Option<&Expression>) -> Result<Flow, Error> {
    let value = match value {
        Some(value) => eval_operand(evaluator, value)?,
        None => Value::Void,
    };

    Ok(Flow::Return(value))
}

pub fn eval_raid(
    evaluator: &mut Evaluator,
    target: &str,
    binding: &Symbol,
    position: &Position,
) -> Result<Flow, Error> {
    let Symbol::Variable(variable) = binding else {
        return Err(Error::new(
            ErrorImpl::InvalidOperation {
                message: format!("cannot read input into {}", binding),
            },
            position.clone(),
        ));
    };

    let input = evaluator
        .environment()
        .read_input()
        .map_err(located(position))?;
    trace!(variable = target, input = %input, "read input");

    let value = input
        .coerce_for_input(variable.value_type)
        .map_err(located(position))?;
    evaluator
        .context
        .assign_variable(target, value)
        .map_err(located(position))?;

    Ok(complete(evaluator, Flow::Normal))
}

pub fn eval_exodus(evaluator: &mut Evaluator, value: &Expression) -> Result<Flow, Error> {
    let value = eval_operand(evaluator, value)?;
    evaluator.environment().add_result(value);

    Ok(complete(evaluator, Flow::Normal))
}

/// Evaluates `body` with `variables` declared in a scope of their own. The
/// value of `body` is the value of the whole expression.
pub fn eval_variable_scope(
    evaluator: &mut Evaluator,
    variables: &[Declaration],
    body: &Expression,
) -> Result<Flow, Error> {
    evaluator.with_scope(Scope::new(), |evaluator| {
        for variable in variables {
            eval_declaration(evaluator, variable)?;
        }
        eval_expr(evaluator, body)
    })
}

/// Dispatch for the statement forms of [`ExpressionKind`].
pub fn eval_statement(evaluator: &mut Evaluator, expression: &Expression) -> Result<Flow, Error> {
    let position = &expression.span.start;

    match &expression.kind {
        ExpressionKind::If { condition, body } => eval_if(evaluator, condition, body, None),
        ExpressionKind::IfElse {
            condition,
            then_body,
            else_body,
        } => eval_if(evaluator, condition, then_body, Some(else_body.as_slice())),
        ExpressionKind::While { condition, body } => eval_while(evaluator, condition, body),
        ExpressionKind::For {
            iterator,
            condition,
            step,
            body,
        } => eval_for(evaluator, iterator, condition, step.as_deref(), body),
        ExpressionKind::Return { value } => eval_return(evaluator, value.as_deref()),
        ExpressionKind::Break => Ok(Flow::Break),
        ExpressionKind::Continue => Ok(Flow::Continue),
        ExpressionKind::Raid { target, binding } => {
            eval_raid(evaluator, target, binding.get()?, position)
        }
        ExpressionKind::Exodus { value } => eval_exodus(evaluator, value),
        ExpressionKind::VariableScope { variables, body } => {
            eval_variable_scope(evaluator, variables, body)
        }
        _ => Err(Error::new(
            ErrorImpl::InvalidExpression {
                message: String::from("expected a statement"),
            },
            position.clone(),
        )),
    }
}
