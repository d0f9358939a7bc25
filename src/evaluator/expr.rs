use std::cmp::Ordering;

use tracing::debug;

use crate::{
    ast::{
        expressions::{BinaryOperator, Expression, ExpressionKind, Literal, UnaryOperator},
        symbols::{FunctionSymbol, Symbol, VariableKind},
    },
    builtins::builtins::{call_builtin, is_builtin},
    errors::errors::{Error, ErrorImpl},
    runtime::{
        context::Scope,
        value::{numbers_equal, Value},
    },
};

use super::{
    evaluator::{escaped_signal, Evaluator, Flow},
    stmt::{eval_block, eval_statement, located},
};

/// Evaluates `expression`. On [`Flow::Normal`] its value is left on the
/// stack; an unwinding signal leaves the stack as it was.
pub fn eval_expr(evaluator: &mut Evaluator, expression: &Expression) -> Result<Flow, Error> {
    let height = evaluator.stack_len();
    let position = &expression.span.start;

    let value = match &expression.kind {
        ExpressionKind::Literal(literal) => match literal {
            Literal::Int(value) => Value::Int(*value),
            Literal::Double(value) => Value::Double(*value),
            Literal::String(value) => Value::String(value.clone()),
        },
        ExpressionKind::VariableRef { name, binding } => {
            let value = match binding.get()? {
                Symbol::Variable(variable) if variable.kind == VariableKind::Constant => evaluator
                    .context
                    .get_constant(variable.declaration, name),
                _ => evaluator.context.get_variable(name),
            };

            value.ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndefinedVariable {
                        variable: name.clone(),
                    },
                    position.clone(),
                )
            })?
        }
        ExpressionKind::Assignment { target, value, .. } => {
            let value = eval_operand(evaluator, value)?;
            evaluator
                .context
                .assign_variable(target, value)
                .map_err(located(position))?
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            // Both operands are always evaluated, `&&` and `||` included
            let left = eval_operand(evaluator, left)?;
            let right = eval_operand(evaluator, right)?;
            binary_operation(*operator, left, right).map_err(located(position))?
        }
        ExpressionKind::Unary { operator, operand } => {
            let operand = eval_operand(evaluator, operand)?;
            unary_operation(*operator, operand).map_err(located(position))?
        }
        ExpressionKind::FunctionCall {
            name, arguments, ..
        } => {
            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments {
                values.push(eval_operand(evaluator, argument)?);
            }
            call_function(evaluator, name, values, expression)?
        }
        _ => {
            let flow = eval_statement(evaluator, expression)?;
            evaluator.check_stack(height, &flow)?;
            return Ok(flow);
        }
    };

    evaluator.push_value(value);
    evaluator.check_stack(height, &Flow::Normal)?;
    Ok(Flow::Normal)
}

/// Evaluates an expression used as a value and takes that value off the
/// stack.
pub fn eval_operand(evaluator: &mut Evaluator, expression: &Expression) -> Result<Value, Error> {
    match eval_expr(evaluator, expression)? {
        Flow::Normal => evaluator.pop_value(),
        signal => Err(escaped_signal(&signal, &expression.span.start)),
    }
}

fn call_function(
    evaluator: &mut Evaluator,
    name: &str,
    arguments: Vec<Value>,
    call: &Expression,
) -> Result<Value, Error> {
    let position = &call.span.start;

    if is_builtin(name) {
        return call_builtin(name, &arguments).map_err(located(position));
    }

    let function = evaluator.context.get_function(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownFunction {
                function: name.to_string(),
            },
            position.clone(),
        )
    })?;
    let signature: &FunctionSymbol = function.signature.get()?;

    if arguments.len() != function.parameters.len() {
        return Err(Error::new(
            ErrorImpl::InvalidFunctionCall {
                function: name.to_string(),
                expected: function.parameters.len(),
                received: arguments.len(),
            },
            position.clone(),
        ));
    }

    let mut scope = Scope::new();
    for ((parameter, parameter_type), argument) in function
        .parameters
        .iter()
        .zip(&signature.parameters)
        .zip(arguments)
    {
        let argument = argument
            .coerce_to(*parameter_type)
            .map_err(located(position))?;
        scope.define(&parameter.name, argument);
    }

    debug!(function = name, "calling function");
    let flow = evaluator.with_frame(scope, |evaluator| eval_block(evaluator, &function.body))?;

    match (flow, signature.return_type) {
        (Flow::Return(value), Some(return_type)) => {
            value.coerce_to(return_type).map_err(located(position))
        }
        (Flow::Return(Value::Void), None) => Ok(Value::Void),
        (Flow::Return(value), None) => Err(Error::new(
            ErrorImpl::InvalidOperation {
                message: format!(
                    "`{}` declares no return type but returned {}",
                    name,
                    value.value_type()
                ),
            },
            position.clone(),
        )),
        // Falling off the end of the body
        (Flow::Normal, _) => Ok(Value::Void),
        (signal, _) => Err(escaped_signal(&signal, position)),
    }
}

fn unsupported(operator: &dyn std::fmt::Display, left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::InvalidOperation {
        message: format!(
            "operator `{}` cannot be applied to {} and {}",
            operator,
            left.value_type(),
            right.value_type()
        ),
    }
}

fn truth(value: bool) -> Value {
    Value::Int(value as i64)
}

/// Applies a binary operator. Mixed Int and Double operands are compared and
/// combined as Doubles.
pub fn binary_operation(
    operator: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, ErrorImpl> {
    match operator {
        BinaryOperator::And => return Ok(truth(left.is_truthy() && right.is_truthy())),
        BinaryOperator::Or => return Ok(truth(left.is_truthy() || right.is_truthy())),
        _ => {}
    }

    match (left, right) {
        (Value::Int(left), Value::Int(right)) => int_operation(operator, left, right),
        (Value::String(left), Value::String(right)) => string_operation(operator, left, right),
        (left @ (Value::Int(_) | Value::Double(_)), right @ (Value::Int(_) | Value::Double(_))) => {
            match (left.as_double(), right.as_double()) {
                (Some(l), Some(r)) => double_operation(operator, l, r),
                _ => Err(unsupported(&operator, &left, &right)),
            }
        }
        (left, right) => Err(unsupported(&operator, &left, &right)),
    }
}

fn int_operation(operator: BinaryOperator, left: i64, right: i64) -> Result<Value, ErrorImpl> {
    let value = match operator {
        BinaryOperator::Plus => Value::Int(left.wrapping_add(right)),
        BinaryOperator::Minus => Value::Int(left.wrapping_sub(right)),
        BinaryOperator::Multiply => Value::Int(left.wrapping_mul(right)),
        BinaryOperator::Divide | BinaryOperator::Modulo if right == 0 => {
            return Err(ErrorImpl::DivisionByZero)
        }
        BinaryOperator::Divide => Value::Int(left.wrapping_div(right)),
        BinaryOperator::Modulo => Value::Int(left.wrapping_rem(right)),
        BinaryOperator::Less => truth(left < right),
        BinaryOperator::LessEquals => truth(left <= right),
        BinaryOperator::Greater => truth(left > right),
        BinaryOperator::GreaterEquals => truth(left >= right),
        BinaryOperator::Equals => truth(left == right),
        BinaryOperator::NotEquals => truth(left != right),
        BinaryOperator::And | BinaryOperator::Or => {
            return Err(unsupported(&operator, &Value::Int(left), &Value::Int(right)))
        }
    };

    Ok(value)
}

/// Equality is within [`crate::runtime::value::NUMBER_TOLERANCE`]; the
/// ordering operators agree with it.
fn double_operation(operator: BinaryOperator, left: f64, right: f64) -> Result<Value, ErrorImpl> {
    let equal = numbers_equal(left, right);

    let value = match operator {
        BinaryOperator::Plus => Value::Double(left + right),
        BinaryOperator::Minus => Value::Double(left - right),
        BinaryOperator::Multiply => Value::Double(left * right),
        BinaryOperator::Divide => Value::Double(left / right),
        BinaryOperator::Modulo => Value::Double(left % right),
        BinaryOperator::Less => truth(left < right && !equal),
        BinaryOperator::LessEquals => truth(left < right || equal),
        BinaryOperator::Greater => truth(left > right && !equal),
        BinaryOperator::GreaterEquals => truth(left > right || equal),
        BinaryOperator::Equals => truth(equal),
        BinaryOperator::NotEquals => truth(!equal),
        BinaryOperator::And | BinaryOperator::Or => {
            return Err(unsupported(
                &operator,
                &Value::Double(left),
                &Value::Double(right),
            ))
        }
    };

    Ok(value)
}

fn string_operation(
    operator: BinaryOperator,
    left: String,
    right: String,
) -> Result<Value, ErrorImpl> {
    let ordering = left.cmp(&right);

    let value = match operator {
        BinaryOperator::Plus => Value::String(left + &right),
        BinaryOperator::Less => truth(ordering == Ordering::Less),
        BinaryOperator::LessEquals => truth(ordering != Ordering::Greater),
        BinaryOperator::Greater => truth(ordering == Ordering::Greater),
        BinaryOperator::GreaterEquals => truth(ordering != Ordering::Less),
        BinaryOperator::Equals => truth(ordering == Ordering::Equal),
        BinaryOperator::NotEquals => truth(ordering != Ordering::Equal),
        _ => {
            return Err(unsupported(
                &operator,
                &Value::String(left),
                &Value::String(right),
            ))
        }
    };

    Ok(value)
}

pub fn unary_operation(operator: UnaryOperator, operand: Value) -> Result<Value, ErrorImpl> {
    match (operator, operand) {
        (UnaryOperator::Not, operand) => Ok(truth(!operand.is_truthy())),
        (UnaryOperator::Minus, Value::Int(value)) => Ok(Value::Int(value.wrapping_neg())),
        (UnaryOperator::Minus, Value::Double(value)) => Ok(Value::Double(-value)),
        (UnaryOperator::Minus, operand) => Err(ErrorImpl::InvalidOperation {
            message: format!("operator `-` cannot be applied to {}", operand.value_type()),
        }),
    }
}
