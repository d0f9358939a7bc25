use std::fmt::Display;

use crate::{ast::types::ValueType, errors::errors::ErrorImpl};

/// Two numbers closer than this compare equal, and a number closer than this
/// to zero is false.
pub const NUMBER_TOLERANCE: f64 = 0.001;

pub fn numbers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < NUMBER_TOLERANCE
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
    Void,
}

impl Value {
    /// Value a variable of type `value_type` holds before its first assignment.
    pub fn zero(value_type: ValueType) -> Value {
        match value_type {
            ValueType::Int => Value::Int(0),
            ValueType::Double => Value::Double(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Void => Value::Void,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Void => ValueType::Void,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(value) => *value != 0,
            Value::Double(value) => !numbers_equal(*value, 0.0),
            Value::String(value) => !value.is_empty(),
            Value::Void => false,
        }
    }

    /// Converts between Int and Double; any other pair of distinct types is
    /// an error. Double to Int truncates toward zero.
    pub fn coerce_to(self, target: ValueType) -> Result<Value, ErrorImpl> {
        match (self, target) {
            (value, target) if value.value_type() == target => Ok(value),
            (Value::Int(value), ValueType::Double) => Ok(Value::Double(value as f64)),
            (Value::Double(value), ValueType::Int) => Ok(Value::Int(value as i64)),
            (value, target) => Err(ErrorImpl::InvalidOperation {
                message: format!("cannot convert {} to {}", value.value_type(), target),
            }),
        }
    }

    /// Conversion applied to values read from the environment. On top of the
    /// numeric conversions, numbers become their decimal text and text is
    /// parsed as a number.
    pub fn coerce_for_input(self, target: ValueType) -> Result<Value, ErrorImpl> {
        match (self, target) {
            (Value::Int(value), ValueType::String) => Ok(Value::String(value.to_string())),
            (Value::Double(value), ValueType::String) => Ok(Value::String(value.to_string())),
            (Value::String(text), ValueType::Int) => {
                let text = text.trim();
                text.parse::<i64>()
                    .map(Value::Int)
                    .or_else(|_| text.parse::<f64>().map(|value| Value::Int(value as i64)))
                    .map_err(|_| ErrorImpl::InvalidOperation {
                        message: format!("`{}` is not a dayzint", text),
                    })
            }
            (Value::String(text), ValueType::Double) => text
                .trim()
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| ErrorImpl::InvalidOperation {
                    message: format!("`{}` is not a fallout", text.trim()),
                }),
            (value, target) => value.coerce_to(target),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Void => write!(f, "void"),
        }
    }
}
