use std::{collections::HashMap, rc::Rc};

use lazy_static::lazy_static;

use crate::{
    ast::{symbols::FunctionSymbol, types::ValueType},
    errors::errors::ErrorImpl,
    runtime::value::Value,
};

pub type BuiltinHandler = fn(&[Value]) -> Result<Value, ErrorImpl>;

pub struct BuiltinFunction {
    pub name: &'static str,
    pub parameters: &'static [ValueType],
    pub return_type: ValueType,
    pub handler: BuiltinHandler,
}

impl BuiltinFunction {
    pub fn signature(&self) -> FunctionSymbol {
        FunctionSymbol {
            name: self.name.to_string(),
            parameters: self.parameters.to_vec(),
            return_type: Some(self.return_type),
            builtin: true,
        }
    }
}

/// Surface spellings of the value types.
pub const BUILTIN_TYPES: [(&str, ValueType); 3] = [
    ("dayzint", ValueType::Int),
    ("fallout", ValueType::Double),
    ("strike", ValueType::String),
];

lazy_static! {
    static ref BUILTIN_FUNCTIONS: HashMap<&'static str, BuiltinFunction> = {
        let mut map = HashMap::new();
        let functions = [
            BuiltinFunction { name: "floor", parameters: &[ValueType::Double], return_type: ValueType::Double, handler: floor },
            BuiltinFunction { name: "ceil", parameters: &[ValueType::Double], return_type: ValueType::Double, handler: ceil },
            BuiltinFunction { name: "round", parameters: &[ValueType::Double], return_type: ValueType::Double, handler: round },
            BuiltinFunction { name: "length", parameters: &[ValueType::String], return_type: ValueType::Int, handler: length },
            BuiltinFunction { name: "str_at", parameters: &[ValueType::String, ValueType::Int], return_type: ValueType::String, handler: str_at },
            BuiltinFunction { name: "abs", parameters: &[ValueType::Double], return_type: ValueType::Double, handler: abs },
            BuiltinFunction { name: "max", parameters: &[ValueType::Double, ValueType::Double], return_type: ValueType::Double, handler: max },
            BuiltinFunction { name: "min", parameters: &[ValueType::Double, ValueType::Double], return_type: ValueType::Double, handler: min },
        ];
        for function in functions {
            map.insert(function.name, function);
        }
        map
    };
}

/// Looks up a builtin function, ignoring case.
pub fn get_builtin(name: &str) -> Option<&'static BuiltinFunction> {
    BUILTIN_FUNCTIONS.get(name.to_lowercase().as_str())
}

pub fn is_builtin(name: &str) -> bool {
    get_builtin(name).is_some()
}

/// Signatures of every builtin function, in name order.
pub fn builtin_signatures() -> Vec<Rc<FunctionSymbol>> {
    let mut signatures: Vec<Rc<FunctionSymbol>> = BUILTIN_FUNCTIONS
        .values()
        .map(|function| Rc::new(function.signature()))
        .collect();
    signatures.sort_by(|a, b| a.name.cmp(&b.name));
    signatures
}

/// Calls a builtin by name.
pub fn call_builtin(name: &str, arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let function = get_builtin(name).ok_or_else(|| ErrorImpl::UnknownFunction {
        function: name.to_string(),
    })?;

    (function.handler)(arguments)
}

fn invalid_arguments(function: &str, arguments: &[Value]) -> ErrorImpl {
    let types: Vec<String> = arguments
        .iter()
        .map(|argument| argument.value_type().to_string())
        .collect();

    ErrorImpl::InvalidOperation {
        message: format!("{} cannot be applied to ({})", function, types.join(", ")),
    }
}

fn single_number(function: &str, arguments: &[Value]) -> Result<f64, ErrorImpl> {
    match arguments {
        [argument] => argument
            .as_double()
            .ok_or_else(|| invalid_arguments(function, arguments)),
        _ => Err(invalid_arguments(function, arguments)),
    }
}

fn floor(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    Ok(Value::Double(single_number("floor", arguments)?.floor()))
}

fn ceil(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    Ok(Value::Double(single_number("ceil", arguments)?.ceil()))
}

// Midpoints round to even
fn round(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    Ok(Value::Double(single_number("round", arguments)?.round_ties_even()))
}

fn length(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    match arguments {
        [Value::String(text)] => Ok(Value::Int(text.chars().count() as i64)),
        _ => Err(invalid_arguments("length", arguments)),
    }
}

fn str_at(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    let (text, index) = match arguments {
        [Value::String(text), Value::Int(index)] => (text, *index),
        [Value::String(text), Value::Double(index)] => (text, *index as i64),
        _ => return Err(invalid_arguments("str_at", arguments)),
    };

    let length = text.chars().count();
    let character = usize::try_from(index)
        .ok()
        .and_then(|index| text.chars().nth(index))
        .ok_or(ErrorImpl::IndexOutOfRange { index, length })?;

    Ok(Value::String(character.to_string()))
}

fn abs(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    match arguments {
        [Value::Int(value)] => Ok(Value::Int(value.wrapping_abs())),
        [Value::Double(value)] => Ok(Value::Double(value.abs())),
        _ => Err(invalid_arguments("abs", arguments)),
    }
}

/// Picks the extreme argument by `prefer_first`. All-Int arguments give an
/// Int, anything else a Double.
fn extreme(
    function: &str,
    arguments: &[Value],
    prefer_first: fn(f64, f64) -> bool,
) -> Result<Value, ErrorImpl> {
    if arguments.is_empty() {
        return Err(invalid_arguments(function, arguments));
    }

    let mut best = &arguments[0];
    for argument in arguments {
        let (Some(candidate), Some(current)) = (argument.as_double(), best.as_double()) else {
            return Err(invalid_arguments(function, arguments));
        };
        if prefer_first(candidate, current) {
            best = argument;
        }
    }

    if arguments.iter().all(|argument| matches!(argument, Value::Int(_))) {
        Ok(best.clone())
    } else {
        best.clone().coerce_to(ValueType::Double)
    }
}

fn max(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    extreme("max", arguments, |candidate, current| candidate > current)
}

fn min(arguments: &[Value]) -> Result<Value, ErrorImpl> {
    extreme("min", arguments, |candidate, current| candidate < current)
}
