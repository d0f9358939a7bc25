use std::{io::Cursor, rc::Rc};

use pretty_assertions::assert_eq;

use super::{
    context::{Context, Scope},
    environment::{parse_input, ConsoleEnvironment, Environment, FakeEnvironment},
    value::{numbers_equal, Value},
};
use crate::{
    ast::{ast::DeclId, declarations::DeclarationKind, declarations::Declaration, types::ValueType},
    errors::errors::ErrorImpl,
};

#[test]
fn test_zero_values() {
    assert_eq!(Value::zero(ValueType::Int), Value::Int(0));
    assert_eq!(Value::zero(ValueType::Double), Value::Double(0.0));
    assert_eq!(Value::zero(ValueType::String), Value::String(String::new()));
    assert_eq!(Value::zero(ValueType::Void), Value::Void);
}

#[test]
fn test_tolerance_equality() {
    assert!(numbers_equal(0.1 + 0.2, 0.3));
    assert!(numbers_equal(1.0, 1.0009));
    assert!(!numbers_equal(1.0, 1.002));
}

#[test]
fn test_truthiness() {
    assert!(Value::Int(2).is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::Double(0.0005).is_truthy());
    assert!(Value::Double(-0.5).is_truthy());
    assert!(Value::String("x".to_string()).is_truthy());
    assert!(!Value::String(String::new()).is_truthy());
    assert!(!Value::Void.is_truthy());
}

#[test]
fn test_numeric_coercion() {
    assert_eq!(Value::Int(3).coerce_to(ValueType::Double), Ok(Value::Double(3.0)));
    assert_eq!(Value::Double(3.9).coerce_to(ValueType::Int), Ok(Value::Int(3)));
    assert_eq!(Value::Double(-3.9).coerce_to(ValueType::Int), Ok(Value::Int(-3)));
    assert!(Value::String("3".to_string()).coerce_to(ValueType::Int).is_err());
    assert!(Value::Int(3).coerce_to(ValueType::String).is_err());
}

#[test]
fn test_input_coercion() {
    assert_eq!(
        Value::Int(42).coerce_for_input(ValueType::String),
        Ok(Value::String("42".to_string()))
    );
    assert_eq!(
        Value::String("2.5".to_string()).coerce_for_input(ValueType::Double),
        Ok(Value::Double(2.5))
    );
    assert_eq!(
        Value::String(" 7 ".to_string()).coerce_for_input(ValueType::Int),
        Ok(Value::Int(7))
    );
    assert!(Value::String("seven".to_string())
        .coerce_for_input(ValueType::Int)
        .is_err());
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Int(30).to_string(), "30");
    assert_eq!(Value::Double(314.0).to_string(), "314");
    assert_eq!(Value::Double(3.14).to_string(), "3.14");
    assert_eq!(Value::String("hi".to_string()).to_string(), "hi");
}

#[test]
fn test_scope_assignment_keeps_type() {
    let mut scope = Scope::new();
    scope.define("x", Value::Int(1));

    assert_eq!(scope.try_assign("x", Value::Double(2.7)), Ok(Some(Value::Int(2))));
    assert_eq!(scope.get("x"), Some(&Value::Int(2)));
    assert_eq!(scope.try_assign("y", Value::Int(1)), Ok(None));
}

#[test]
fn test_inner_scope_shadows_outer() {
    let mut context = Context::new();
    context.declare_variable("x", Value::Int(1));
    context.push_scope(Scope::new());
    context.declare_variable("x", Value::Int(2));

    assert_eq!(context.get_variable("x"), Some(Value::Int(2)));
    assert_eq!(context.assign_variable("x", Value::Int(5)), Ok(Value::Int(5)));

    context.pop_scope().unwrap();
    assert_eq!(context.get_variable("x"), Some(Value::Int(1)));
}

#[test]
fn test_global_scope_cannot_be_popped() {
    let mut context = Context::new();
    let error = context.pop_scope().unwrap_err();
    assert_eq!(error.get_error_name(), "GlobalScopePopped");
}

#[test]
fn test_frames_hide_caller_locals() {
    let mut context = Context::new();
    context.declare_variable("global", Value::Int(1));
    context.push_scope(Scope::new());
    context.declare_variable("local", Value::Int(2));

    context.push_frame(Scope::new());
    assert_eq!(context.get_variable("global"), Some(Value::Int(1)));
    assert_eq!(context.get_variable("local"), None);
    assert_eq!(
        context.assign_variable("local", Value::Int(3)),
        Err(ErrorImpl::UndefinedVariable {
            variable: "local".to_string()
        })
    );

    context.pop_frame().unwrap();
    assert_eq!(context.get_variable("local"), Some(Value::Int(2)));
    assert_eq!(context.depth(), 2);
}

#[test]
fn test_unwind_restores_depth() {
    let mut context = Context::new();
    context.push_frame(Scope::new());
    context.push_scope(Scope::new());
    context.unwind_to(1);

    assert_eq!(context.depth(), 1);
    assert!(context.pop_frame().is_err());
}

#[test]
fn test_constants() {
    let mut context = Context::new();
    let first = DeclId::fresh();
    let second = DeclId::fresh();

    context.define_constant(first, "PI", Value::Double(3.14)).unwrap();
    assert!(context.is_constant_defined(first, "PI"));
    // Same declaration evaluated again
    assert!(context.define_constant(first, "PI", Value::Double(1.0)).is_ok());
    assert_eq!(context.get_constant(first, "PI"), Some(Value::Double(3.14)));
    assert_eq!(context.get_constant(second, "PI"), None);
    assert_eq!(context.get_variable("PI"), None);

    assert_eq!(
        context.define_constant(second, "PI", Value::Double(3.0)),
        Err(ErrorImpl::ConstantRedefinition {
            constant: "PI".to_string()
        })
    );
}

#[test]
fn test_function_table() {
    let mut context = Context::new();
    let declaration = Declaration::function("f", &[], None, vec![]);
    let DeclarationKind::Function(function) = &declaration.kind else {
        panic!("expected function");
    };

    context
        .define_function(declaration.id, "f", Rc::clone(function))
        .unwrap();
    assert!(context.get_function("f").is_some());
    assert!(context.get_function("g").is_none());
    assert!(context
        .define_function(DeclId::fresh(), "f", Rc::clone(function))
        .is_err());
}

#[test]
fn test_parse_input() {
    assert_eq!(parse_input("10\n"), Value::Int(10));
    assert_eq!(parse_input("2.5\n"), Value::String("2.5".to_string()));
    assert_eq!(parse_input("hello\r\n"), Value::String("hello".to_string()));
}

#[test]
fn test_fake_environment() {
    let mut environment = FakeEnvironment::new(vec![Value::Int(1)]);

    assert_eq!(environment.read_input(), Ok(Value::Int(1)));
    assert_eq!(environment.read_input(), Err(ErrorImpl::MissingInput));

    environment.add_result(Value::String("done".to_string()));
    assert_eq!(environment.results(), &[Value::String("done".to_string())]);
}

#[test]
fn test_console_environment() {
    let input = Cursor::new("48\nabc\n");
    let mut environment = ConsoleEnvironment::new(input, Vec::new());

    assert_eq!(environment.read_input(), Ok(Value::Int(48)));
    assert_eq!(environment.read_input(), Ok(Value::String("abc".to_string())));
    assert_eq!(environment.read_input(), Err(ErrorImpl::MissingInput));

    environment.add_result(Value::Int(6));
    environment.add_result(Value::Double(2.5));
    assert_eq!(String::from_utf8(environment.into_writer()).unwrap(), "6\n2.5\n");
}
