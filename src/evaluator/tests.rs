use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    evaluator::Evaluator,
    expr::{binary_operation, unary_operation},
};
use crate::{
    ast::{
        ast::Node,
        declarations::Declaration,
        expressions::{BinaryOperator, Expression, UnaryOperator},
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    runtime::{environment::FakeEnvironment, value::Value},
    semantics::checker::check,
};

fn run(source: &str, inputs: Vec<Value>) -> Result<Vec<Value>, Error> {
    let tokens = tokenize(source.to_string(), None)?;
    let (_, nodes) = parse(tokens, Rc::new("shell".to_string()));
    let nodes = nodes?;
    check(&nodes)?;

    let mut environment = FakeEnvironment::new(inputs);
    Evaluator::new(&mut environment).evaluate_program(&nodes)?;
    Ok(environment.into_results())
}

fn outputs(source: &str) -> Vec<Value> {
    run(source, vec![]).unwrap()
}

fn run_error(source: &str) -> ErrorImpl {
    run(source, vec![]).unwrap_err().get_impl().clone()
}

#[test]
fn test_int_arithmetic() {
    use BinaryOperator::*;

    assert_eq!(binary_operation(Plus, Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(binary_operation(Divide, Value::Int(7), Value::Int(2)), Ok(Value::Int(3)));
    assert_eq!(binary_operation(Modulo, Value::Int(-7), Value::Int(3)), Ok(Value::Int(-1)));
    assert_eq!(
        binary_operation(Plus, Value::Int(i64::MAX), Value::Int(1)),
        Ok(Value::Int(i64::MIN))
    );
    assert_eq!(
        binary_operation(Divide, Value::Int(1), Value::Int(0)),
        Err(ErrorImpl::DivisionByZero)
    );
    assert_eq!(
        binary_operation(Modulo, Value::Int(1), Value::Int(0)),
        Err(ErrorImpl::DivisionByZero)
    );
}

#[test]
fn test_mixed_operands_promote_to_double() {
    use BinaryOperator::*;

    assert_eq!(binary_operation(Plus, Value::Int(1), Value::Double(0.5)), Ok(Value::Double(1.5)));
    assert_eq!(binary_operation(Divide, Value::Int(1), Value::Double(0.0)), Ok(Value::Double(f64::INFINITY)));
    assert_eq!(binary_operation(Equals, Value::Int(1), Value::Double(1.0005)), Ok(Value::Int(1)));
    assert_eq!(binary_operation(Less, Value::Double(1.0), Value::Double(1.0005)), Ok(Value::Int(0)));
    assert_eq!(binary_operation(LessEquals, Value::Double(1.0005), Value::Double(1.0)), Ok(Value::Int(1)));
}

#[test]
fn test_string_operations() {
    use BinaryOperator::*;
    let text = |value: &str| Value::String(value.to_string());

    assert_eq!(binary_operation(Plus, text("ab"), text("cd")), Ok(text("abcd")));
    assert_eq!(binary_operation(Less, text("apple"), text("banana")), Ok(Value::Int(1)));
    assert_eq!(binary_operation(Equals, text("x"), text("x")), Ok(Value::Int(1)));
    assert_eq!(binary_operation(NotEquals, text("x"), text("y")), Ok(Value::Int(1)));
    assert!(binary_operation(Minus, text("a"), text("b")).is_err());
    assert!(binary_operation(Plus, text("a"), Value::Int(1)).is_err());
}

#[test]
fn test_logical_operators_use_truthiness() {
    use BinaryOperator::*;

    assert_eq!(
        binary_operation(And, Value::String("x".to_string()), Value::Double(2.0)),
        Ok(Value::Int(1))
    );
    assert_eq!(binary_operation(And, Value::Int(1), Value::Int(0)), Ok(Value::Int(0)));
    assert_eq!(binary_operation(Or, Value::Int(0), Value::Double(0.0001)), Ok(Value::Int(0)));
}

#[test]
fn test_unary_operations() {
    assert_eq!(unary_operation(UnaryOperator::Minus, Value::Int(4)), Ok(Value::Int(-4)));
    assert_eq!(unary_operation(UnaryOperator::Minus, Value::Double(0.5)), Ok(Value::Double(-0.5)));
    assert_eq!(unary_operation(UnaryOperator::Not, Value::Int(0)), Ok(Value::Int(1)));
    assert_eq!(unary_operation(UnaryOperator::Not, Value::String("a".to_string())), Ok(Value::Int(0)));
    assert!(unary_operation(UnaryOperator::Minus, Value::String("a".to_string())).is_err());
}

#[test]
fn test_exodus_and_declarations() {
    assert_eq!(
        outputs("dayzint a; fallout b; strike c; exodus(a); exodus(b); exodus(c);"),
        vec![Value::Int(0), Value::Double(0.0), Value::String(String::new())]
    );
    assert_eq!(outputs("dayzint a = 2.9; exodus(a);"), vec![Value::Int(2)]);
    assert_eq!(outputs("fallout a = 2; exodus(a / 4);"), vec![Value::Double(0.5)]);
}

#[test]
fn test_assignment_keeps_declared_type() {
    assert_eq!(
        outputs("dayzint a; a = 7.8; exodus(a); fallout b; b = a; exodus(b);"),
        vec![Value::Int(7), Value::Double(7.0)]
    );
}

#[test]
fn test_raid_coerces_input() {
    let results = run(
        "strike s; fallout d; dayzint i; raid(s); raid(d); raid(i); exodus(s); exodus(d); exodus(i);",
        vec![Value::Int(5), Value::Int(2), Value::String("9".to_string())],
    )
    .unwrap();

    assert_eq!(
        results,
        vec![Value::String("5".to_string()), Value::Double(2.0), Value::Int(9)]
    );
}

#[test]
fn test_raid_without_input() {
    assert_eq!(run_error("dayzint a; raid(a);"), ErrorImpl::MissingInput);
}

#[test]
fn test_if_shares_enclosing_scope() {
    assert_eq!(
        outputs("iffy (1) { dayzint inner = 4; } exodus(inner);"),
        vec![Value::Int(4)]
    );
}

#[test]
fn test_if_else_chain() {
    let source = "
        dayzint x = 5;
        iffy (x < 3) { exodus(\"small\"); }
        elysian iffy (x < 10) { exodus(\"medium\"); }
        elysian { exodus(\"large\"); }
    ";
    assert_eq!(outputs(source), vec![Value::String("medium".to_string())]);
}

#[test]
fn test_while_body_gets_fresh_scope() {
    let source = "
        dayzint i = 0;
        valorant (i < 3) { dayzint square = i * i; exodus(square); i = i + 1; }
    ";
    assert_eq!(outputs(source), vec![Value::Int(0), Value::Int(1), Value::Int(4)]);

    assert_eq!(
        run_error("dayzint i = 0; valorant (i < 1) { dayzint t = 1; i = i + 1; } exodus(t);"),
        ErrorImpl::UndefinedVariable {
            variable: "t".to_string()
        }
    );
}

#[test]
fn test_for_with_continue() {
    let source = "
        forza (dayzint i = 0; i < 6; i = i + 1) {
            iffy (i % 2 == 0) { contra; }
            exodus(i);
        }
    ";
    assert_eq!(outputs(source), vec![Value::Int(1), Value::Int(3), Value::Int(5)]);
}

#[test]
fn test_nested_break_only_leaves_inner_loop() {
    let source = "
        forza (dayzint i = 0; i < 2; i = i + 1) {
            forza (dayzint j = 0; j < 5; j = j + 1) {
                iffy (j == 1) { breakout; }
                exodus(i * 10 + j);
            }
        }
    ";
    assert_eq!(outputs(source), vec![Value::Int(0), Value::Int(10)]);
}

#[test]
fn test_for_without_step() {
    let source = "forza (dayzint i = 0; i < 3;) { exodus(i); i = i + 1; }";
    assert_eq!(outputs(source), vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_function_calls() {
    let source = "
        funkotron add(dayzint a, fallout b): fallout { returnal a + b; }
        funkotron greet(strike name) { exodus(\"hi \" + name); returnal; }
        exodus(add(1, 2));
        greet(\"mia\");
    ";
    assert_eq!(
        outputs(source),
        vec![Value::Double(3.0), Value::String("hi mia".to_string())]
    );
}

#[test]
fn test_return_is_coerced_to_declared_type() {
    let source = "funkotron half(dayzint n): dayzint { returnal n / 2.0; } exodus(half(7));";
    assert_eq!(outputs(source), vec![Value::Int(3)]);
}

#[test]
fn test_return_from_inside_loop() {
    let source = "
        funkotron first_multiple(dayzint n): dayzint {
            forza (dayzint i = 1; i < 100; i = i + 1) {
                iffy (i % n == 0) { returnal i; }
            }
            returnal -1;
        }
        exodus(first_multiple(7));
    ";
    assert_eq!(outputs(source), vec![Value::Int(7)]);
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let source = "
        dayzint x = 1;
        funkotron peek(): dayzint { returnal x; }
        funkotron shadow(): dayzint { dayzint x = 5; returnal peek(); }
        exodus(shadow());
    ";
    assert_eq!(outputs(source), vec![Value::Int(1)]);
}

#[test]
fn test_function_modifies_global() {
    let source = "
        dayzint counter = 0;
        funkotron bump() { counter = counter + 1; }
        bump(); bump();
        exodus(counter);
    ";
    assert_eq!(outputs(source), vec![Value::Int(2)]);
}

#[test]
fn test_builtins_dispatch_ignoring_case() {
    assert_eq!(
        outputs("exodus(ABS(-3)); exodus(Max(2, 9)); exodus(round(2.5)); exodus(str_at(\"hey\", 1));"),
        vec![
            Value::Int(3),
            Value::Int(9),
            Value::Double(2.0),
            Value::String("e".to_string())
        ]
    );
}

#[test]
fn test_runtime_faults() {
    assert_eq!(run_error("dayzint z = 0; exodus(1 / z);"), ErrorImpl::DivisionByZero);
    assert_eq!(
        run_error("exodus(str_at(\"abc\", 5));"),
        ErrorImpl::IndexOutOfRange {
            index: 5,
            length: 3
        }
    );
    assert_eq!(outputs("fallout z = 0; exodus(1 / z);"), vec![Value::Double(f64::INFINITY)]);
}

#[test]
fn test_constants_are_frozen_per_declaration() {
    let source = "
        funkotron area(fallout r): fallout {
            monument fallout PI = 3.14;
            returnal PI * r * r;
        }
        exodus(area(1));
        exodus(area(2));
    ";
    assert_eq!(outputs(source), vec![Value::Double(3.14), Value::Double(12.56)]);
}

#[test]
fn test_constant_redefinition_at_runtime() {
    // Two constants with the same name in different scopes are fine for the
    // checker, but constants share one global table at runtime
    let source = "
        monument dayzint LIMIT = 1;
        funkotron f() { monument dayzint LIMIT = 2; }
        f();
    ";
    assert_eq!(
        run_error(source),
        ErrorImpl::ConstantRedefinition {
            constant: "LIMIT".to_string()
        }
    );
}

#[test]
fn test_local_constant_shadows_global_variable() {
    let source = "
        dayzint x = 1;
        funkotron f(): dayzint { monument dayzint x = 5; returnal x; }
        exodus(f());
        exodus(x);
    ";
    assert_eq!(outputs(source), vec![Value::Int(5), Value::Int(1)]);
}

#[test]
fn test_constant_in_loop_body_shadows_variable() {
    let source = "
        dayzint k = 7;
        forza (dayzint i = 0; i < 2; i = i + 1) { monument dayzint k = 3; exodus(k); }
        exodus(k);
    ";
    assert_eq!(
        outputs(source),
        vec![Value::Int(3), Value::Int(3), Value::Int(7)]
    );
}

#[test]
fn test_unchecked_program_reports_missing_attribute() {
    let tokens = tokenize("exodus(x);".to_string(), None).unwrap();
    let (_, nodes) = parse(tokens, Rc::new("shell".to_string()));
    let nodes = nodes.unwrap();

    let mut environment = FakeEnvironment::new(vec![]);
    let mut evaluator = Evaluator::new(&mut environment);
    let error = evaluator.evaluate_program(&nodes).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Internal);
    assert_eq!(error.get_error_name(), "AttributeNotSet");
    assert_eq!(evaluator.stack_len(), 0);
}

#[test]
fn test_variable_scope_expression() {
    let program: Vec<Node> = vec![
        Expression::exodus(Expression::scope(
            vec![Declaration::variable("t", "dayzint", Some(Expression::int(20)))],
            Expression::binary(BinaryOperator::Plus, Expression::variable("t"), Expression::int(1)),
        ))
        .into(),
    ];
    check(&program).unwrap();

    let mut environment = FakeEnvironment::new(vec![]);
    let mut evaluator = Evaluator::new(&mut environment);
    evaluator.evaluate_program(&program).unwrap();

    assert_eq!(evaluator.context.get_variable("t"), None);
    assert_eq!(evaluator.stack_len(), 0);
    drop(evaluator);
    assert_eq!(environment.results(), &[Value::Int(21)]);
}

#[test]
fn test_error_unwinds_scopes() {
    let tokens =
        tokenize("funkotron f(dayzint d): dayzint { returnal 1 / d; } exodus(f(0));".to_string(), None)
            .unwrap();
    let (_, nodes) = parse(tokens, Rc::new("shell".to_string()));
    let nodes = nodes.unwrap();
    check(&nodes).unwrap();

    let mut environment = FakeEnvironment::new(vec![]);
    let mut evaluator = Evaluator::new(&mut environment);

    assert!(evaluator.evaluate_program(&nodes).is_err());
    assert_eq!(evaluator.context.depth(), 1);
    assert_eq!(evaluator.stack_len(), 0);
}
