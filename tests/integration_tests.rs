//! End-to-end tests: whole programs run through the interpreter against a
//! scripted environment.

use std::io::Cursor;

use mystic::{
    errors::errors::{Error, ErrorKind},
    format_error,
    interpreter::interpreter::Interpreter,
    runtime::{
        environment::{ConsoleEnvironment, FakeEnvironment},
        value::Value,
    },
};
use pretty_assertions::assert_eq;

fn run(source: &str, inputs: Vec<Value>) -> Result<Vec<Value>, Error> {
    let mut environment = FakeEnvironment::new(inputs);
    Interpreter::new("test.mys").run(source, &mut environment)?;
    Ok(environment.into_results())
}

fn error_name(source: &str) -> String {
    run(source, vec![]).unwrap_err().get_error_name().to_string()
}

#[test]
fn test_sum_of_two_inputs() {
    let source = "dayzint a; dayzint b; raid(a); raid(b); exodus(a+b);";
    let results = run(source, vec![Value::Int(10), Value::Int(20)]).unwrap();

    assert_eq!(results, vec![Value::Int(30)]);
}

#[test]
fn test_circle_area_with_constant() {
    let source = "
        monument fallout PI = 3.14;
        maincraft() {
            dayzint radius;
            raid(radius);
            exodus(PI * radius * radius);
        }
    ";
    let results = run(source, vec![Value::Int(10)]).unwrap();

    assert_eq!(results.len(), 1);
    let Value::Double(area) = results[0] else {
        panic!("expected a fallout, got {:?}", results[0]);
    };
    assert!((area - 314.0).abs() < 1e-9);
}

#[test]
fn test_iterative_gcd() {
    let source = "
        dayzint a;
        dayzint b;
        raid(a);
        raid(b);
        valorant (b != 0) {
            dayzint t = b;
            b = a % b;
            a = t;
        }
        exodus(a);
    ";
    let results = run(source, vec![Value::Int(48), Value::Int(18)]).unwrap();

    assert_eq!(results, vec![Value::Int(6)]);
}

#[test]
fn test_for_loop_with_break() {
    let source = "forza (dayzint i=1;i<=5;i=i+1){ iffy(i==3){ breakout; } exodus(i); }";

    assert_eq!(run(source, vec![]).unwrap(), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_recursive_function() {
    let source = "
        funkotron fib(dayzint n): dayzint {
            iffy (n < 2) { returnal n; }
            returnal fib(n - 1) + fib(n - 2);
        }
        maincraft() {
            forza (dayzint i = 0; i < 8; i = i + 1) { exodus(fib(i)); }
        }
    ";
    let expected: Vec<Value> = [0, 1, 1, 2, 3, 5, 8, 13].into_iter().map(Value::Int).collect();

    assert_eq!(run(source, vec![]).unwrap(), expected);
}

#[test]
fn test_tolerant_equality() {
    assert_eq!(run("exodus(0.1 + 0.2 == 0.3);", vec![]).unwrap(), vec![Value::Int(1)]);
    assert_eq!(run("exodus(0.1 + 0.2 != 0.3);", vec![]).unwrap(), vec![Value::Int(0)]);
}

#[test]
fn test_pure_int_program_stays_int() {
    let source = "dayzint a = 7; dayzint b = 2; exodus(a / b); exodus(a % b); exodus(-a * b);";

    assert_eq!(
        run(source, vec![]).unwrap(),
        vec![Value::Int(3), Value::Int(1), Value::Int(-14)]
    );
}

#[test]
fn test_string_builtins() {
    let source = "
        strike word = 'mystic';
        exodus(length(word));
        exodus(length(\"\"));
        exodus(str_at(word, 0) + str_at(word, length(word) - 1));
    ";

    assert_eq!(
        run(source, vec![]).unwrap(),
        vec![Value::Int(6), Value::Int(0), Value::String("mc".to_string())]
    );
}

#[test]
fn test_str_at_out_of_bounds() {
    let error = run("exodus(str_at(\"abc\", 3));", vec![]).unwrap_err();

    assert_eq!(error.get_error_name(), "IndexOutOfRange");
    assert_eq!(error.kind(), ErrorKind::Runtime);
}

#[test]
fn test_semantic_violations() {
    assert_eq!(error_name("dayzint a; dayzint a;"), "DuplicateSymbol");
    assert_eq!(error_name("monument dayzint A = 1; A = 2;"), "InvalidAssignment");
    assert_eq!(error_name("breakout;"), "InvalidExpression");
    assert_eq!(error_name("funkotron f() { contra; }"), "InvalidExpression");
    assert_eq!(
        error_name("funkotron f(dayzint c): dayzint { iffy (c) { returnal 0; } }"),
        "TypeError"
    );
    assert!(run(
        "funkotron f(dayzint c): dayzint { iffy (c) { returnal 0; } elysian { returnal 1; } }",
        vec![]
    )
    .is_ok());
}

#[test]
fn test_loop_variables_do_not_outlive_the_loop() {
    assert_eq!(
        error_name("forza (dayzint i = 0; i < 3; i = i + 1) { } exodus(i);"),
        "UnknownSymbol"
    );
    assert_eq!(
        error_name("dayzint n = 0; valorant (n < 2) { dayzint seen = n; n = n + 1; } exodus(seen);"),
        "UndefinedVariable"
    );
}

#[test]
fn test_shadowing_across_scopes() {
    let source = "
        dayzint x = 1;
        forza (dayzint x = 10; x < 12; x = x + 1) { exodus(x); }
        exodus(x);
    ";

    assert_eq!(
        run(source, vec![]).unwrap(),
        vec![Value::Int(10), Value::Int(11), Value::Int(1)]
    );
}

#[test]
fn test_keywords_and_comments() {
    let source = "
        -- line comment
        DAYZINT flag = READY; /* block
        comment */
        IFFY (flag && !noready) { EXODUS(\"on\"); }
    ";

    assert_eq!(run(source, vec![]).unwrap(), vec![Value::String("on".to_string())]);
}

#[test]
fn test_console_environment_end_to_end() {
    let mut environment = ConsoleEnvironment::new(Cursor::new("4\n2.5\n"), Vec::new());
    let source = "dayzint a; fallout b; raid(a); raid(b); exodus(a * b); exodus(\"done\");";

    Interpreter::default().run(source, &mut environment).unwrap();

    let output = String::from_utf8(environment.into_writer()).unwrap();
    assert_eq!(output, "10\ndone\n");
}

#[test]
fn test_error_report_points_at_source() {
    let source = "dayzint a = 1;\nexodus(b);\n";
    let error = run(source, vec![]).unwrap_err();

    assert_eq!(
        format_error(&error, source),
        "Error: UnknownSymbol (Symbol `b` is not defined)\n-> test.mys\n  |\n2 | exodus(b);\n  | -------^\n"
    );
}
