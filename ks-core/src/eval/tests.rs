use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Value, ValueType},
    parser::prelude::{parse_program, InfixOperator, ParseErrorType},
    utils::prelude::{SrcSpan, VectorConsoleIO}
};

use super::prelude::*;

fn interpreter(config: EvalConfig) -> (Interpreter, Rc<VectorConsoleIO>) {
    let io = Rc::new(VectorConsoleIO::new());

    (Interpreter::new(config, io.clone()), io)
}

fn run_with(config: EvalConfig, src: &str) -> (Result<Value, RuntimeError>, Vec<String>) {
    let (mut interpreter, io) = interpreter(config);
    let program = parse_program(src).unwrap();

    let result = interpreter.evaluate(&program);

    (result, io.take())
}

fn run(src: &str) -> (Result<Value, RuntimeError>, Vec<String>) {
    run_with(EvalConfig::default(), src)
}

fn output(src: &str) -> Vec<String> {
    match run(src) {
        (Ok(_), lines) => lines,
        (Err(error), _) => panic!("{src} failed: {error}")
    }
}

fn error(src: &str) -> RuntimeErrorType {
    match run(src) {
        (Err(error), _) => error.error,
        (Ok(value), _) => panic!("{src} evaluated to {value}")
    }
}

#[test]
fn test_inner_block_shadowing() {
    assert_eq!(output("var x = 1; { var x = 2; } print(x);"), vec!["1"]);
}

#[test]
fn test_function_call() {
    assert_eq!(output("function add(a,b) { return a+b; } print(add(2,3));"), vec!["5"]);
}

#[test]
fn test_closure_outlives_block() {
    assert_eq!(
        output("var f; { var y = 10; f = function() { return y; }; } print(f());"),
        vec!["10"]
    );
}

#[test]
fn test_number_plus_string_is_type_error() {
    let (result, lines) = run(r#"print(1 + "a");"#);

    let error = result.unwrap_err();

    assert_eq!(error.error, RuntimeErrorType::InvalidOperands {
        operator: InfixOperator::Plus,
        left: ValueType::Number,
        right: ValueType::String,
    });
    assert!(error.error.is_type_error());
    assert_eq!(error.span, SrcSpan::from(6, 13));
    assert!(lines.is_empty());
}

#[test]
fn test_break_leaves_loop() {
    assert_eq!(output(r#"while (true) { break; } print("ok");"#), vec!["ok"]);
}

#[test]
fn test_malformed_declaration_prints_nothing() {
    let error = parse_program("var = ;").unwrap_err();

    assert_eq!(error.error, ParseErrorType::ExpectedIdent);
    assert_eq!(error.span, SrcSpan::from(4, 5));
}

#[test]
fn test_result_is_last_expression() {
    assert_eq!(run("var a = 2; a * 21;").0, Ok(Value::number(42.0)));
    assert_eq!(run("var a = 2;").0, Ok(Value::Null));
    assert_eq!(run("").0, Ok(Value::Null));
}

#[test]
fn test_arithmetic_and_comparison() {
    let cases = vec![
        ("1 + 2 * 3;", Value::number(7.0)),
        ("(1 + 2) * 3;", Value::number(9.0)),
        ("7 % 4;", Value::number(3.0)),
        ("10 - 2 - 3;", Value::number(5.0)),
        ("1 / 4;", Value::number(0.25)),
        ("-(2 + 3);", Value::number(-5.0)),
        (r#""ab" + "cd";"#, Value::from("abcd")),
        (r#""a" < "b";"#, Value::boolean(true)),
        ("2 >= 2;", Value::boolean(true)),
        ("1 == 1;", Value::boolean(true)),
        (r#"1 == "1";"#, Value::boolean(false)),
        ("null == null;", Value::boolean(true)),
        ("null != false;", Value::boolean(true)),
        ("!true;", Value::boolean(false)),
    ];

    for (src, expected) in cases {
        assert_eq!(run(src).0, Ok(expected), "{src}");
    }
}

#[test]
fn test_operator_type_errors() {
    assert_eq!(error("true + 1;"), RuntimeErrorType::InvalidOperands {
        operator: InfixOperator::Plus,
        left: ValueType::Boolean,
        right: ValueType::Number,
    });
    assert!(matches!(error(r#"-"a";"#), RuntimeErrorType::InvalidOperand { operand: ValueType::String, .. }));
    assert!(matches!(error("!1;"), RuntimeErrorType::InvalidOperand { operand: ValueType::Number, .. }));
    assert!(matches!(error(r#"1 < "2";"#), RuntimeErrorType::InvalidOperands { .. }));
    assert_eq!(error("1 && true;"), RuntimeErrorType::ExpectedBoolean { found: ValueType::Number });
    assert_eq!(error("if (1) {}"), RuntimeErrorType::ExpectedBoolean { found: ValueType::Number });
}

#[test]
fn test_division_by_zero() {
    assert_eq!(error("1 / 0;"), RuntimeErrorType::DivisionByZero);
    assert_eq!(error("1 % 0;"), RuntimeErrorType::DivisionByZero);
}

#[test]
fn test_short_circuit() {
    let src = r#"
        var calls = 0;
        function touch() { calls = calls + 1; return true; }
        false && touch();
        true || touch();
        true && touch();
        print(calls);
    "#;

    assert_eq!(output(src), vec!["1"]);
}

#[test]
fn test_closure_sees_later_mutation() {
    let src = r#"
        var n = 1;
        var get = function() { return n; };
        n = 2;
        print(get());
    "#;

    assert_eq!(output(src), vec!["2"]);
}

#[test]
fn test_counter_closure_keeps_state() {
    let src = r#"
        function counter() {
            var count = 0;
            return function() { count = count + 1; return count; };
        }
        var a = counter();
        var b = counter();
        a(); a();
        print(a(), b());
    "#;

    assert_eq!(output(src), vec!["3 1"]);
}

#[test]
fn test_assignment_reaches_outer_scope() {
    assert_eq!(output("var x = 1; { x = 5; } print(x);"), vec!["5"]);
    assert_eq!(output("var a; var b; a = b = 3; print(a, b);"), vec!["3 3"]);
}

#[test]
fn test_undefined_and_redeclared() {
    assert_eq!(error("print(y);"), RuntimeErrorType::UndefinedVariable { name: "y".into() });
    assert_eq!(error("y = 1;"), RuntimeErrorType::UndefinedVariable { name: "y".into() });
    assert_eq!(error("var x; var x;"), RuntimeErrorType::Redeclaration { name: "x".into() });

    let (result, _) = run("var x = 1;\nprint(nope);");
    assert_eq!(result.unwrap_err().span, SrcSpan::from(17, 21));
}

#[test]
fn test_arity_is_checked() {
    assert_eq!(error("function f(a, b) {} f(1);"), RuntimeErrorType::ArityMismatch {
        name: "f".into(),
        expected: "2".into(),
        found: 1,
    });
    assert_eq!(error("(function(a) {})();"), RuntimeErrorType::ArityMismatch {
        name: "<anonymous>".into(),
        expected: "1".into(),
        found: 0,
    });
    assert!(matches!(error("len();"), RuntimeErrorType::ArityMismatch { found: 0, .. }));
}

#[test]
fn test_function_without_return_is_null() {
    assert_eq!(run("function f() { var a = 1; } f();").0, Ok(Value::Null));
    assert_eq!(run("function f() { return; } f();").0, Ok(Value::Null));
}

#[test]
fn test_recursion() {
    let src = r#"
        function fib(n) {
            if (n < 2) { return n; }
            return fib(n - 1) + fib(n - 2);
        }
        print(fib(15));
    "#;

    assert_eq!(output(src), vec!["610"]);
}

#[test]
fn test_call_depth_limit() {
    let src = "function down(n) { return down(n + 1); } down(0);";

    let (result, _) = run_with(EvalConfig::default().with_max_call_depth(50), src);

    assert_eq!(result.unwrap_err().error, RuntimeErrorType::StackOverflow { limit: 50 });
    assert_eq!(error(src), RuntimeErrorType::StackOverflow { limit: DEFAULT_MAX_CALL_DEPTH });
}

#[test]
fn test_depth_resets_after_error() {
    let (mut interpreter, _) = interpreter(EvalConfig::default().with_max_call_depth(10));

    let deep = parse_program("function down() { return down(); } down();").unwrap();
    assert!(interpreter.evaluate(&deep).is_err());

    let shallow = parse_program("function f(n) { if (n == 0) { return 0; } return f(n - 1); } f(5);").unwrap();
    assert_eq!(interpreter.evaluate(&shallow), Ok(Value::number(0.0)));
}

#[test]
fn test_loops() {
    let src = r#"
        var out = [];
        for (var i = 0; i < 5; i = i + 1) {
            if (i == 1) { continue; }
            if (i == 4) { break; }
            push(out, i);
        }
        var j = 0;
        while (j < 3) { var seen = j; j = j + 1; }
        print(out, j);
    "#;

    assert_eq!(output(src), vec!["[0, 2, 3] 3"]);
}

#[test]
fn test_for_scope_ends_with_loop() {
    assert_eq!(
        error("for (var i = 0; i < 1; i = i + 1) {} print(i);"),
        RuntimeErrorType::UndefinedVariable { name: "i".into() }
    );
    assert_eq!(output("var n = 0; for (;;) { n = n + 1; if (n == 3) { break; } } print(n);"), vec!["3"]);
}

#[test]
fn test_stray_control_flow() {
    assert_eq!(error("break;"), RuntimeErrorType::BreakOutsideLoop);
    assert_eq!(error("continue;"), RuntimeErrorType::ContinueOutsideLoop);
    assert_eq!(error("return 1;"), RuntimeErrorType::ReturnOutsideFunction);
    assert_eq!(
        error("function f() { break; } while (true) { f(); }"),
        RuntimeErrorType::BreakOutsideLoop
    );
}

#[test]
fn test_collections() {
    let src = r#"
        var list = [1, 2, 3];
        list[0] = 10;
        var map = {"a": 1};
        map["b"] = list;
        print(list[0], map["b"][2], map["missing"], "héllo"[1]);
        print(map);
    "#;

    assert_eq!(output(src), vec![
        "10 3 null é",
        r#"{"a": 1, "b": [10, 2, 3]}"#,
    ]);
}

#[test]
fn test_lists_are_shared() {
    assert_eq!(output("var a = [1]; var b = a; push(b, 2); print(a, a == b, [1] == [1]);"), vec!["[1, 2] true false"]);
}

#[test]
fn test_index_errors() {
    assert_eq!(error("[1, 2][2];"), RuntimeErrorType::IndexOutOfBounds { index: 2.0, length: 2 });
    assert_eq!(error("[1, 2][-1];"), RuntimeErrorType::IndexOutOfBounds { index: -1.0, length: 2 });
    assert!(matches!(error("[1, 2][0.5];"), RuntimeErrorType::InvalidIndex { collection: ValueType::List, .. }));
    assert!(matches!(error(r#"[1]["a"];"#), RuntimeErrorType::InvalidIndex { .. }));
    assert!(matches!(error(r#"var m = {"a": 1}[0];"#), RuntimeErrorType::InvalidIndex { collection: ValueType::Map, .. }));
    assert_eq!(error("5[0];"), RuntimeErrorType::NotIndexable { found: ValueType::Number });
    assert_eq!(error("var m = {1: 2};"), RuntimeErrorType::InvalidMapKey { found: ValueType::Number });
    assert_eq!(error(r#""abc"[0] = "x";"#), RuntimeErrorType::NotIndexable { found: ValueType::String });
}

#[test]
fn test_not_callable() {
    let (result, _) = run("var x = 1; x();");
    let error = result.unwrap_err();

    assert_eq!(error.error, RuntimeErrorType::NotCallable { found: ValueType::Number });
    assert_eq!(error.span, SrcSpan::from(11, 12));
}

#[test]
fn test_evaluation_order() {
    let src = r#"
        var log = [];
        function note(x) { push(log, x); return x; }
        function three(a, b, c) { return null; }
        three(note(1), note(2), note(3));
        note(4) + note(5);
        print(log);
    "#;

    assert_eq!(output(src), vec!["[1, 2, 3, 4, 5]"]);
}

#[test]
fn test_builtins_resolve_after_scopes() {
    assert_eq!(output(r#"var len = function(x) { return "mine"; }; print(len([1]));"#), vec!["mine"]);
    assert_eq!(output("print(typeof(len));"), vec!["function"]);
}

#[test]
fn test_exit_terminates_session() {
    let (mut interpreter, io) = interpreter(EvalConfig::default());

    let program = parse_program(r#"print("a"); exit(3); print("b");"#).unwrap();
    assert_eq!(interpreter.evaluate(&program), Ok(Value::number(3.0)));
    assert!(interpreter.is_terminated());
    assert_eq!(interpreter.exit_value(), Some(&Value::number(3.0)));

    let later = parse_program(r#"print("c");"#).unwrap();
    assert_eq!(interpreter.evaluate(&later), Ok(Value::number(3.0)));
    assert_eq!(io.take(), vec!["a"]);
}

#[test]
fn test_exit_inside_function_and_loop() {
    let (result, lines) = run(r#"function stop() { while (true) { exit(); } } stop(); print("after");"#);

    assert_eq!(result, Ok(Value::Null));
    assert!(lines.is_empty());
}

#[test]
fn test_globals_persist_between_programs() {
    let (mut interpreter, io) = interpreter(EvalConfig::default());

    interpreter.evaluate(&parse_program("var total = 1;").unwrap()).unwrap();
    interpreter.evaluate(&parse_program("total = total + 1;").unwrap()).unwrap();
    interpreter.evaluate(&parse_program("print(total);").unwrap()).unwrap();

    assert_eq!(io.take(), vec!["2"]);
    assert!(interpreter.globals().borrow().contains_local("total"));
}

#[test]
fn test_env_vars_from_config() {
    let config = EvalConfig::default().with_env_vars([("HOME".to_string(), "/home/ks".to_string())]);
    let (mut interpreter, io) = interpreter(config);

    let program = parse_program(r#"print(env("HOME")); env_set("MODE", 1); env_set("HOME", null);"#).unwrap();
    interpreter.evaluate(&program).unwrap();

    assert_eq!(io.take(), vec!["/home/ks"]);
    assert_eq!(interpreter.env_vars().get("MODE").map(String::as_str), Some("1"));
    assert!(!interpreter.env_vars().contains_key("HOME"));
}

#[test]
fn test_parameter_shadowed_in_body() {
    assert_eq!(output("function f(a) { var a = 2; return a; } print(f(1));"), vec!["2"]);
}

#[test]
fn test_free_unbinds_variables() {
    assert_eq!(output(r#"var a = 1; var b = 2; free("a", "missing"); print(b);"#), vec!["2"]);
    assert_eq!(
        error(r#"var a = 1; free("a"); print(a);"#),
        RuntimeErrorType::UndefinedVariable { name: "a".into() }
    );
    assert_eq!(output(r#"var a = 1; free("a"); var a = 3; print(a);"#), vec!["3"]);
}

#[test]
fn test_free_removes_innermost_binding() {
    assert_eq!(output(r#"var x = 1; { var x = 2; free("x"); print(x); }"#), vec!["1"]);
    assert_eq!(
        error(r#"var g = 1; function drop() { free("g"); } drop(); print(g);"#),
        RuntimeErrorType::UndefinedVariable { name: "g".into() }
    );
}

#[test]
fn test_printing_self_containing_list() {
    assert_eq!(
        output("var a = []; push(a, a); push(a, a); push(a, a); print(str(a)); print(len(a));"),
        vec!["[[...], [...], [...]]", "3"]
    );
}
