use std::{collections::BTreeMap, rc::Rc};

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Value, NULL},
    eval::prelude::RuntimeErrorType,
    utils::prelude::VectorConsoleIO
};

use super::prelude::*;

fn host() -> (Host, Rc<VectorConsoleIO>) {
    let io = Rc::new(VectorConsoleIO::with_input(["typed line"]));

    (Host::new(io.clone(), BTreeMap::new()), io)
}

fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let (mut host, _) = host();

    call_with(&mut host, name, args)
}

fn call_with(host: &mut Host, name: &str, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    match Registry::global().resolve(name) {
        Some(function) => function.call(host, args),
        None => panic!("`{name}` is not registered")
    }
}

fn n(value: f64) -> Value {
    Value::number(value)
}

fn s(value: &str) -> Value {
    Value::from(value)
}

fn list(items: &[Value]) -> Value {
    Value::list(items.to_vec())
}

/// Lists and maps compare by identity, so results are checked by their
/// printed form.
fn shown(result: Result<Value, RuntimeErrorType>) -> String {
    match result {
        Ok(value) => value.repr(),
        Err(error) => panic!("unexpected error: {error}")
    }
}

fn is_invalid_argument(result: Result<Value, RuntimeErrorType>) -> bool {
    matches!(result, Err(RuntimeErrorType::InvalidArgument { .. }))
}

#[test]
fn test_registry_contents() {
    let names = Registry::global().names();

    for name in ["print", "input", "free", "len", "push", "typeof", "str", "number", "exit", "env", "substring"] {
        assert!(names.contains(&name), "{name} missing");
    }
    assert!(Registry::global().resolve("nope").is_none());
    assert!(std::ptr::eq(Registry::global(), Registry::global()));
}

#[test]
fn test_arity() {
    assert_eq!(Arity::Exact(2).to_string(), "2");
    assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    assert_eq!(Arity::Between(2, 3).to_string(), "2 to 3");
    assert!(Arity::Between(2, 3).accepts(3));
    assert!(!Arity::Between(2, 3).accepts(4));

    assert_eq!(call("len", &[]), Err(RuntimeErrorType::ArityMismatch {
        name: "len".into(),
        expected: "1".into(),
        found: 0,
    }));
    assert!(matches!(call("min", &[]), Err(RuntimeErrorType::ArityMismatch { .. })));
}

#[test]
fn test_print_and_input() {
    let (mut host, io) = host();

    call_with(&mut host, "print", &[s("a"), n(1.5), list(&[s("b"), NULL])]).unwrap();
    call_with(&mut host, "print", &[]).unwrap();

    assert_eq!(io.take(), vec![r#"a 1.5 ["b", null]"#, ""]);
    assert_eq!(call_with(&mut host, "input", &[]), Ok(s("typed line")));
    assert_eq!(call_with(&mut host, "input", &[]), Ok(NULL));
}

#[test]
fn test_typeof_and_str() {
    assert_eq!(call("typeof", &[n(1.0)]), Ok(s("number")));
    assert_eq!(call("typeof", &[NULL]), Ok(s("null")));
    assert_eq!(call("typeof", &[Value::map(BTreeMap::new())]), Ok(s("map")));
    assert_eq!(call("str", &[s("n="), n(3.0), Value::boolean(true)]), Ok(s("n=3true")));
}

#[test]
fn test_exit_records_value() {
    let (mut host, _) = host();

    assert_eq!(call_with(&mut host, "exit", &[n(2.0)]), Ok(NULL));
    assert_eq!(host.exit, Some(n(2.0)));
}

#[test]
fn test_env_vars() {
    let (mut host, _) = host();
    host.env_vars.insert("USER".into(), "ks".into());

    assert_eq!(call_with(&mut host, "env", &[s("USER")]), Ok(s("ks")));
    assert_eq!(call_with(&mut host, "env", &[s("MISSING")]), Ok(NULL));

    call_with(&mut host, "env_set", &[s("COUNT"), n(4.0)]).unwrap();
    call_with(&mut host, "env_set", &[s("USER"), NULL]).unwrap();

    let listed = call_with(&mut host, "env_list", &[]).unwrap();
    assert_eq!(listed.to_string(), r#"{"COUNT": "4"}"#);
    assert!(is_invalid_argument(call_with(&mut host, "env", &[n(1.0)])));
}

#[test]
fn test_math() {
    assert_eq!(call("abs", &[n(-2.5)]), Ok(n(2.5)));
    assert_eq!(call("floor", &[n(2.7)]), Ok(n(2.0)));
    assert_eq!(call("ceil", &[n(2.1)]), Ok(n(3.0)));
    assert_eq!(call("round", &[n(2.5)]), Ok(n(3.0)));
    assert_eq!(call("round", &[n(-2.5)]), Ok(n(-3.0)));
    assert_eq!(call("sqrt", &[n(9.0)]), Ok(n(3.0)));
    assert_eq!(call("pow", &[n(2.0), n(10.0)]), Ok(n(1024.0)));
    assert_eq!(call("min", &[n(3.0), n(-1.0), n(2.0)]), Ok(n(-1.0)));
    assert_eq!(call("max", &[n(3.0), n(-1.0), n(2.0)]), Ok(n(3.0)));

    assert!(is_invalid_argument(call("sqrt", &[n(-1.0)])));
    assert!(is_invalid_argument(call("abs", &[s("1")])));
    assert!(is_invalid_argument(call("max", &[n(1.0), NULL])));
}

#[test]
fn test_number_conversion() {
    assert_eq!(call("number", &[s(" 42 ")]), Ok(n(42.0)));
    assert_eq!(call("number", &[s("1.5")]), Ok(n(1.5)));
    assert_eq!(call("number", &[n(7.0)]), Ok(n(7.0)));
    assert_eq!(call("number", &[s("abc")]), Ok(NULL));
    assert!(is_invalid_argument(call("number", &[Value::boolean(true)])));
}

#[test]
fn test_strings() {
    assert_eq!(call("upper", &[s("héllo")]), Ok(s("HÉLLO")));
    assert_eq!(call("lower", &[s("ABC")]), Ok(s("abc")));
    assert_eq!(call("trim", &[s("  x \n")]), Ok(s("x")));
    assert_eq!(shown(call("split", &[s("a,b,,c"), s(",")])), r#"["a", "b", "", "c"]"#);
    assert_eq!(shown(call("split", &[s("ab"), s("")])), r#"["a", "b"]"#);
    assert_eq!(call("join", &[list(&[s("a"), n(1.0)]), s("-")]), Ok(s("a-1")));
    assert_eq!(call("contains", &[s("haystack"), s("st")]), Ok(Value::boolean(true)));
    assert_eq!(call("contains", &[list(&[n(1.0), n(2.0)]), n(2.0)]), Ok(Value::boolean(true)));
    assert!(is_invalid_argument(call("contains", &[n(1.0), n(1.0)])));
}

#[test]
fn test_substring() {
    assert_eq!(call("substring", &[s("héllo"), n(1.0), n(3.0)]), Ok(s("él")));
    assert_eq!(call("substring", &[s("héllo"), n(2.0)]), Ok(s("llo")));
    assert_eq!(call("substring", &[s("abc"), n(3.0)]), Ok(s("")));

    assert!(is_invalid_argument(call("substring", &[s("abc"), n(2.0), n(1.0)])));
    assert!(is_invalid_argument(call("substring", &[s("abc"), n(0.0), n(4.0)])));
    assert!(is_invalid_argument(call("substring", &[s("abc"), n(0.5)])));
}

#[test]
fn test_list_functions() {
    let items = list(&[n(1.0)]);

    assert_eq!(call("push", &[items.clone(), n(2.0)]), Ok(NULL));
    assert_eq!(items.to_string(), "[1, 2]");
    assert_eq!(call("len", &[items.clone()]), Ok(n(2.0)));
    assert_eq!(call("pop", &[items.clone()]), Ok(n(2.0)));
    assert_eq!(call("pop", &[items.clone()]), Ok(n(1.0)));
    assert_eq!(call("pop", &[items.clone()]), Ok(NULL));

    assert_eq!(call("len", &[s("héllo")]), Ok(n(5.0)));
    assert!(is_invalid_argument(call("len", &[n(1.0)])));
    assert!(is_invalid_argument(call("push", &[s("a"), n(1.0)])));
}

#[test]
fn test_range() {
    assert_eq!(shown(call("range", &[n(0.0), n(3.0)])), "[0, 1, 2]");
    assert_eq!(shown(call("range", &[n(3.0), n(1.0)])), "[]");
    assert_eq!(shown(call("range", &[n(-2.0), n(1.0)])), "[-2, -1, 0]");
    assert!(is_invalid_argument(call("range", &[n(0.0), n(1.5)])));
}

#[test]
fn test_range_rejects_huge_bounds() {
    assert!(is_invalid_argument(call("range", &[n(0.0), n(1e300)])));
    assert!(is_invalid_argument(call("range", &[n(0.0), n(1e10)])));
    assert!(is_invalid_argument(call("range", &[n(-1e300), n(0.0)])));
    assert!(is_invalid_argument(call("range", &[n(0.0), n(f64::INFINITY)])));
    assert_eq!(call("range", &[n(1e300), n(0.0)]).map(|items| items.to_string()), Ok("[]".to_string()));

    let limit = super::collection::MAX_RANGE_LENGTH as f64;
    assert!(is_invalid_argument(call("range", &[n(0.0), n(limit + 1.0)])));
}

#[test]
fn test_free_records_names() {
    let (mut host, _) = host();

    assert_eq!(call_with(&mut host, "free", &[s("a"), s("b")]), Ok(NULL));
    assert_eq!(host.freed, vec!["a".to_string(), "b".to_string()]);

    host.freed.clear();
    assert!(is_invalid_argument(call_with(&mut host, "free", &[s("a"), n(1.0)])));
    assert!(host.freed.is_empty());
    assert!(matches!(call_with(&mut host, "free", &[]), Err(RuntimeErrorType::ArityMismatch { .. })));
}

#[test]
fn test_map_functions() {
    let mut entries = BTreeMap::new();
    entries.insert("b".to_string(), n(2.0));
    let map = Value::map(entries);

    assert_eq!(call("set", &[map.clone(), s("a"), n(1.0)]), Ok(NULL));
    assert_eq!(shown(call("keys", &[map.clone()])), r#"["a", "b"]"#);
    assert_eq!(call("get", &[map.clone(), s("a")]), Ok(n(1.0)));
    assert_eq!(call("get", &[map.clone(), s("z")]), Ok(NULL));
    assert_eq!(call("has", &[map.clone(), s("b")]), Ok(Value::boolean(true)));

    let smaller = call("without", &[map.clone(), s("a")]).unwrap();
    assert_eq!(smaller.to_string(), r#"{"b": 2}"#);
    assert_eq!(map.to_string(), r#"{"a": 1, "b": 2}"#);
    assert!(is_invalid_argument(call("keys", &[list(&[])])));
}
