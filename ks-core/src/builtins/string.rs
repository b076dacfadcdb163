use crate::{environment::prelude::Value, eval::prelude::RuntimeErrorType};

use super::registry::{expect_count, expect_list, expect_str, invalid_argument, Arity, Host, NativeFunction};

pub(super) const FUNCTIONS: &[NativeFunction] = &[
    NativeFunction { name: "upper", arity: Arity::Exact(1), function: upper },
    NativeFunction { name: "lower", arity: Arity::Exact(1), function: lower },
    NativeFunction { name: "trim", arity: Arity::Exact(1), function: trim },
    NativeFunction { name: "split", arity: Arity::Exact(2), function: split },
    NativeFunction { name: "join", arity: Arity::Exact(2), function: join },
    NativeFunction { name: "contains", arity: Arity::Exact(2), function: contains },
    NativeFunction { name: "substring", arity: Arity::Between(2, 3), function: substring },
];

fn upper(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(Value::from(expect_str("upper", &args[0])?.to_uppercase()))
}

fn lower(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(Value::from(expect_str("lower", &args[0])?.to_lowercase()))
}

fn trim(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(Value::from(expect_str("trim", &args[0])?.trim()))
}

/// An empty separator splits into characters.
fn split(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let value = expect_str("split", &args[0])?;
    let separator = expect_str("split", &args[1])?;

    let parts = match separator.is_empty() {
        true => value.chars().map(|ch| Value::from(ch.to_string())).collect(),
        false => value.split(separator).map(Value::from).collect()
    };

    Ok(Value::list(parts))
}

fn join(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let items = expect_list("join", &args[0])?;
    let separator = expect_str("join", &args[1])?;

    let joined = items.borrow().iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(separator);

    Ok(Value::from(joined))
}

fn contains(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    match &args[0] {
        Value::String { value } => {
            let needle = expect_str("contains", &args[1])?;

            Ok(Value::boolean(value.contains(needle)))
        },
        Value::List { items } => Ok(Value::boolean(items.borrow().contains(&args[1]))),
        other => Err(invalid_argument("contains", format!("expected a string or a list, found {}", other.value_type())))
    }
}

/// Character-indexed `[start, end)`; `end` defaults to the length.
fn substring(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let value = expect_str("substring", &args[0])?;
    let length = value.chars().count();

    let start = expect_count("substring", &args[1])?;
    let end = match args.get(2) {
        Some(end) => expect_count("substring", end)?,
        None => length
    };

    if start > end || end > length {
        return Err(invalid_argument("substring", format!("range {start}..{end} is out of bounds for length {length}")));
    }

    Ok(Value::from(value.chars().skip(start).take(end - start).collect::<String>()))
}
