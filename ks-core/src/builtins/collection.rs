use crate::{environment::prelude::Value, eval::prelude::RuntimeErrorType};

use super::registry::{expect_list, expect_map, expect_number, expect_str, invalid_argument, Arity, Host, NativeFunction};

/// Longest list `range` builds.
pub(super) const MAX_RANGE_LENGTH: usize = 10_000_000;

pub(super) const FUNCTIONS: &[NativeFunction] = &[
    NativeFunction { name: "len", arity: Arity::Exact(1), function: len },
    NativeFunction { name: "push", arity: Arity::Exact(2), function: push },
    NativeFunction { name: "pop", arity: Arity::Exact(1), function: pop },
    NativeFunction { name: "range", arity: Arity::Exact(2), function: range },
    NativeFunction { name: "keys", arity: Arity::Exact(1), function: keys },
    NativeFunction { name: "get", arity: Arity::Exact(2), function: get },
    NativeFunction { name: "set", arity: Arity::Exact(3), function: set },
    NativeFunction { name: "has", arity: Arity::Exact(2), function: has },
    NativeFunction { name: "without", arity: Arity::Exact(2), function: without },
];

fn len(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let length = match &args[0] {
        Value::String { value } => value.chars().count(),
        Value::List { items } => items.borrow().len(),
        Value::Map { entries } => entries.borrow().len(),
        other => return Err(invalid_argument("len", format!("{} has no length", other.value_type())))
    };

    Ok(Value::number(length as f64))
}

fn push(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let items = expect_list("push", &args[0])?;

    items.borrow_mut().push(args[1].clone());

    Ok(Value::Null)
}

/// Removes and returns the last item, `null` for an empty list.
fn pop(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let items = expect_list("pop", &args[0])?;
    let last = items.borrow_mut().pop();

    Ok(last.unwrap_or(Value::Null))
}

/// Whole numbers from `start` up to, not including, `end`.
fn range(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let start = expect_number("range", &args[0])?;
    let end = expect_number("range", &args[1])?;

    if start.fract() != 0.0 || end.fract() != 0.0 {
        return Err(invalid_argument("range", "bounds must be whole numbers"));
    }

    if end <= start {
        return Ok(Value::list(Vec::new()));
    }

    let length = end - start;
    if length > MAX_RANGE_LENGTH as f64 {
        return Err(invalid_argument("range", format!("a range holds at most {MAX_RANGE_LENGTH} numbers")));
    }

    let items = (0..length as usize).map(|offset| Value::number(start + offset as f64)).collect();

    Ok(Value::list(items))
}

fn keys(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = expect_map("keys", &args[0])?;

    let keys = entries.borrow().keys()
        .map(|key| Value::from(key.as_str()))
        .collect();

    Ok(Value::list(keys))
}

fn get(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = expect_map("get", &args[0])?;
    let key = expect_str("get", &args[1])?;

    let value = entries.borrow().get(key).cloned();

    Ok(value.unwrap_or(Value::Null))
}

fn set(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = expect_map("set", &args[0])?;
    let key = expect_str("set", &args[1])?;

    entries.borrow_mut().insert(key.to_string(), args[2].clone());

    Ok(Value::Null)
}

fn has(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = expect_map("has", &args[0])?;
    let key = expect_str("has", &args[1])?;

    let found = entries.borrow().contains_key(key);

    Ok(Value::boolean(found))
}

/// A copy of the map without `key`; the argument is left untouched.
fn without(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = expect_map("without", &args[0])?;
    let key = expect_str("without", &args[1])?;

    let mut copy = entries.borrow().clone();
    copy.remove(key);

    Ok(Value::map(copy))
}
